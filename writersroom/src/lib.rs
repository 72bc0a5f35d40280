//! # Writer's Room
//!
//! Orchestration core for the Writer's Room content-generation pipeline:
//! two independently configured draft generations (Stage A and Stage B)
//! followed by a synthesis pass that merges them into one final text.
//!
//! The crate owns the sequencing policy, the per-stage environment
//! configuration protocol, the partial-failure and fallback logic, and the
//! result-aggregation contract. The host application stays an external
//! collaborator behind three seams:
//!
//! - **Command execution**: a textual command script sent in a single round
//!   trip ([`host::HostBridge::execute`])
//! - **Injection**: handing the final text to the host for inclusion in the
//!   next assembled turn ([`host::HostBridge::inject`])
//! - **Notification**: fire-and-forget user toasts ([`host::Notifier`])
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use writersroom::prelude::*;
//!
//! let coordinator = PipelineCoordinator::new(host, notifier);
//! let settings = PipelineSettings::from_persisted(persisted_json);
//!
//! match coordinator.trigger(&settings).await {
//!     TriggerOutcome::Completed(run) => println!("{:?}", run.final_text),
//!     TriggerOutcome::Suppressed(reason) => println!("dropped: {reason}"),
//!     TriggerOutcome::Failed(err) => eprintln!("{err}"),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod errors;
pub mod host;
pub mod observability;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod readiness;
pub mod settings;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::WritersRoomError;
    pub use crate::host::{
        CommandOptions, CommandOutcome, HostBridge, HostCommand, Injection,
        InjectionPosition, Notifier, NullNotifier, TracingNotifier,
        FINAL_INJECTION_ID,
    };
    pub use crate::pipeline::{
        DraftSet, EnvironmentConfigurator, GenerationExecutor,
        PipelineCoordinator, PipelineRun, StageResult, StageRunner,
        StageStatus, SuppressedReason, Synthesizer, TriggerOutcome,
    };
    pub use crate::prompts::{render_synthesis, stage_prompt};
    pub use crate::providers::ApiProvider;
    pub use crate::readiness::Readiness;
    pub use crate::settings::{PipelineSettings, StageConfig, StageId};
}
