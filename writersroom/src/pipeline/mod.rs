//! The pipeline orchestration core.
//!
//! Leaf to root: the [`EnvironmentConfigurator`] points the host at a
//! stage's API/model/preset, the [`GenerationExecutor`] runs a single
//! prompt-completion round trip, the [`StageRunner`] settles both draft
//! stages independently, the [`Synthesizer`] merges the drafts, and the
//! [`PipelineCoordinator`] drives the whole state machine under a
//! single-flight guard.

mod configurator;
mod coordinator;
mod executor;
mod result;
mod runner;
mod synthesizer;

#[cfg(test)]
mod integration_tests;

pub use configurator::EnvironmentConfigurator;
pub use coordinator::{PipelineCoordinator, SuppressedReason, TriggerOutcome};
pub use executor::GenerationExecutor;
pub use result::{DraftSet, PipelineRun, StageResult, StageStatus};
pub use runner::StageRunner;
pub use synthesizer::Synthesizer;

/// Toast title used for all pipeline notifications.
pub const NOTICE_TITLE: &str = "Writer's Room";
