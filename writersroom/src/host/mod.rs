//! The host application boundary.
//!
//! The host's command-execution interface is an external collaborator: the
//! core builds typed commands, renders them to the host's surface syntax,
//! and sends them in a single round trip. Injection and notification are
//! likewise opaque seams.

mod bridge;
mod command;

pub use bridge::{
    HostBridge, Injection, InjectionPosition, Notifier, NullNotifier,
    TracingNotifier, FINAL_INJECTION_ID,
};
pub use command::{join_script, CommandOptions, CommandOutcome, HostCommand};
