//! Host bridge and notifier traits.

use super::command::{CommandOptions, CommandOutcome};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info, warn};

/// Injection id for the pipeline's final text.
///
/// The id is stable so a new run replaces the previous injection instead of
/// appending a second one.
pub const FINAL_INJECTION_ID: &str = "writers-room-final";

/// Where an injection lands in the assembled conversation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionPosition {
    /// Inserted into the chat history at the configured depth.
    #[default]
    InChat,
    /// Inserted before the main prompt.
    BeforePrompt,
    /// Inserted after the main prompt.
    AfterPrompt,
}

/// A staged text block for inclusion in the next assembled turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Injection {
    /// Stable identifier; re-injecting under the same id replaces.
    pub id: String,
    /// Placement within the assembled context.
    pub position: InjectionPosition,
    /// Depth from the end of the chat, for in-chat placement.
    pub depth: u32,
    /// The text to include.
    pub text: String,
}

impl Injection {
    /// Creates an in-chat injection at depth 0.
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position: InjectionPosition::default(),
            depth: 0,
            text: text.into(),
        }
    }

    /// Sets the position.
    #[must_use]
    pub fn with_position(mut self, position: InjectionPosition) -> Self {
        self.position = position;
        self
    }

    /// Sets the depth.
    #[must_use]
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }
}

/// The host application's command-execution and injection interface.
///
/// Implementations wrap whatever transport the host provides. Every
/// `execute` call is a single request/response round trip; errors the host
/// traps during execution come back in-band on the [`CommandOutcome`].
#[async_trait]
pub trait HostBridge: Send + Sync {
    /// Returns true once the host application is fully initialized.
    fn is_ready(&self) -> bool;

    /// Executes a command script and returns the host's result record.
    async fn execute(&self, script: &str, options: CommandOptions) -> CommandOutcome;

    /// Stages a text block for inclusion in the next assembled turn,
    /// replacing any previous injection with the same id.
    async fn inject(&self, injection: Injection);

    /// Removes a staged injection by id. Removing an absent id is a no-op.
    async fn remove_injection(&self, id: &str);
}

/// Fire-and-forget user notifications.
///
/// Notifications are never awaited and never part of control flow; a lost
/// toast must not change pipeline behavior.
pub trait Notifier: Send + Sync {
    /// Informational toast.
    fn info(&self, message: &str, title: &str);

    /// Success toast.
    fn success(&self, message: &str, title: &str);

    /// Warning toast.
    fn warning(&self, message: &str, title: &str);

    /// Error toast.
    fn error(&self, message: &str, title: &str);
}

/// A notifier that discards all notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn info(&self, _message: &str, _title: &str) {}
    fn success(&self, _message: &str, _title: &str) {}
    fn warning(&self, _message: &str, _title: &str) {}
    fn error(&self, _message: &str, _title: &str) {}
}

/// A notifier that routes notifications to the tracing framework.
///
/// Useful for headless deployments where no toast surface exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn info(&self, message: &str, title: &str) {
        info!(title = %title, "{message}");
    }

    fn success(&self, message: &str, title: &str) {
        info!(title = %title, "{message}");
    }

    fn warning(&self, message: &str, title: &str) {
        warn!(title = %title, "{message}");
    }

    fn error(&self, message: &str, title: &str) {
        error!(title = %title, "{message}");
    }
}

impl fmt::Display for InjectionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InChat => write!(f, "in_chat"),
            Self::BeforePrompt => write!(f, "before_prompt"),
            Self::AfterPrompt => write!(f, "after_prompt"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injection_builder() {
        let injection = Injection::new(FINAL_INJECTION_ID, "final text")
            .with_position(InjectionPosition::BeforePrompt)
            .with_depth(2);

        assert_eq!(injection.id, FINAL_INJECTION_ID);
        assert_eq!(injection.position, InjectionPosition::BeforePrompt);
        assert_eq!(injection.depth, 2);
        assert_eq!(injection.text, "final text");
    }

    #[test]
    fn test_injection_defaults() {
        let injection = Injection::new("id", "text");
        assert_eq!(injection.position, InjectionPosition::InChat);
        assert_eq!(injection.depth, 0);
    }

    #[test]
    fn test_position_serde() {
        let json = serde_json::to_string(&InjectionPosition::InChat).unwrap();
        assert_eq!(json, r#""in_chat""#);
    }
}
