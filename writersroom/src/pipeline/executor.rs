//! Generation executor.
//!
//! Issues a single prompt-completion request through the host command
//! interface and extracts the piped text.

use crate::errors::WritersRoomError;
use crate::host::{CommandOptions, HostBridge, HostCommand};
use crate::prompts::preview;
use std::sync::Arc;
use tracing::{debug, warn};

/// Executes prompt-completion requests against the host.
pub struct GenerationExecutor {
    host: Arc<dyn HostBridge>,
}

impl GenerationExecutor {
    /// Creates an executor over the host seam.
    #[must_use]
    pub fn new(host: Arc<dyn HostBridge>) -> Self {
        Self { host }
    }

    /// Runs one generation round trip with the literal prompt text.
    ///
    /// Fails immediately with [`WritersRoomError::NotReady`] if the host is
    /// not initialized; this precondition is never retried. On success the
    /// host's piped text is returned as-is, possibly empty — callers decide
    /// whether emptiness is an error for their stage.
    pub async fn generate(&self, prompt: &str) -> Result<String, WritersRoomError> {
        if !self.host.is_ready() {
            warn!("generation requested before host ready");
            return Err(WritersRoomError::NotReady);
        }

        let script = HostCommand::Generate {
            prompt: prompt.to_string(),
        }
        .to_string();

        debug!(prompt_preview = %preview(prompt, 100), "executing generation");

        let outcome = self.host.execute(&script, CommandOptions::silent()).await;
        if outcome.is_error {
            return Err(WritersRoomError::generation_failed(outcome.error_message));
        }

        Ok(outcome.pipe)
    }
}
