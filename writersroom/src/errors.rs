//! Error types for the Writer's Room pipeline.
//!
//! The taxonomy follows the pipeline's failure boundaries: precondition
//! errors fail fast, configuration and generation errors abort a single
//! stage, and only the no-output case is terminal for a whole run.

use crate::pipeline::DraftSet;
use crate::settings::StageId;
use thiserror::Error;

/// The main error type for pipeline operations.
#[derive(Debug, Clone, Error)]
pub enum WritersRoomError {
    /// The host application is not initialized enough to execute commands.
    ///
    /// This is a fatal precondition; it is never retried.
    #[error("host is not ready to execute generation")]
    NotReady,

    /// A stage's configured API provider is not in the supported table.
    #[error("unknown API mapping \"{provider}\" for {stage}")]
    UnknownProvider {
        /// The stage whose configuration was rejected.
        stage: StageId,
        /// The unrecognized provider value from settings.
        provider: String,
    },

    /// The host reported an error while executing a setup script.
    #[error("environment setup failed for {stage}: {message}")]
    CommandFailed {
        /// The stage being configured.
        stage: StageId,
        /// The host's error message.
        message: String,
    },

    /// The host reported an error while executing a generation request.
    #[error("generation failed: {message}")]
    GenerationFailed {
        /// The host's error message.
        message: String,
    },

    /// A stage's generation returned empty or whitespace-only text.
    #[error("{stage} failed to produce a response")]
    EmptyOutput {
        /// The stage that produced nothing.
        stage: StageId,
    },

    /// No enabled stage produced any output; the run ends here.
    ///
    /// Carries the per-stage results so a failed run can still be recorded
    /// and inspected.
    #[error("no stages produced responses")]
    NoStageOutput {
        /// The settled draft results at the time of the failure.
        drafts: Box<DraftSet>,
    },
}

impl WritersRoomError {
    /// Creates an unknown-provider error.
    #[must_use]
    pub fn unknown_provider(stage: StageId, provider: impl Into<String>) -> Self {
        Self::UnknownProvider {
            stage,
            provider: provider.into(),
        }
    }

    /// Creates a command-failed error.
    #[must_use]
    pub fn command_failed(stage: StageId, message: impl Into<String>) -> Self {
        Self::CommandFailed {
            stage,
            message: message.into(),
        }
    }

    /// Creates a generation-failed error.
    #[must_use]
    pub fn generation_failed(message: impl Into<String>) -> Self {
        Self::GenerationFailed {
            message: message.into(),
        }
    }

    /// Returns the stage this error is scoped to, if any.
    #[must_use]
    pub fn stage(&self) -> Option<StageId> {
        match self {
            Self::UnknownProvider { stage, .. }
            | Self::CommandFailed { stage, .. }
            | Self::EmptyOutput { stage } => Some(*stage),
            Self::NotReady | Self::GenerationFailed { .. } | Self::NoStageOutput { .. } => None,
        }
    }

    /// Returns true if the error aborts only the affected stage rather
    /// than the whole run.
    #[must_use]
    pub fn is_stage_scoped(&self) -> bool {
        self.stage().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_message() {
        let err = WritersRoomError::unknown_provider(StageId::StageA, "banana");
        assert_eq!(
            err.to_string(),
            "unknown API mapping \"banana\" for Stage A"
        );
        assert_eq!(err.stage(), Some(StageId::StageA));
    }

    #[test]
    fn test_command_failed_message() {
        let err = WritersRoomError::command_failed(StageId::Synthesis, "connection refused");
        assert_eq!(
            err.to_string(),
            "environment setup failed for Synthesis: connection refused"
        );
        assert!(err.is_stage_scoped());
    }

    #[test]
    fn test_run_level_errors_have_no_stage() {
        assert_eq!(WritersRoomError::NotReady.stage(), None);
        assert!(!WritersRoomError::generation_failed("boom").is_stage_scoped());
    }
}
