//! Per-stage and per-run result types.

use crate::settings::StageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Terminal status of one stage within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// The stage produced output.
    Success,
    /// The stage ran and failed.
    Failure,
    /// The stage was disabled or not applicable.
    Skipped,
}

/// The settled outcome of one stage. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResult {
    /// Which stage this result belongs to.
    pub stage: StageId,
    /// Terminal status.
    pub status: StageStatus,
    /// Generated text, present only on success.
    pub text: Option<String>,
    /// Human-readable failure message, present only on failure.
    pub error: Option<String>,
}

impl StageResult {
    /// Creates a success result.
    #[must_use]
    pub fn success(stage: StageId, text: impl Into<String>) -> Self {
        Self {
            stage,
            status: StageStatus::Success,
            text: Some(text.into()),
            error: None,
        }
    }

    /// Creates a failure result.
    #[must_use]
    pub fn failure(stage: StageId, error: impl Into<String>) -> Self {
        Self {
            stage,
            status: StageStatus::Failure,
            text: None,
            error: Some(error.into()),
        }
    }

    /// Creates a skipped result.
    #[must_use]
    pub fn skipped(stage: StageId) -> Self {
        Self {
            stage,
            status: StageStatus::Skipped,
            text: None,
            error: None,
        }
    }

    /// Returns true if the stage produced output.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == StageStatus::Success
    }

    /// The generated text, when the stage succeeded.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// The settled draft results of Stage A and Stage B.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSet {
    /// Stage A outcome.
    pub stage_a: StageResult,
    /// Stage B outcome.
    pub stage_b: StageResult,
}

impl DraftSet {
    /// Stage A's text, when it succeeded.
    #[must_use]
    pub fn draft_a(&self) -> Option<&str> {
        self.stage_a.text()
    }

    /// Stage B's text, when it succeeded.
    #[must_use]
    pub fn draft_b(&self) -> Option<&str> {
        self.stage_b.text()
    }

    /// Returns true if at least one draft stage produced output.
    #[must_use]
    pub fn has_output(&self) -> bool {
        self.draft_a().is_some() || self.draft_b().is_some()
    }
}

/// One complete pipeline run, retained for later inspection.
///
/// The coordinator keeps the most recent run and overwrites it on each new
/// run; a run that failed carries no final text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// When the run entered the Running state.
    pub started_at: DateTime<Utc>,
    /// When the run settled.
    pub finished_at: DateTime<Utc>,
    /// Stage A outcome.
    pub stage_a: StageResult,
    /// Stage B outcome.
    pub stage_b: StageResult,
    /// Synthesis outcome.
    pub synthesis: StageResult,
    /// The final text handed to the injection interface, if the run
    /// completed.
    pub final_text: Option<String>,
}

impl PipelineRun {
    /// Returns true if the run completed with a final text.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.final_text.is_some()
    }
}
