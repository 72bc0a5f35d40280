//! Pipeline coordinator.
//!
//! Top-level state machine: `Idle -> Running -> {Completed, Failed} ->
//! Idle`. A single-flight guard keeps at most one run in flight; triggers
//! arriving while Running are dropped, not queued. The guard is set before
//! the first suspension point and cleared exactly once by a drop guard, so
//! it can never leak into a permanently locked state.

use crate::errors::WritersRoomError;
use crate::host::{HostBridge, Injection, Notifier, FINAL_INJECTION_ID};
use crate::pipeline::result::{DraftSet, PipelineRun, StageResult};
use crate::pipeline::{StageRunner, Synthesizer, NOTICE_TITLE};
use crate::settings::{PipelineSettings, StageId};
use chrono::Utc;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Why a trigger was dropped without starting a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressedReason {
    /// The global enable flag is off.
    Disabled,
    /// Another run is already in flight.
    AlreadyRunning,
}

impl fmt::Display for SuppressedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "pipeline disabled"),
            Self::AlreadyRunning => write!(f, "pipeline already running"),
        }
    }
}

/// Aggregate result of one trigger attempt.
#[derive(Debug)]
pub enum TriggerOutcome {
    /// The run completed and its final text was staged for injection.
    Completed(PipelineRun),
    /// The trigger was dropped before a run started; this is not an error.
    Suppressed(SuppressedReason),
    /// The run started and failed; no injection happened and the host's
    /// own generation proceeds unenhanced.
    Failed(WritersRoomError),
}

impl TriggerOutcome {
    /// Returns true if a run completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// The completed run, if any.
    #[must_use]
    pub fn run(&self) -> Option<&PipelineRun> {
        match self {
            Self::Completed(run) => Some(run),
            _ => None,
        }
    }
}

/// Clears the single-flight guard on every exit path.
struct RunGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Drives the full pipeline and retains the most recent run.
pub struct PipelineCoordinator {
    host: Arc<dyn HostBridge>,
    notifier: Arc<dyn Notifier>,
    runner: StageRunner,
    synthesizer: Synthesizer,
    running: AtomicBool,
    last_run: Mutex<Option<PipelineRun>>,
}

impl PipelineCoordinator {
    /// Creates a coordinator over the host and notifier seams.
    #[must_use]
    pub fn new(host: Arc<dyn HostBridge>, notifier: Arc<dyn Notifier>) -> Self {
        let runner = StageRunner::new(host.clone(), notifier.clone());
        let synthesizer = Synthesizer::new(host.clone(), notifier.clone());
        Self {
            host,
            notifier,
            runner,
            synthesizer,
            running: AtomicBool::new(false),
            last_run: Mutex::new(None),
        }
    }

    /// Returns true while a run is in flight.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// The most recent run, for the results viewer. Overwritten per run.
    #[must_use]
    pub fn last_run(&self) -> Option<PipelineRun> {
        self.last_run.lock().clone()
    }

    /// Attempts to run the pipeline.
    ///
    /// Suppressed (silently, with only a debug log) when the global enable
    /// flag is off or a run is already in flight; suppressed triggers are
    /// dropped, never queued. Fails with [`WritersRoomError::NotReady`]
    /// before any host round trip when the host is not initialized.
    pub async fn trigger(&self, settings: &PipelineSettings) -> TriggerOutcome {
        if !settings.enabled {
            debug!("pipeline disabled, trigger suppressed");
            return TriggerOutcome::Suppressed(SuppressedReason::Disabled);
        }

        // Precondition: a host that is not ready gets no commands at all.
        // The previous run's record is left in place.
        if !self.host.is_ready() {
            let err = WritersRoomError::NotReady;
            warn!("host not ready, trigger rejected");
            self.notifier.error(&err.to_string(), NOTICE_TITLE);
            return TriggerOutcome::Failed(err);
        }

        // The guard must be set before the first suspension point.
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("pipeline already running, trigger dropped");
            return TriggerOutcome::Suppressed(SuppressedReason::AlreadyRunning);
        }
        let _guard = RunGuard {
            flag: &self.running,
        };

        // A stale result must never be shown as current.
        self.last_run.lock().take();

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(run_id = %run_id, "starting pipeline run");

        let drafts = match self.runner.run_stages(settings).await {
            Ok(drafts) => drafts,
            Err(err) => return self.fail_run(run_id, started_at, &err).await,
        };

        let (final_text, synthesis) = match self.resolve_final(&drafts, settings).await {
            Ok(resolved) => resolved,
            Err(err) => return self.fail_run(run_id, started_at, &err).await,
        };

        self.host
            .inject(Injection::new(FINAL_INJECTION_ID, final_text.clone()))
            .await;
        self.notifier
            .success("Final draft is ready.", NOTICE_TITLE);

        let run = PipelineRun {
            run_id,
            started_at,
            finished_at: Utc::now(),
            stage_a: drafts.stage_a,
            stage_b: drafts.stage_b,
            synthesis,
            final_text: Some(final_text),
        };
        *self.last_run.lock() = Some(run.clone());

        info!(run_id = %run_id, "pipeline run completed");
        TriggerOutcome::Completed(run)
    }

    /// Picks the final text from the settled drafts.
    ///
    /// Synthesis runs only when it is enabled and both drafts exist; its
    /// failure is recovered here by falling back to draft A, then draft B.
    /// A lone draft is returned directly without a degraded one-input
    /// synthesis pass.
    async fn resolve_final(
        &self,
        drafts: &DraftSet,
        settings: &PipelineSettings,
    ) -> Result<(String, StageResult), WritersRoomError> {
        match (drafts.draft_a(), drafts.draft_b()) {
            (Some(a), Some(b)) => {
                if !settings.stage(StageId::Synthesis).enabled {
                    debug!("synthesis disabled, returning Stage A draft");
                    return Ok((a.to_string(), StageResult::skipped(StageId::Synthesis)));
                }
                match self.synthesizer.synthesize(a, b, settings).await {
                    Ok(text) => Ok((
                        text.clone(),
                        StageResult::success(StageId::Synthesis, text),
                    )),
                    Err(err) => {
                        warn!(error = %err, "synthesis failed, falling back to Stage A draft");
                        self.notifier.warning(
                            "Synthesis failed, falling back to the Stage A draft.",
                            NOTICE_TITLE,
                        );
                        Ok((
                            a.to_string(),
                            StageResult::failure(StageId::Synthesis, err.to_string()),
                        ))
                    }
                }
            }
            (Some(lone), None) | (None, Some(lone)) => {
                debug!("only one draft completed, returning it directly");
                Ok((lone.to_string(), StageResult::skipped(StageId::Synthesis)))
            }
            (None, None) => Err(WritersRoomError::NoStageOutput {
                drafts: Box::new(drafts.clone()),
            }),
        }
    }

    /// Records a failed run: consolidated error notice, stale injection
    /// removed so the next turn assembles unenhanced, no final text.
    async fn fail_run(
        &self,
        run_id: Uuid,
        started_at: chrono::DateTime<Utc>,
        err: &WritersRoomError,
    ) -> TriggerOutcome {
        error!(run_id = %run_id, error = %err, "pipeline run failed");
        self.notifier.error(&err.to_string(), NOTICE_TITLE);
        self.host.remove_injection(FINAL_INJECTION_ID).await;

        // Both terminal failure sources settle their stages into
        // `NoStageOutput`; any other error here means no stage ever ran,
        // so the stages are recorded as skipped.
        let (stage_a, stage_b) = match err {
            WritersRoomError::NoStageOutput { drafts } => {
                (drafts.stage_a.clone(), drafts.stage_b.clone())
            }
            _ => (
                StageResult::skipped(StageId::StageA),
                StageResult::skipped(StageId::StageB),
            ),
        };

        let run = PipelineRun {
            run_id,
            started_at,
            finished_at: Utc::now(),
            stage_a,
            stage_b,
            synthesis: StageResult::skipped(StageId::Synthesis),
            final_text: None,
        };
        *self.last_run.lock() = Some(run);

        TriggerOutcome::Failed(err.clone())
    }
}
