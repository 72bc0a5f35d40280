//! Stage runner.
//!
//! Runs the enabled subset of the two draft stages and settles each
//! independently: one stage's failure never cancels its sibling. Stages
//! run sequentially because both reconfigure the same ambient host
//! environment (active API, model, preset); interleaving their
//! configuration calls would race.

use crate::errors::WritersRoomError;
use crate::host::{CommandOptions, HostBridge, HostCommand, Notifier};
use crate::pipeline::result::{DraftSet, StageResult};
use crate::pipeline::{EnvironmentConfigurator, GenerationExecutor, NOTICE_TITLE};
use crate::prompts::{preview, stage_prompt};
use crate::settings::{PipelineSettings, StageConfig, StageId};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Runs Stage A and Stage B and collects their settled results.
pub struct StageRunner {
    host: Arc<dyn HostBridge>,
    notifier: Arc<dyn Notifier>,
    configurator: EnvironmentConfigurator,
    executor: GenerationExecutor,
}

impl StageRunner {
    /// Creates a runner over the host and notifier seams.
    #[must_use]
    pub fn new(host: Arc<dyn HostBridge>, notifier: Arc<dyn Notifier>) -> Self {
        let configurator = EnvironmentConfigurator::new(host.clone(), notifier.clone());
        let executor = GenerationExecutor::new(host.clone());
        Self {
            host,
            notifier,
            configurator,
            executor,
        }
    }

    /// Runs the enabled draft stages and returns their settled results.
    ///
    /// Raises [`WritersRoomError::NoStageOutput`] when no enabled stage
    /// produced output; the settled results ride along on the error so the
    /// run can still be recorded.
    pub async fn run_stages(
        &self,
        settings: &PipelineSettings,
    ) -> Result<DraftSet, WritersRoomError> {
        let stage_a = self.run_draft(StageId::StageA, settings.stage(StageId::StageA)).await;
        let stage_b = self.run_draft(StageId::StageB, settings.stage(StageId::StageB)).await;

        let drafts = DraftSet { stage_a, stage_b };
        if !drafts.has_output() {
            return Err(WritersRoomError::NoStageOutput {
                drafts: Box::new(drafts),
            });
        }

        Ok(drafts)
    }

    async fn run_draft(&self, stage: StageId, config: &StageConfig) -> StageResult {
        if !config.enabled {
            debug!(stage = %stage, "stage disabled, skipping");
            return StageResult::skipped(stage);
        }

        self.notifier.info(stage_notice(stage), NOTICE_TITLE);

        match self.execute_draft(stage, config).await {
            Ok(text) => {
                info!(stage = %stage, response_preview = %preview(&text, 150), "stage completed");
                StageResult::success(stage, text)
            }
            Err(err) => {
                error!(stage = %stage, error = %err, "stage failed");
                // Configuration errors already produced their own toast.
                if !matches!(
                    err,
                    WritersRoomError::UnknownProvider { .. }
                        | WritersRoomError::CommandFailed { .. }
                ) {
                    self.notifier
                        .error(&format!("{stage} failed: {err}"), NOTICE_TITLE);
                }
                StageResult::failure(stage, err.to_string())
            }
        }
    }

    async fn execute_draft(
        &self,
        stage: StageId,
        config: &StageConfig,
    ) -> Result<String, WritersRoomError> {
        self.configurator.configure_stage(stage, config).await?;
        self.flush_injections(stage).await;

        let prompt = stage_prompt(stage, config);
        let text = self.executor.generate(prompt).await?;

        if text.trim().is_empty() {
            return Err(WritersRoomError::EmptyOutput { stage });
        }

        Ok(text)
    }

    /// Clears pending scene injections so a previous run's staged text
    /// cannot leak into this stage's prompt assembly. Best effort: a flush
    /// failure is logged but does not fail the stage.
    async fn flush_injections(&self, stage: StageId) {
        debug!(stage = %stage, "flushing pending injections");
        let script = HostCommand::FlushInjections.to_string();
        let outcome = self.host.execute(&script, CommandOptions::silent()).await;
        if outcome.is_error {
            warn!(stage = %stage, error = %outcome.error_message, "flush failed");
        }
    }
}

fn stage_notice(stage: StageId) -> &'static str {
    match stage {
        StageId::StageA => "Stage A - Crafting consistent prose...",
        StageId::StageB => "Stage B - Adding creative elements...",
        StageId::Synthesis => "Synthesis - Combining the best elements...",
    }
}
