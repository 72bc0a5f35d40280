//! Synthesizer.
//!
//! The final generation pass that merges the two drafts via template
//! substitution. Failure here is signalled to the coordinator, which owns
//! the fallback decision; this component never silently returns an empty
//! string.

use crate::errors::WritersRoomError;
use crate::host::{HostBridge, Notifier};
use crate::pipeline::{EnvironmentConfigurator, GenerationExecutor, NOTICE_TITLE};
use crate::prompts::{render_synthesis, stage_prompt};
use crate::settings::{PipelineSettings, StageId};
use std::sync::Arc;
use tracing::{debug, info};

/// Merges the two draft outputs into one final text.
pub struct Synthesizer {
    notifier: Arc<dyn Notifier>,
    configurator: EnvironmentConfigurator,
    executor: GenerationExecutor,
}

impl Synthesizer {
    /// Creates a synthesizer over the host and notifier seams.
    #[must_use]
    pub fn new(host: Arc<dyn HostBridge>, notifier: Arc<dyn Notifier>) -> Self {
        let configurator = EnvironmentConfigurator::new(host.clone(), notifier.clone());
        let executor = GenerationExecutor::new(host);
        Self {
            notifier,
            configurator,
            executor,
        }
    }

    /// Runs the synthesis pass over two non-empty drafts.
    ///
    /// Configures the Synthesis environment, renders the template with both
    /// drafts substituted verbatim, and runs one generation. Empty or
    /// whitespace-only output is reported as a Synthesis-stage failure.
    pub async fn synthesize(
        &self,
        response_a: &str,
        response_b: &str,
        settings: &PipelineSettings,
    ) -> Result<String, WritersRoomError> {
        let config = settings.stage(StageId::Synthesis);

        self.notifier
            .info("Synthesis - Combining the best elements...", NOTICE_TITLE);

        self.configurator
            .configure_stage(StageId::Synthesis, config)
            .await?;

        let template = stage_prompt(StageId::Synthesis, config);
        let prompt = render_synthesis(template, response_a, response_b);
        debug!(prompt_len = prompt.len(), "synthesis prompt rendered");

        let text = self.executor.generate(&prompt).await?;
        if text.trim().is_empty() {
            return Err(WritersRoomError::EmptyOutput {
                stage: StageId::Synthesis,
            });
        }

        info!("synthesis completed");
        Ok(text)
    }
}
