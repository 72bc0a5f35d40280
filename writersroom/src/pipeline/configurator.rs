//! Environment configurator.
//!
//! Translates a stage's logical settings into an ordered command sequence
//! and applies it to the host's ambient environment before generation.

use crate::errors::WritersRoomError;
use crate::host::{join_script, CommandOptions, HostBridge, HostCommand, Notifier};
use crate::pipeline::NOTICE_TITLE;
use crate::providers::ApiProvider;
use crate::prompts::preview;
use crate::settings::{StageConfig, StageId, DEFAULT_PRESET};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Configures the host environment for one stage.
pub struct EnvironmentConfigurator {
    host: Arc<dyn HostBridge>,
    notifier: Arc<dyn Notifier>,
}

impl EnvironmentConfigurator {
    /// Creates a configurator over the host and notifier seams.
    #[must_use]
    pub fn new(host: Arc<dyn HostBridge>, notifier: Arc<dyn Notifier>) -> Self {
        Self { host, notifier }
    }

    /// Applies a stage's environment overrides.
    ///
    /// Command order: preset, then provider (with URL for the custom
    /// provider), then model (with source field). A stage with no overrides
    /// accepts the ambient environment and succeeds without side effects.
    ///
    /// A host that is not ready and an unrecognized provider both fail fast
    /// before anything executes. A host execution error fails without
    /// rolling back already-applied commands; the environment is left
    /// wherever the host left it.
    pub async fn configure_stage(
        &self,
        stage: StageId,
        config: &StageConfig,
    ) -> Result<(), WritersRoomError> {
        if !self.host.is_ready() {
            warn!(stage = %stage, "environment setup requested before host ready");
            return Err(WritersRoomError::NotReady);
        }

        if !config.has_overrides() {
            debug!(stage = %stage, "no settings to apply, using current environment");
            return Ok(());
        }

        let commands = self.build_commands(stage, config)?;
        let script = join_script(&commands);
        debug!(stage = %stage, script = %script, "executing environment setup");

        let outcome = self.host.execute(&script, CommandOptions::silent()).await;
        if outcome.is_error {
            let err = WritersRoomError::command_failed(stage, outcome.error_message);
            error!(
                stage = %stage,
                script = %preview(&script, 100),
                error = %err,
                "failed to execute setup script"
            );
            self.notifier.error(
                &format!("Failed to execute setup script for {stage}. Details: {err}"),
                "Writer's Room Setup Failed",
            );
            return Err(err);
        }

        Ok(())
    }

    fn build_commands(
        &self,
        stage: StageId,
        config: &StageConfig,
    ) -> Result<Vec<HostCommand>, WritersRoomError> {
        let mut commands = Vec::new();

        if !config.preset.is_empty() && config.preset != DEFAULT_PRESET {
            commands.push(HostCommand::SelectPreset {
                name: config.preset.clone(),
            });
        }

        if let Some(raw) = config.api_provider.as_deref().filter(|p| !p.is_empty()) {
            let Some(provider) = ApiProvider::from_setting(raw) else {
                let err = WritersRoomError::unknown_provider(stage, raw);
                error!(stage = %stage, provider = %raw, "unknown API mapping");
                self.notifier.error(
                    &format!("Unknown API mapping for {stage}: \"{raw}\""),
                    NOTICE_TITLE,
                );
                return Err(err);
            };

            let url = (provider.is_custom() && !config.custom_url.is_empty())
                .then(|| config.custom_url.clone());
            commands.push(HostCommand::SelectApi {
                slug: provider.connect_slug(),
                url,
            });

            // The model select only makes sense once a provider is active.
            if !config.model.is_empty() {
                let source_field = (!config.source_field.is_empty())
                    .then(|| config.source_field.clone());
                commands.push(HostCommand::SelectModel {
                    name: config.model.clone(),
                    source_field,
                });
            }
        }

        Ok(commands)
    }
}
