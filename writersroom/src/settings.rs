//! Pipeline settings and per-stage configuration.
//!
//! Settings are owned by the host's persisted-settings store; this module
//! defines their typed shape and the load-defaults-merge-with-persisted
//! initialization step. Stage fields are reached through an explicit
//! [`StageId`] lookup rather than dynamic key access.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// The preset name meaning "leave the active preset alone".
pub const DEFAULT_PRESET: &str = "Default";

/// Identifies one independently configurable generation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    /// First draft generation.
    StageA,
    /// Second draft generation.
    StageB,
    /// Final pass merging the two drafts.
    Synthesis,
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StageA => write!(f, "Stage A"),
            Self::StageB => write!(f, "Stage B"),
            Self::Synthesis => write!(f, "Synthesis"),
        }
    }
}

/// Logical configuration for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Whether the stage runs at all.
    pub enabled: bool,
    /// Generation preset to select; [`DEFAULT_PRESET`] keeps the active one.
    pub preset: String,
    /// Raw API provider value from settings; validated at configure time so
    /// an unrecognized value fails the stage instead of the load.
    pub api_provider: Option<String>,
    /// Model to select; empty means "keep the active model".
    pub model: String,
    /// Endpoint URL, only meaningful when the provider is `custom`.
    pub custom_url: String,
    /// Model source field attached to the model-select command when present.
    pub source_field: String,
    /// Prompt override; empty means "use the built-in default template".
    pub prompt: String,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            preset: DEFAULT_PRESET.to_string(),
            api_provider: None,
            model: String::new(),
            custom_url: String::new(),
            source_field: String::new(),
            prompt: String::new(),
        }
    }
}

impl StageConfig {
    /// Returns true if the stage has no environment overrides at all, in
    /// which case the ambient host environment is used as-is.
    #[must_use]
    pub fn has_overrides(&self) -> bool {
        !self.preset.is_empty() && self.preset != DEFAULT_PRESET
            || self.api_provider.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// The full pipeline configuration read at run start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Global enable flag; triggers are silently dropped when false.
    pub enabled: bool,
    /// Stage A configuration.
    pub stage_a: StageConfig,
    /// Stage B configuration.
    pub stage_b: StageConfig,
    /// Synthesis stage configuration.
    pub synthesis: StageConfig,
}

impl PipelineSettings {
    /// Typed lookup of the configuration for one stage.
    #[must_use]
    pub fn stage(&self, id: StageId) -> &StageConfig {
        match id {
            StageId::StageA => &self.stage_a,
            StageId::StageB => &self.stage_b,
            StageId::Synthesis => &self.synthesis,
        }
    }

    /// Mutable typed lookup, used by the settings UI layer.
    pub fn stage_mut(&mut self, id: StageId) -> &mut StageConfig {
        match id {
            StageId::StageA => &mut self.stage_a,
            StageId::StageB => &mut self.stage_b,
            StageId::Synthesis => &mut self.synthesis,
        }
    }

    /// Loads settings from the host's persisted record, merging missing
    /// fields with defaults. An unreadable record falls back to defaults
    /// entirely; persistence stays with the host.
    #[must_use]
    pub fn from_persisted(value: serde_json::Value) -> Self {
        match serde_json::from_value(value) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(error = %err, "persisted settings unreadable, using defaults");
                Self::default()
            }
        }
    }
}
