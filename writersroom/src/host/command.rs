//! Typed command builder for the host's script micro-grammar.
//!
//! Commands are `<verb> <args...>` strings joined by a pipe separator for
//! sequential execution. The surface syntax is host-defined; everything
//! upstream of [`join_script`] works with typed verbs only.

use std::fmt;

/// Separator between commands in a joined script.
const COMMAND_SEPARATOR: &str = " | ";

/// Options record sent with every script execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOptions {
    /// Whether the host should render intermediate output in its UI.
    pub show_output: bool,
    /// Whether the host should trap execution errors into the result
    /// record instead of failing the transport.
    pub handle_execution_errors: bool,
}

impl CommandOptions {
    /// The options used for every pipeline call: no intermediate UI
    /// output, errors reported in-band.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            show_output: false,
            handle_execution_errors: true,
        }
    }
}

/// Result record returned by the host for one script execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOutcome {
    /// Whether the host reported an execution error.
    pub is_error: bool,
    /// The host's error message, empty on success.
    pub error_message: String,
    /// The piped output of the last command, empty when nothing was
    /// generated.
    pub pipe: String,
}

impl CommandOutcome {
    /// Creates a successful outcome with piped output.
    #[must_use]
    pub fn ok(pipe: impl Into<String>) -> Self {
        Self {
            is_error: false,
            error_message: String::new(),
            pipe: pipe.into(),
        }
    }

    /// Creates an error outcome.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            error_message: message.into(),
            pipe: String::new(),
        }
    }
}

/// One command in the host's script grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// Selects a generation preset.
    SelectPreset {
        /// Preset name.
        name: String,
    },
    /// Selects the active API provider.
    SelectApi {
        /// Connect slug from the provider table.
        slug: &'static str,
        /// Endpoint URL, attached for the custom provider.
        url: Option<String>,
    },
    /// Selects the active model.
    SelectModel {
        /// Model name.
        name: String,
        /// Optional model source field.
        source_field: Option<String>,
    },
    /// Clears any pending scene injections.
    FlushInjections,
    /// Issues a single prompt-completion request.
    Generate {
        /// The literal prompt text.
        prompt: String,
    },
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectPreset { name } => write!(f, "/preset \"{name}\""),
            Self::SelectApi { slug, url } => {
                write!(f, "/api {slug}")?;
                if let Some(url) = url {
                    write!(f, " url={url}")?;
                }
                Ok(())
            }
            Self::SelectModel { name, source_field } => {
                write!(f, "/model \"{name}\"")?;
                if let Some(source) = source_field {
                    write!(f, " source_field={source}")?;
                }
                Ok(())
            }
            Self::FlushInjections => write!(f, "/flushinject"),
            Self::Generate { prompt } => {
                // JSON string quoting keeps embedded quotes, pipes, and
                // newlines from being parsed as script syntax. The trailing
                // pipe suppresses the host echoing the result.
                let quoted = serde_json::Value::String(prompt.clone()).to_string();
                write!(f, "/gen {quoted} |")
            }
        }
    }
}

/// Joins commands into a single script for one execution round trip.
#[must_use]
pub fn join_script(commands: &[HostCommand]) -> String {
    commands
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(COMMAND_SEPARATOR)
}
