//! Supported API provider table.
//!
//! Maps the provider value stored in settings to the connect slug the host
//! expects in its API-select command. An unrecognized value is a per-stage
//! configuration failure, never a panic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A recognized API provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiProvider {
    // Standard cloud APIs
    /// OpenAI.
    OpenAi,
    /// Anthropic Claude.
    Claude,
    /// OpenRouter.
    OpenRouter,
    /// Mistral AI.
    MistralAi,
    /// DeepSeek.
    DeepSeek,
    /// Cohere.
    Cohere,
    /// Groq.
    Groq,
    /// xAI.
    Xai,
    /// Perplexity.
    Perplexity,
    /// 01.AI.
    #[serde(rename = "01ai")]
    ZeroOneAi,
    /// AI/ML API.
    AimlApi,
    /// Pollinations.
    Pollinations,

    // Google APIs
    /// Google AI Studio (MakerSuite).
    MakerSuite,
    /// Google Vertex AI.
    VertexAi,

    // Local / self-hosted APIs
    /// text-generation-webui (ooba).
    TextGenerationWebUi,
    /// KoboldCpp.
    KoboldCpp,
    /// llama.cpp server.
    LlamaCpp,
    /// Ollama.
    Ollama,
    /// vLLM.
    Vllm,

    // Other / special
    /// NanoGPT.
    NanoGpt,
    /// Scale.
    Scale,
    /// Window AI.
    WindowAi,
    /// AI21.
    Ai21,
    /// Custom OpenAI-compatible endpoint; takes a URL at configure time.
    Custom,
}

impl ApiProvider {
    /// Looks up a provider from its raw (case-insensitive) settings value.
    ///
    /// Returns `None` for values outside the supported table.
    #[must_use]
    pub fn from_setting(value: &str) -> Option<Self> {
        let provider = match value.to_ascii_lowercase().as_str() {
            "openai" => Self::OpenAi,
            "claude" => Self::Claude,
            "openrouter" => Self::OpenRouter,
            "mistralai" => Self::MistralAi,
            "deepseek" => Self::DeepSeek,
            "cohere" => Self::Cohere,
            "groq" => Self::Groq,
            "xai" => Self::Xai,
            "perplexity" => Self::Perplexity,
            "01ai" => Self::ZeroOneAi,
            "aimlapi" => Self::AimlApi,
            "pollinations" => Self::Pollinations,
            "makersuite" => Self::MakerSuite,
            "vertexai" => Self::VertexAi,
            "textgenerationwebui" => Self::TextGenerationWebUi,
            "koboldcpp" => Self::KoboldCpp,
            "llamacpp" => Self::LlamaCpp,
            "ollama" => Self::Ollama,
            "vllm" => Self::Vllm,
            "nanogpt" => Self::NanoGpt,
            "scale" => Self::Scale,
            "windowai" => Self::WindowAi,
            "ai21" => Self::Ai21,
            "custom" => Self::Custom,
            _ => return None,
        };
        Some(provider)
    }

    /// The slug the host's API-select command expects.
    ///
    /// Both Google entries collapse to `google`, and text-generation-webui
    /// is known to the host as `ooba`; everything else maps one-to-one.
    #[must_use]
    pub fn connect_slug(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Claude => "claude",
            Self::OpenRouter => "openrouter",
            Self::MistralAi => "mistral",
            Self::DeepSeek => "deepseek",
            Self::Cohere => "cohere",
            Self::Groq => "groq",
            Self::Xai => "xai",
            Self::Perplexity => "perplexity",
            Self::ZeroOneAi => "01ai",
            Self::AimlApi => "aimlapi",
            Self::Pollinations => "pollinations",
            Self::MakerSuite | Self::VertexAi => "google",
            Self::TextGenerationWebUi => "ooba",
            Self::KoboldCpp => "koboldcpp",
            Self::LlamaCpp => "llamacpp",
            Self::Ollama => "ollama",
            Self::Vllm => "vllm",
            Self::NanoGpt => "nanogpt",
            Self::Scale => "scale",
            Self::WindowAi => "windowai",
            Self::Ai21 => "ai21",
            Self::Custom => "custom",
        }
    }

    /// Returns true for the custom OpenAI-compatible provider.
    #[must_use]
    pub fn is_custom(self) -> bool {
        matches!(self, Self::Custom)
    }
}

impl fmt::Display for ApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.connect_slug())
    }
}
