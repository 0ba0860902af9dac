//! Language model provider configuration.

use serde::{Deserialize, Serialize};

use super::prompts::DEFAULT_ANSWER_PROMPT;

/// Language model provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Ollama API (local, default)
    #[default]
    Ollama,
    /// OpenAI-compatible chat completions API
    OpenAI,
}

impl LlmProvider {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "openai" | "groq" | "together" => Some(Self::OpenAI),
            _ => None,
        }
    }

    /// Endpoint used when none is configured.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Ollama => "http://localhost:11434",
            Self::OpenAI => "https://api.openai.com",
        }
    }
}

/// Configuration for answer synthesis through a language model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Use the language model; when false the offline digest is used.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub provider: LlmProvider,
    /// API endpoint; provider default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// API key for OpenAI-compatible providers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature for generation (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Prompt template with `{query}` and `{insights}` placeholders.
    #[serde(default)]
    pub answer_prompt: Option<String>,
}

fn default_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_max_tokens() -> u32 {
    512
}

fn default_temperature() -> f32 {
    0.3
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl LlmConfig {
    /// Defaults without environment overrides.
    pub fn base_default() -> Self {
        Self {
            enabled: false,
            provider: LlmProvider::default(),
            endpoint: None,
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            answer_prompt: None,
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `LLM_ENABLED`: "true" or "false"
    /// - `LLM_PROVIDER`: "ollama" (default), "openai", "groq" or "together"
    /// - `LLM_ENDPOINT`: API endpoint
    /// - `LLM_API_KEY`: API key (falls back to `OPENAI_API_KEY` for openai)
    /// - `LLM_MODEL`: model name
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("LLM_ENABLED") {
            self.enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }
        if let Some(provider) = std::env::var("LLM_PROVIDER")
            .ok()
            .and_then(|v| LlmProvider::parse(&v))
        {
            self.provider = provider;
        }
        if let Ok(val) = std::env::var("LLM_ENDPOINT") {
            if !val.is_empty() {
                self.endpoint = Some(val);
            }
        }
        if let Ok(val) = std::env::var("LLM_API_KEY") {
            self.api_key = Some(val);
        } else if self.provider == LlmProvider::OpenAI && self.api_key.is_none() {
            self.api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        if let Ok(val) = std::env::var("LLM_MODEL") {
            if !val.is_empty() {
                self.model = val;
            }
        }
        self
    }

    /// Effective endpoint without a trailing slash.
    pub fn endpoint(&self) -> String {
        self.endpoint
            .as_deref()
            .unwrap_or(self.provider.default_endpoint())
            .trim_end_matches('/')
            .to_string()
    }

    /// The answer prompt template (custom or default).
    pub fn answer_prompt(&self) -> &str {
        self.answer_prompt.as_deref().unwrap_or(DEFAULT_ANSWER_PROMPT)
    }
}
