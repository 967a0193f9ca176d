//! LLM client configuration.

use serde::{Deserialize, Serialize};

use super::prompts::DEFAULT_METADATA_PROMPT;

const MISTRAL_ENDPOINT: &str = "https://api.mistral.ai";
const OLLAMA_ENDPOINT: &str = "http://localhost:11434";

/// LLM provider type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Ollama API (local)
    Ollama,
    /// OpenAI-compatible API (Mistral, OpenAI, Groq, Together.ai, etc.)
    #[default]
    #[serde(alias = "mistral")]
    OpenAI,
}

impl LlmProvider {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "openai" | "mistral" | "groq" | "together" => Some(Self::OpenAI),
            _ => None,
        }
    }
}

/// Configuration for LLM client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Whether the language model is consulted at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// LLM provider (ollama or openai)
    #[serde(default)]
    pub provider: LlmProvider,
    /// API endpoint without the `/v1/...` path
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key for OpenAI-compatible providers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum tokens in response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature for generation (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum characters of document text to send to the LLM
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
    /// HTTP timeout for a single request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Custom extraction prompt (uses the {content} placeholder)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    MISTRAL_ENDPOINT.to_string()
}

fn default_model() -> String {
    "mistral-tiny".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_content_chars() -> usize {
    2000
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl LlmConfig {
    /// Base default without env overrides.
    pub fn base_default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: LlmProvider::default(),
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_content_chars: default_max_content_chars(),
            timeout_secs: default_timeout_secs(),
            prompt: None,
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `LLM_ENABLED`: "true" or "false"
    /// - `LLM_PROVIDER`: "mistral" (default), "openai", "groq", "together" or "ollama"
    /// - `LLM_ENDPOINT`: API endpoint (defaults based on provider)
    /// - `LLM_API_KEY`: API key for OpenAI-compatible providers
    /// - `MISTRAL_API_KEY`: used when `LLM_API_KEY` is not set
    /// - `LLM_MODEL`: Model name
    /// - `LLM_MAX_TOKENS`: Maximum tokens in response
    /// - `LLM_TEMPERATURE`: Generation temperature (0.0-1.0)
    /// - `LLM_MAX_CONTENT_CHARS`: Max document chars to send
    /// - `LLM_PROMPT`: Custom extraction prompt
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("LLM_ENABLED") {
            self.enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }

        let explicit_provider = std::env::var("LLM_PROVIDER").ok();
        if let Some(provider) = explicit_provider.as_deref().and_then(LlmProvider::parse) {
            self.provider = provider;
        }

        // Explicit endpoint always wins
        let explicit_endpoint = std::env::var("LLM_ENDPOINT").ok();
        if let Some(ref endpoint) = explicit_endpoint {
            self.endpoint = endpoint.clone();
        } else if let Some(ref provider) = explicit_provider {
            match provider.to_lowercase().as_str() {
                "mistral" => self.endpoint = MISTRAL_ENDPOINT.to_string(),
                "groq" => self.endpoint = "https://api.groq.com/openai".to_string(),
                "openai" => self.endpoint = "https://api.openai.com".to_string(),
                "together" => self.endpoint = "https://api.together.xyz".to_string(),
                "ollama" => self.endpoint = OLLAMA_ENDPOINT.to_string(),
                _ => {}
            }
        }

        if let Ok(val) = std::env::var("LLM_API_KEY") {
            self.api_key = Some(val);
        } else if self.api_key.is_none() {
            self.api_key = std::env::var("MISTRAL_API_KEY").ok();
        }

        if let Ok(val) = std::env::var("LLM_MODEL") {
            self.model = val;
        }
        if let Ok(val) = std::env::var("LLM_MAX_TOKENS") {
            if let Ok(n) = val.parse() {
                self.max_tokens = n;
            }
        }
        if let Ok(val) = std::env::var("LLM_TEMPERATURE") {
            if let Ok(t) = val.parse() {
                self.temperature = t;
            }
        }
        if let Ok(val) = std::env::var("LLM_MAX_CONTENT_CHARS") {
            if let Ok(n) = val.parse() {
                self.max_content_chars = n;
            }
        }
        if let Ok(val) = std::env::var("LLM_PROMPT") {
            self.prompt = Some(val);
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    /// Whether a request could be authorized. Ollama needs no key.
    pub fn has_credentials(&self) -> bool {
        match self.provider {
            LlmProvider::Ollama => true,
            LlmProvider::OpenAI => self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty()),
        }
    }

    /// Get the extraction prompt, using custom or default.
    pub fn get_prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or(DEFAULT_METADATA_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_defaults() {
        let config = LlmConfig::base_default();
        assert!(config.enabled);
        assert_eq!(config.provider, LlmProvider::OpenAI);
        assert_eq!(config.endpoint, "https://api.mistral.ai");
        assert_eq!(config.model, "mistral-tiny");
        assert_eq!(config.max_tokens, 500);
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.max_content_chars, 2000);
        assert!(config.api_key.is_none());
        assert!(config.get_prompt().contains("{content}"));
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(LlmProvider::parse("Mistral"), Some(LlmProvider::OpenAI));
        assert_eq!(LlmProvider::parse("groq"), Some(LlmProvider::OpenAI));
        assert_eq!(LlmProvider::parse("ollama"), Some(LlmProvider::Ollama));
        assert_eq!(LlmProvider::parse("gpt"), None);
    }

    #[test]
    fn test_credentials() {
        let config = LlmConfig::base_default();
        assert!(!config.has_credentials());
        assert!(!config.clone().with_api_key("  ").has_credentials());
        assert!(config.clone().with_api_key("sk-test").has_credentials());

        let ollama = LlmConfig {
            provider: LlmProvider::Ollama,
            ..LlmConfig::base_default()
        };
        assert!(ollama.has_credentials());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: LlmConfig =
            serde_json::from_str(r#"{"provider": "mistral", "model": "mistral-small"}"#).unwrap();
        assert_eq!(config.provider, LlmProvider::OpenAI);
        assert_eq!(config.model, "mistral-small");
        assert_eq!(config.max_tokens, 500);
    }
}
