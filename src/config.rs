use serde::Deserialize;
use std::env;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Docbrief server.
///
/// Constructed once at process start and passed by reference to the
/// components that need it; every tunable has a default so an empty
/// environment yields a working local setup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Language model backend used for chat and embedding calls.
    pub provider: ProviderKind,
    /// Chat model identifier passed to the provider.
    pub chat_model: String,
    /// Embedding model identifier passed to the provider.
    pub embedding_model: String,
    /// Base URL of the local Ollama runtime.
    pub ollama_url: String,
    /// API key for the hosted OpenAI backend.
    pub openai_api_key: Option<String>,
    /// Base URL of the hosted OpenAI-compatible API.
    pub openai_base_url: String,
    /// Character budget per summarization chunk.
    pub max_chars_per_chunk: usize,
    /// Maximum number of chunks summarized per document; the rest are dropped.
    pub max_chunks: usize,
    /// Generation-length cap forwarded with every chat call.
    pub num_predict: u32,
    /// Sampling temperature forwarded with every chat call.
    pub temperature: f32,
    /// Minimum summary/question cosine similarity accepted by the relevance gate.
    pub relevance_threshold: f32,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

/// Supported language model backends.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local Ollama runtime.
    Ollama,
    /// Hosted OpenAI API.
    OpenAi,
}

const DEFAULT_CHAT_MODEL: &str = "llama3.2";
const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";
const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            provider: load_env_optional("LLM_PROVIDER")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|()| ConfigError::InvalidValue("LLM_PROVIDER".to_string()))
                })
                .transpose()?
                .unwrap_or(ProviderKind::Ollama),
            chat_model: load_env_optional("CHAT_MODEL")
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            embedding_model: load_env_optional("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            ollama_url: load_env_optional("OLLAMA_URL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            openai_api_key: load_env_optional("OPENAI_API_KEY"),
            openai_base_url: load_env_optional("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            max_chars_per_chunk: parse_env_or("LLM_MAX_CHARS", 4000)?,
            max_chunks: parse_env_or("LLM_MAX_CHUNKS", 4)?,
            num_predict: parse_env_or("LLM_NUM_PREDICT", 300)?,
            temperature: parse_env_or("LLM_TEMPERATURE", 0.2)?,
            relevance_threshold: parse_env_or("RELEVANCE_THRESHOLD", 0.3)?,
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
        .map(|value| value.unwrap_or(default))
}

impl std::str::FromStr for ProviderKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAi),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_env(key: &str, value: &str) {
        // SAFETY: Tests mutate the process environment sequentially within one test body.
        unsafe { env::set_var(key, value) }
    }

    fn clear_env(key: &str) {
        // SAFETY: See `set_env`.
        unsafe { env::remove_var(key) }
    }

    const ALL_KEYS: &[&str] = &[
        "LLM_PROVIDER",
        "CHAT_MODEL",
        "EMBEDDING_MODEL",
        "OLLAMA_URL",
        "OPENAI_API_KEY",
        "OPENAI_BASE_URL",
        "LLM_MAX_CHARS",
        "LLM_MAX_CHUNKS",
        "LLM_NUM_PREDICT",
        "LLM_TEMPERATURE",
        "RELEVANCE_THRESHOLD",
        "SERVER_PORT",
    ];

    #[test]
    fn from_env_scenarios() {
        for key in ALL_KEYS {
            clear_env(key);
        }

        let config = Config::from_env().expect("defaults load");
        assert_eq!(config.provider, ProviderKind::Ollama);
        assert_eq!(config.chat_model, "llama3.2");
        assert_eq!(config.embedding_model, "nomic-embed-text");
        assert_eq!(config.max_chars_per_chunk, 4000);
        assert_eq!(config.max_chunks, 4);
        assert_eq!(config.num_predict, 300);
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert!((config.relevance_threshold - 0.3).abs() < f32::EPSILON);
        assert!(config.server_port.is_none());

        set_env("LLM_PROVIDER", "openai");
        set_env("LLM_MAX_CHARS", "2000");
        let config = Config::from_env().expect("overrides load");
        assert_eq!(config.provider, ProviderKind::OpenAi);
        assert_eq!(config.max_chars_per_chunk, 2000);

        set_env("LLM_MAX_CHARS", "not-a-number");
        let error = Config::from_env().expect_err("invalid numeric rejected");
        assert!(matches!(error, ConfigError::InvalidValue(key) if key == "LLM_MAX_CHARS"));
        clear_env("LLM_MAX_CHARS");

        set_env("LLM_PROVIDER", "bedrock");
        let error = Config::from_env().expect_err("unknown provider rejected");
        assert!(matches!(error, ConfigError::InvalidValue(key) if key == "LLM_PROVIDER"));
        clear_env("LLM_PROVIDER");
    }
}
