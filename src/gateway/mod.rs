//! Language model gateway: a provider-agnostic chat and embedding interface.
//!
//! The rest of the pipeline talks to exactly two operations, `chat` and `embed`,
//! behind the [`LanguageModelClient`] trait. Backend selection happens once at
//! startup via [`client_for`]; adding a provider means adding one adapter module
//! here and one arm to the factory.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Config, ProviderKind};

mod ollama;
mod openai;

pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

/// Errors raised by language model providers.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Provider is missing, misconfigured, or unreachable.
    #[error("Language model provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider accepted the request but returned an error response.
    #[error("Language model request failed: {0}")]
    RequestFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by language model backends.
///
/// An empty string from `chat` or an empty vector from `embed` means the
/// provider returned no usable content; callers degrade gracefully instead of
/// treating that as a failure. The gateway never retries on its own.
#[async_trait]
pub trait LanguageModelClient {
    /// Send a single-turn chat request and return the trimmed text content.
    async fn chat(&self, prompt: &str, max_output_tokens: u32) -> Result<String, GatewayError>;

    /// Produce an embedding vector for the supplied text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, GatewayError>;
}

/// Build a language model client for the configured provider.
///
/// Misconfiguration that makes the backend unusable (a missing API key for the
/// hosted provider) surfaces here as [`GatewayError::ProviderUnavailable`]
/// rather than on the first call.
pub fn client_for(
    config: &Config,
) -> Result<Box<dyn LanguageModelClient + Send + Sync>, GatewayError> {
    match config.provider {
        ProviderKind::Ollama => Ok(Box::new(OllamaClient::new(
            config.ollama_url.clone(),
            config.chat_model.clone(),
            config.embedding_model.clone(),
            config.temperature,
        ))),
        ProviderKind::OpenAi => {
            let api_key = config.openai_api_key.clone().ok_or_else(|| {
                GatewayError::ProviderUnavailable(
                    "OPENAI_API_KEY is not set for the openai provider".to_string(),
                )
            })?;
            Ok(Box::new(OpenAiClient::new(
                config.openai_base_url.clone(),
                api_key,
                config.chat_model.clone(),
                config.embedding_model.clone(),
                config.temperature,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;

    fn base_config() -> Config {
        Config {
            provider: ProviderKind::Ollama,
            chat_model: "llama3.2".into(),
            embedding_model: "nomic-embed-text".into(),
            ollama_url: "http://127.0.0.1:11434".into(),
            openai_api_key: None,
            openai_base_url: "https://api.openai.com".into(),
            max_chars_per_chunk: 4000,
            max_chunks: 4,
            num_predict: 300,
            temperature: 0.2,
            relevance_threshold: 0.3,
            server_port: None,
        }
    }

    #[test]
    fn ollama_provider_builds_without_credentials() {
        assert!(client_for(&base_config()).is_ok());
    }

    #[test]
    fn openai_provider_requires_api_key() {
        let config = Config {
            provider: ProviderKind::OpenAi,
            ..base_config()
        };
        let error = match client_for(&config) {
            Ok(_) => panic!("missing key rejected"),
            Err(error) => error,
        };
        assert!(matches!(error, GatewayError::ProviderUnavailable(message) if message.contains("OPENAI_API_KEY")));
    }

    #[test]
    fn openai_provider_builds_with_api_key() {
        let config = Config {
            provider: ProviderKind::OpenAi,
            openai_api_key: Some("sk-test".into()),
            ..base_config()
        };
        assert!(client_for(&config).is_ok());
    }
}
