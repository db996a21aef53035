//! Adapter for a local Ollama runtime.
//!
//! Issues plain HTTP requests against `/api/chat` and `/api/embeddings`,
//! mirroring how the embedding adapter talks to its runtime.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::{GatewayError, LanguageModelClient};

/// Language model client backed by a local Ollama runtime.
pub struct OllamaClient {
    http: Client,
    base_url: String,
    chat_model: String,
    embedding_model: String,
    temperature: f32,
}

impl OllamaClient {
    /// Construct a client for the runtime at `base_url`.
    pub fn new(
        base_url: String,
        chat_model: String,
        embedding_model: String,
        temperature: f32,
    ) -> Self {
        let http = Client::builder()
            .user_agent("docbrief/gateway")
            .build()
            .expect("Failed to construct reqwest::Client for Ollama");
        Self {
            http,
            base_url,
            chat_model,
            embedding_model,
            temperature,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ChatMessage>,
    done: bool,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

#[async_trait]
impl LanguageModelClient for OllamaClient {
    async fn chat(&self, prompt: &str, max_output_tokens: u32) -> Result<String, GatewayError> {
        let payload = json!({
            "model": self.chat_model,
            "messages": [{ "role": "user", "content": prompt }],
            "stream": false,
            "options": {
                "num_predict": max_output_tokens,
                "temperature": self.temperature,
            }
        });

        let response = self
            .http
            .post(self.endpoint("api/chat"))
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                GatewayError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GatewayError::ProviderUnavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint("api/chat")
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: ChatResponse = response.json().await.map_err(|error| {
            GatewayError::InvalidResponse(format!("failed to decode Ollama response: {error}"))
        })?;

        if !body.done {
            return Err(GatewayError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        Ok(body
            .message
            .map(|message| message.content.trim().to_string())
            .unwrap_or_default())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, GatewayError> {
        let payload = json!({
            "model": self.embedding_model,
            "prompt": text,
        });

        let response = self
            .http
            .post(self.endpoint("api/embeddings"))
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                GatewayError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GatewayError::ProviderUnavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint("api/embeddings")
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: EmbeddingsResponse = response.json().await.map_err(|error| {
            GatewayError::InvalidResponse(format!("failed to decode Ollama response: {error}"))
        })?;

        Ok(body.embedding)
    }
}
