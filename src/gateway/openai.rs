//! Adapter for the hosted OpenAI API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::{GatewayError, LanguageModelClient};

/// Language model client backed by the hosted OpenAI API.
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
    chat_model: String,
    embedding_model: String,
    temperature: f32,
}

impl OpenAiClient {
    /// Construct a client for the API at `base_url` authenticated with `api_key`.
    pub fn new(
        base_url: String,
        api_key: String,
        chat_model: String,
        embedding_model: String,
        temperature: f32,
    ) -> Self {
        let http = Client::builder()
            .user_agent("docbrief/gateway")
            .build()
            .expect("Failed to construct reqwest::Client for OpenAI");
        Self {
            http,
            base_url,
            api_key,
            chat_model,
            embedding_model,
            temperature,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }

    async fn post(&self, path: &str, payload: serde_json::Value) -> Result<String, GatewayError> {
        let response = self
            .http
            .post(self.endpoint(path))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                GatewayError::ProviderUnavailable(format!(
                    "failed to reach OpenAI at {}: {error}",
                    self.base_url
                ))
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::NOT_FOUND {
            return Err(GatewayError::ProviderUnavailable(format!(
                "OpenAI endpoint {path} returned {status}"
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!(
                "OpenAI returned {status}: {body}"
            )));
        }

        response.text().await.map_err(|error| {
            GatewayError::InvalidResponse(format!("failed to read OpenAI response: {error}"))
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    #[serde(default)]
    data: Vec<EmbeddingEntry>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingEntry {
    embedding: Vec<f32>,
}

#[async_trait]
impl LanguageModelClient for OpenAiClient {
    async fn chat(&self, prompt: &str, max_output_tokens: u32) -> Result<String, GatewayError> {
        let payload = json!({
            "model": self.chat_model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": max_output_tokens,
            "temperature": self.temperature,
        });

        let body = self.post("v1/chat/completions", payload).await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|error| {
            GatewayError::InvalidResponse(format!("failed to decode OpenAI response: {error}"))
        })?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, GatewayError> {
        let payload = json!({
            "model": self.embedding_model,
            "input": text,
        });

        let body = self.post("v1/embeddings", payload).await?;
        let parsed: EmbeddingsResponse = serde_json::from_str(&body).map_err(|error| {
            GatewayError::InvalidResponse(format!("failed to decode OpenAI response: {error}"))
        })?;

        Ok(parsed
            .data
            .into_iter()
            .next()
            .map(|entry| entry.embedding)
            .unwrap_or_default())
    }
}
