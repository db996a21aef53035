//! Document pipeline: chunking, map-reduce summarization, relevance gating,
//! and context-restricted question answering.

mod answer;
pub mod chunking;
mod relevance;
mod service;
pub mod similarity;
mod summarize;
pub mod types;

pub use relevance::REJECTION_MESSAGE;
pub use service::{DocumentApi, DocumentService};
pub use types::{AnswerOutcome, ProcessingError, RelevanceDecision, SummarizeOutcome};

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::gateway::{GatewayError, LanguageModelClient};

    /// Gateway stub that replays scripted results and records every prompt.
    #[derive(Default)]
    pub(crate) struct ScriptedGateway {
        chat_replies: Mutex<VecDeque<Result<String, GatewayError>>>,
        embed_replies: Mutex<VecDeque<Result<Vec<f32>, GatewayError>>>,
        pub(crate) chat_prompts: Mutex<Vec<String>>,
        pub(crate) embed_inputs: Mutex<Vec<String>>,
    }

    impl ScriptedGateway {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn push_chat(&self, reply: Result<String, GatewayError>) {
            self.chat_replies.lock().unwrap().push_back(reply);
        }

        pub(crate) fn push_embed(&self, reply: Result<Vec<f32>, GatewayError>) {
            self.embed_replies.lock().unwrap().push_back(reply);
        }

        pub(crate) fn chat_calls(&self) -> usize {
            self.chat_prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LanguageModelClient for ScriptedGateway {
        async fn chat(
            &self,
            prompt: &str,
            _max_output_tokens: u32,
        ) -> Result<String, GatewayError> {
            self.chat_prompts.lock().unwrap().push(prompt.to_string());
            self.chat_replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(GatewayError::RequestFailed(
                        "unexpected chat call".to_string(),
                    ))
                })
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>, GatewayError> {
            self.embed_inputs.lock().unwrap().push(text.to_string());
            self.embed_replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(GatewayError::RequestFailed(
                        "unexpected embed call".to_string(),
                    ))
                })
        }
    }
}
