//! Context-restricted question answering.

use crate::gateway::{GatewayError, LanguageModelClient};

pub(crate) fn answer_prompt(context_text: &str, question: &str) -> String {
    format!(
        "You are a helpful assistant. Use ONLY the provided context to answer the user's \
         question. If the answer cannot be found in the context, say you don't have enough \
         information.\n\nContext:\n{context_text}\n\nQuestion: {question}\n\nAnswer:"
    )
}

/// Answer `question` strictly from `context_text` with a single chat call.
///
/// The full context is passed in one call; oversized context is a provider
/// capacity concern and surfaces as the provider's own error.
pub(crate) async fn answer_question(
    client: &(dyn LanguageModelClient + Send + Sync),
    context_text: &str,
    question: &str,
    num_predict: u32,
) -> Result<String, GatewayError> {
    client
        .chat(&answer_prompt(context_text, question), num_predict)
        .await
}
