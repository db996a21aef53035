//! Core data types and error definitions for the document pipeline.

use thiserror::Error;

/// Errors emitted by the document pipeline.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// A chat or embedding call against the language model backend failed.
    #[error(transparent)]
    Gateway(#[from] crate::gateway::GatewayError),
}

/// Summary of a completed summarization produced by
/// [`crate::processing::DocumentService::summarize_document`].
#[derive(Debug, Clone)]
pub struct SummarizeOutcome {
    /// Final merged summary returned to the caller.
    pub summary: String,
    /// Number of chunks the document split into.
    pub chunks_total: usize,
    /// Number of chunks actually summarized after applying the cap.
    pub chunks_summarized: usize,
}

/// Result of answering a question against the stored document.
#[derive(Debug, Clone)]
pub enum AnswerOutcome {
    /// The question passed the relevance gate and was answered from context.
    Answered {
        /// Model-produced answer text.
        answer: String,
    },
    /// The relevance gate scored the question below the threshold.
    Rejected {
        /// Fixed user-facing message explaining the rejection.
        message: String,
        /// Cosine similarity between summary and question embeddings.
        similarity: f32,
    },
}

/// Outcome of scoring a question against the stored document summary.
#[derive(Debug, Clone, Copy)]
pub struct RelevanceDecision {
    /// Whether the similarity met the configured threshold.
    pub relevant: bool,
    /// Cosine similarity between the summary and question embeddings.
    pub similarity: f32,
}
