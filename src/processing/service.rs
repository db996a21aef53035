//! Pipeline service coordinating chunking, summarization, gating, and answering.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::Config,
    gateway::{self, GatewayError, LanguageModelClient},
    metrics::{MetricsSnapshot, PipelineMetrics},
    processing::{
        answer, relevance, summarize,
        types::{AnswerOutcome, ProcessingError, SummarizeOutcome},
    },
};

/// Coordinates the full document pipeline: chunked map-reduce summarization
/// and relevance-gated question answering.
///
/// The service owns the language model gateway and the metrics registry so
/// every HTTP handler reuses the same components. Construct it once near
/// process start and share it through an `Arc`.
pub struct DocumentService {
    gateway: Box<dyn LanguageModelClient + Send + Sync>,
    max_chars_per_chunk: usize,
    max_chunks: usize,
    num_predict: u32,
    relevance_threshold: f32,
    metrics: Arc<PipelineMetrics>,
}

/// Abstraction over the document pipeline used by the HTTP surface.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// Produce one final summary for a document of any length.
    async fn summarize_document(&self, text: &str) -> Result<SummarizeOutcome, ProcessingError>;

    /// Answer a question against a stored document, applying the relevance gate.
    async fn answer_question(
        &self,
        document_text: &str,
        summary: &str,
        question: &str,
    ) -> Result<AnswerOutcome, ProcessingError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl DocumentService {
    /// Build a new pipeline service for the configured provider.
    pub fn new(config: &Config) -> Result<Self, GatewayError> {
        tracing::info!(provider = ?config.provider, "Initializing language model gateway");
        let gateway = gateway::client_for(config)?;
        Ok(Self::from_parts(gateway, config))
    }

    fn from_parts(gateway: Box<dyn LanguageModelClient + Send + Sync>, config: &Config) -> Self {
        Self {
            gateway,
            max_chars_per_chunk: config.max_chars_per_chunk,
            max_chunks: config.max_chunks,
            num_predict: config.num_predict,
            relevance_threshold: config.relevance_threshold,
            metrics: Arc::new(PipelineMetrics::new()),
        }
    }

    /// Summarize a document via map-reduce over its chunks.
    pub async fn summarize_document(
        &self,
        text: &str,
    ) -> Result<SummarizeOutcome, ProcessingError> {
        let outcome = summarize::summarize_text(
            self.gateway.as_ref(),
            text,
            self.max_chars_per_chunk,
            self.max_chunks,
            self.num_predict,
        )
        .await?;

        self.metrics
            .record_document(outcome.chunks_summarized as u64);
        tracing::info!(
            chunks_total = outcome.chunks_total,
            chunks_summarized = outcome.chunks_summarized,
            "Document summarized"
        );
        Ok(outcome)
    }

    /// Answer a question against the stored document.
    ///
    /// The relevance gate fails open: when its embedding calls error, the
    /// failure is logged and the question proceeds to the answerer ungated
    /// rather than blocking the user on gate availability.
    pub async fn answer_question(
        &self,
        document_text: &str,
        summary: &str,
        question: &str,
    ) -> Result<AnswerOutcome, ProcessingError> {
        match relevance::assess(
            self.gateway.as_ref(),
            summary,
            question,
            self.relevance_threshold,
        )
        .await
        {
            Ok(decision) if !decision.relevant => {
                tracing::info!(
                    similarity = decision.similarity,
                    threshold = self.relevance_threshold,
                    "Question rejected by relevance gate"
                );
                self.metrics.record_rejected_question();
                return Ok(AnswerOutcome::Rejected {
                    message: relevance::REJECTION_MESSAGE.to_string(),
                    similarity: decision.similarity,
                });
            }
            Ok(decision) => {
                tracing::debug!(
                    similarity = decision.similarity,
                    "Question passed relevance gate"
                );
            }
            Err(error) => {
                tracing::warn!(error = %error, "Relevance gate unavailable; answering ungated");
            }
        }

        let answer =
            answer::answer_question(self.gateway.as_ref(), document_text, question, self.num_predict)
                .await?;
        self.metrics.record_answered_question();
        Ok(AnswerOutcome::Answered { answer })
    }

    /// Return the current pipeline metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl DocumentApi for DocumentService {
    async fn summarize_document(&self, text: &str) -> Result<SummarizeOutcome, ProcessingError> {
        DocumentService::summarize_document(self, text).await
    }

    async fn answer_question(
        &self,
        document_text: &str,
        summary: &str,
        question: &str,
    ) -> Result<AnswerOutcome, ProcessingError> {
        DocumentService::answer_question(self, document_text, summary, question).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        DocumentService::metrics_snapshot(self)
    }
}
