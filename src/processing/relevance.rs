//! Embedding-based relevance gate for incoming questions.
//!
//! The gate compares a question's embedding against the stored document
//! summary's embedding. It is a heuristic scope filter, not a hard guarantee:
//! false positives and negatives are expected near the threshold boundary,
//! which is why the threshold stays a tunable. Scores are computed fresh per
//! question, never cached.

use crate::gateway::{GatewayError, LanguageModelClient};

use super::similarity::cosine_similarity;
use super::types::RelevanceDecision;

/// Fixed reply returned when a question is turned away by the gate.
pub const REJECTION_MESSAGE: &str =
    "That question doesn't seem related to the uploaded document. \
     Try asking about something the document covers.";

/// Score `question` against `summary` and compare to `threshold`.
///
/// Embedding failures propagate so the caller can apply its fail-open policy;
/// an empty embedding from a degraded provider scores 0.0 instead of erroring.
pub(crate) async fn assess(
    client: &(dyn LanguageModelClient + Send + Sync),
    summary: &str,
    question: &str,
    threshold: f32,
) -> Result<RelevanceDecision, GatewayError> {
    let summary_embedding = client.embed(summary).await?;
    let question_embedding = client.embed(question).await?;
    let similarity = cosine_similarity(&summary_embedding, &question_embedding);

    Ok(RelevanceDecision {
        relevant: similarity >= threshold,
        similarity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::testing::ScriptedGateway;

    #[tokio::test]
    async fn below_threshold_is_rejected_with_score() {
        let gateway = ScriptedGateway::new();
        gateway.push_embed(Ok(vec![1.0, 0.0]));
        gateway.push_embed(Ok(vec![0.0, 1.0]));

        let decision = assess(&gateway, "summary", "unrelated question", 0.3)
            .await
            .expect("assess succeeds");

        assert!(!decision.relevant);
        assert_eq!(decision.similarity, 0.0);
    }

    #[tokio::test]
    async fn at_threshold_is_accepted() {
        let gateway = ScriptedGateway::new();
        gateway.push_embed(Ok(vec![1.0, 0.0]));
        gateway.push_embed(Ok(vec![1.0, 0.0]));

        let decision = assess(&gateway, "summary", "related question", 0.3)
            .await
            .expect("assess succeeds");

        assert!(decision.relevant);
        assert!((decision.similarity - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn empty_embedding_scores_zero() {
        let gateway = ScriptedGateway::new();
        gateway.push_embed(Ok(Vec::new()));
        gateway.push_embed(Ok(vec![1.0, 0.0]));

        let decision = assess(&gateway, "summary", "question", 0.3)
            .await
            .expect("assess succeeds");

        assert!(!decision.relevant);
        assert_eq!(decision.similarity, 0.0);
    }

    #[tokio::test]
    async fn embedding_failure_propagates() {
        let gateway = ScriptedGateway::new();
        gateway.push_embed(Err(GatewayError::ProviderUnavailable("down".into())));

        let error = assess(&gateway, "summary", "question", 0.3)
            .await
            .expect_err("failure propagates");

        assert!(matches!(error, GatewayError::ProviderUnavailable(_)));
    }
}
