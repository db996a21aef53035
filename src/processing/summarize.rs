//! Map-reduce summarization over paragraph-aligned chunks.
//!
//! Each retained chunk gets one chat call producing bullet points ("map"),
//! then a single merge call combines them into one coherent summary
//! ("reduce"). A document that fits in one chunk skips the merge round-trip
//! and returns the sole bullet summary verbatim. Calls are issued one at a
//! time, in chunk order, which keeps the provider traffic deterministic and
//! rate-limit-friendly.

use crate::gateway::{GatewayError, LanguageModelClient};

use super::chunking::split_into_chunks;
use super::types::SummarizeOutcome;

pub(crate) fn bullet_prompt(chunk: &str) -> String {
    format!(
        "Summarize the following text into clear, structured bullet points with headings \
         where appropriate. Be concise and non-redundant.\n\n{chunk}"
    )
}

pub(crate) fn merge_prompt(bullet_summaries: &[String]) -> String {
    let labeled = bullet_summaries
        .iter()
        .enumerate()
        .map(|(index, summary)| format!("Chunk {}:\n{summary}", index + 1))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "Merge the following bullet-point summaries into one coherent, de-duplicated \
         summary with clear headings.\n\n{labeled}"
    )
}

/// Summarize `text` of any length into one final summary.
///
/// Chunks beyond `max_chunks` are silently dropped; this bounds cost and
/// latency and is reported through [`SummarizeOutcome`], not as an error.
/// Any chat failure aborts the whole operation with no partial output.
pub(crate) async fn summarize_text(
    client: &(dyn LanguageModelClient + Send + Sync),
    text: &str,
    max_chars: usize,
    max_chunks: usize,
    num_predict: u32,
) -> Result<SummarizeOutcome, GatewayError> {
    let mut chunks = split_into_chunks(text, max_chars);
    let chunks_total = chunks.len();
    if chunks.len() > max_chunks {
        tracing::debug!(
            total = chunks.len(),
            retained = max_chunks,
            "Dropping chunks beyond the configured cap"
        );
        chunks.truncate(max_chunks);
    }

    let mut bullet_summaries = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        bullet_summaries.push(client.chat(&bullet_prompt(chunk), num_predict).await?);
    }

    if bullet_summaries.len() == 1 {
        return Ok(SummarizeOutcome {
            summary: bullet_summaries.remove(0),
            chunks_total,
            chunks_summarized: 1,
        });
    }

    let summary = client
        .chat(&merge_prompt(&bullet_summaries), num_predict)
        .await?;

    Ok(SummarizeOutcome {
        summary,
        chunks_total,
        chunks_summarized: chunks.len(),
    })
}
