//! Paragraph-aligned chunking under a character budget.
//!
//! Chunk boundaries never fall inside a paragraph: paragraphs (text separated
//! by a blank line) are accumulated until the budget would be exceeded, then
//! flushed as one chunk. A lone paragraph larger than the budget becomes its
//! own oversized chunk rather than being split mid-paragraph, trading an
//! occasional budget overrun for intact semantic units.

/// Paragraph delimiter used for both splitting and chunk reassembly.
const PARAGRAPH_DELIMITER: &str = "\n\n";

/// Split `text` into ordered chunks of at most `max_chars` characters.
///
/// Inputs that already fit the budget are returned as a single chunk without
/// any splitting overhead. Joining the returned chunks with the paragraph
/// delimiter reconstructs the input exactly.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for paragraph in text.split(PARAGRAPH_DELIMITER) {
        // Delimiter cost is counted against the budget alongside the paragraph.
        let paragraph_len = paragraph.chars().count() + PARAGRAPH_DELIMITER.len();
        if current_len + paragraph_len > max_chars && !current.is_empty() {
            chunks.push(current.join(PARAGRAPH_DELIMITER));
            current_len = paragraph_len - PARAGRAPH_DELIMITER.len();
            current = vec![paragraph];
        } else {
            current.push(paragraph);
            current_len += paragraph_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(PARAGRAPH_DELIMITER));
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_returns_single_chunk() {
        let text = "First paragraph.\n\nSecond paragraph.";
        let chunks = split_into_chunks(text, 4000);
        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn chunks_rejoin_to_original_text() {
        let text = "aaaa\n\nbbbb\n\ncccc\n\ndddd\n\neeee";
        let chunks = split_into_chunks(text, 14);
        assert!(chunks.len() > 1);
        assert_eq!(chunks.join("\n\n"), text);
    }

    #[test]
    fn boundaries_never_split_paragraphs() {
        let text = "aaaa\n\nbbbb\n\ncccc";
        let chunks = split_into_chunks(text, 10);
        assert_eq!(chunks, vec!["aaaa".to_string(), "bbbb\n\ncccc".to_string()]);
        for chunk in &chunks {
            for paragraph in chunk.split("\n\n") {
                assert!(text.split("\n\n").any(|original| original == paragraph));
            }
        }
    }

    #[test]
    fn oversized_paragraph_kept_whole() {
        let paragraph = "x".repeat(50);
        let text = format!("intro\n\n{paragraph}\n\noutro");
        let chunks = split_into_chunks(&text, 20);
        assert!(chunks.contains(&paragraph));
    }

    #[test]
    fn budget_counts_characters_not_bytes() {
        // Four three-byte characters per paragraph; a byte-based budget would
        // flush after the first paragraph already.
        let text = "ééé é\n\nééé é";
        let chunks = split_into_chunks(text, 7);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks.join("\n\n"), text);
    }

    #[test]
    fn chunking_is_deterministic() {
        let text = "aaaa\n\nbbbb\n\ncccc\n\ndddd";
        assert_eq!(split_into_chunks(text, 12), split_into_chunks(text, 12));
    }
}
