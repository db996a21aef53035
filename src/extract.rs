//! PDF text extraction with a tolerant fallback chain.
//!
//! `pdf-extract` handles font encodings better, so it goes first; `lopdf` is
//! more tolerant of malformed files and takes over when the primary fails or
//! panics. Total failure yields an empty string; the request layer turns
//! that into a validation error before any model call is made.

use lopdf::{Document, Object};

/// Extract plain text from PDF bytes, returning an empty string on total failure.
///
/// Pages are joined with blank lines so downstream chunking sees paragraph
/// breaks; the pipeline never inspects any structure beyond those.
pub fn extract_text(bytes: &[u8]) -> String {
    // pdf-extract can panic on exotic files, so the call is panic-caught.
    let primary = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));
    match primary {
        Ok(Ok(text)) if !text.trim().is_empty() => return text.trim().to_string(),
        Ok(Ok(_)) => {
            tracing::debug!("pdf-extract produced no text; trying lopdf fallback");
        }
        Ok(Err(error)) => {
            tracing::warn!(error = %error, "pdf-extract failed; trying lopdf fallback");
        }
        Err(_) => {
            tracing::warn!("pdf-extract panicked; trying lopdf fallback");
        }
    }

    match extract_via_lopdf(bytes) {
        Ok(text) => text.trim().to_string(),
        Err(error) => {
            tracing::warn!(error = %error, "lopdf fallback failed; giving up on PDF");
            String::new()
        }
    }
}

/// Walk page content streams and collect text-showing operators.
fn extract_via_lopdf(bytes: &[u8]) -> Result<String, lopdf::Error> {
    let document = Document::load_mem(bytes)?;
    let mut all_text = String::new();

    for (_page_number, page_id) in document.get_pages() {
        if let Ok(content) = document.get_page_content(page_id) {
            let operations = lopdf::content::Content::decode(&content)
                .map(|content| content.operations)
                .unwrap_or_default();

            for operation in operations {
                match operation.operator.as_str() {
                    // Tj: show a text string.
                    "Tj" => {
                        if let Some(Object::String(string_bytes, _)) = operation.operands.first() {
                            all_text.push_str(&decode_pdf_string(string_bytes));
                        }
                    }
                    // TJ: show a text array with kerning adjustments.
                    "TJ" => {
                        if let Some(Object::Array(items)) = operation.operands.first() {
                            for item in items {
                                if let Object::String(string_bytes, _) = item {
                                    all_text.push_str(&decode_pdf_string(string_bytes));
                                }
                            }
                        }
                    }
                    // Text positioning that indicates a line break.
                    "Td" | "TD" | "T*" | "'" | "\"" => {
                        if !all_text.ends_with('\n') && !all_text.ends_with(' ') {
                            all_text.push(' ');
                        }
                    }
                    "ET" => {
                        if !all_text.ends_with('\n') {
                            all_text.push('\n');
                        }
                    }
                    _ => {}
                }
            }
        }
        // Page break becomes a paragraph break for the chunker.
        all_text.push('\n');
    }

    Ok(all_text)
}

fn decode_pdf_string(bytes: &[u8]) -> String {
    // UTF-8 first, Latin-1 fallback.
    String::from_utf8(bytes.to_vec())
        .unwrap_or_else(|_| bytes.iter().map(|&byte| byte as char).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_yield_empty_string() {
        assert_eq!(extract_text(b"definitely not a pdf"), "");
    }

    #[test]
    fn empty_input_yields_empty_string() {
        assert_eq!(extract_text(b""), "");
    }
}
