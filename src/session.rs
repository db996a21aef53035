//! Per-session document storage.
//!
//! One active document per session: each upload replaces the previous record
//! wholesale, and each session's state is logically single-writer, so a
//! read-write lock over a plain map is all the coordination needed. Storage
//! is in-process only; persistence and expiry are out of scope.

use std::collections::HashMap;
use std::sync::Arc;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Document snapshot held for a session between upload and follow-up questions.
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    /// Full extracted document text.
    pub text: String,
    /// Final summary produced at upload time.
    pub summary: String,
    /// RFC3339 timestamp of the upload.
    pub uploaded_at: String,
}

/// Shared in-process store mapping session ids to their active document.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, DocumentRecord>>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active document for `session_id` (last write wins).
    pub async fn replace(&self, session_id: &str, record: DocumentRecord) {
        self.inner
            .write()
            .await
            .insert(session_id.to_string(), record);
    }

    /// Fetch the active document for `session_id`, if any.
    pub async fn get(&self, session_id: &str) -> Option<DocumentRecord> {
        self.inner.read().await.get(session_id).cloned()
    }
}

/// Mint a fresh session identifier.
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current UTC time as an RFC3339 string.
pub(crate) fn current_timestamp_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replace_overwrites_previous_document() {
        let store = SessionStore::new();
        store
            .replace(
                "session-1",
                DocumentRecord {
                    text: "first".into(),
                    summary: "first summary".into(),
                    uploaded_at: current_timestamp_rfc3339(),
                },
            )
            .await;
        store
            .replace(
                "session-1",
                DocumentRecord {
                    text: "second".into(),
                    summary: "second summary".into(),
                    uploaded_at: current_timestamp_rfc3339(),
                },
            )
            .await;

        let record = store.get("session-1").await.expect("record present");
        assert_eq!(record.text, "second");
        assert_eq!(record.summary, "second summary");
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = SessionStore::new();
        store
            .replace(
                "session-1",
                DocumentRecord {
                    text: "doc".into(),
                    summary: "sum".into(),
                    uploaded_at: current_timestamp_rfc3339(),
                },
            )
            .await;

        assert!(store.get("session-2").await.is_none());
    }

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(new_session_id(), new_session_id());
    }
}
