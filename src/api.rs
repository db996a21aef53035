//! HTTP surface for Docbrief.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `POST /upload` – Accept pasted text (JSON) or a PDF (multipart), produce a structured
//!   summary, and store the document for follow-up questions. Returns `{"summary": string}`
//!   and echoes the session id in the `x-session-id` response header.
//! - `POST /ask` – Answer a question strictly from the stored document. Questions the
//!   relevance gate scores below the threshold get a fixed message annotated with
//!   `{"similarity": number}`.
//! - `GET /metrics` – Observe summarization and answering counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! Validation failures are rejected before any model call is attempted; gateway failures
//! surface as `502` with a structured `{"error": string}` body.

use crate::extract;
use crate::metrics::MetricsSnapshot;
use crate::processing::{AnswerOutcome, DocumentApi, ProcessingError};
use crate::session::{self, DocumentRecord, SessionStore};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

/// Request header carrying the session identifier across the upload/ask pair.
pub const SESSION_HEADER: &str = "x-session-id";

const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Build the HTTP router exposing the document Q&A surface.
pub fn create_router<S>(service: Arc<S>, sessions: SessionStore) -> Router
where
    S: DocumentApi + 'static,
{
    Router::new()
        .route("/upload", post(upload_document::<S>))
        .route("/ask", post(ask_question::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(AppState { service, sessions })
}

struct AppState<S> {
    service: Arc<S>,
    sessions: SessionStore,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            sessions: self.sessions.clone(),
        }
    }
}

/// JSON request body for the `POST /upload` endpoint.
#[derive(Deserialize)]
struct UploadRequest {
    /// Pasted document text.
    #[serde(default)]
    text: Option<String>,
}

/// Success response for the `POST /upload` endpoint.
#[derive(Serialize)]
struct UploadResponse {
    /// Final structured summary of the uploaded document.
    summary: String,
}

/// Request body for the `POST /ask` endpoint.
#[derive(Deserialize)]
struct AskRequest {
    /// Follow-up question about the stored document.
    question: String,
}

/// Response body for the `POST /ask` endpoint.
#[derive(Serialize)]
struct AskResponse {
    /// Model answer, or the fixed rejection message when the gate turns the question away.
    answer: String,
    /// Summary/question similarity, reported only on gate rejections.
    #[serde(skip_serializing_if = "Option::is_none")]
    similarity: Option<f32>,
}

/// Document material decoded from either request format.
struct Submission {
    text: Option<String>,
    file: Option<Vec<u8>>,
}

/// Summarize an uploaded document and store it for the session.
///
/// Accepts JSON (`{"text": ...}`) or multipart form data (`file` with raw PDF
/// bytes, optional `text` field). A `text` value wins over the file, matching
/// the validation order of the extraction fallback chain.
async fn upload_document<S>(
    State(state): State<AppState<S>>,
    request: Request,
) -> Result<Response, ApiError>
where
    S: DocumentApi,
{
    let session_id = session_id_from_headers(request.headers());
    let submission = read_submission(request).await?;
    let text = resolve_text(submission)?;

    let outcome = state.service.summarize_document(&text).await?;
    let session_id = session_id.unwrap_or_else(session::new_session_id);
    state
        .sessions
        .replace(
            &session_id,
            DocumentRecord {
                text,
                summary: outcome.summary.clone(),
                uploaded_at: session::current_timestamp_rfc3339(),
            },
        )
        .await;
    tracing::info!(
        chunks_total = outcome.chunks_total,
        chunks_summarized = outcome.chunks_summarized,
        "Upload request completed"
    );

    let mut response = Json(UploadResponse {
        summary: outcome.summary,
    })
    .into_response();
    if let Ok(value) = HeaderValue::from_str(&session_id) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    Ok(response)
}

/// Answer a question against the session's stored document.
async fn ask_question<S>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError>
where
    S: DocumentApi,
{
    let question = request.question.trim().to_string();
    if question.is_empty() {
        return Err(ApiError::InvalidInput(
            "Provide a non-empty question.".to_string(),
        ));
    }

    let session_id = session_id_from_headers(&headers).ok_or(ApiError::NoActiveDocument)?;
    let record = state
        .sessions
        .get(&session_id)
        .await
        .ok_or(ApiError::NoActiveDocument)?;

    let outcome = state
        .service
        .answer_question(&record.text, &record.summary, &question)
        .await?;

    let response = match outcome {
        AnswerOutcome::Answered { answer } => AskResponse {
            answer,
            similarity: None,
        },
        AnswerOutcome::Rejected {
            message,
            similarity,
        } => AskResponse {
            answer: message,
            similarity: Some(similarity),
        },
    };
    Ok(Json(response))
}

/// Return a concise metrics snapshot with pipeline counters.
async fn get_metrics<S>(State(state): State<AppState<S>>) -> Json<MetricsSnapshot>
where
    S: DocumentApi,
{
    Json(state.service.metrics_snapshot())
}

fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

async fn read_submission(request: Request) -> Result<Submission, ApiError> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|_| ApiError::InvalidInput("Malformed multipart payload.".to_string()))?;
        let mut submission = Submission {
            text: None,
            file: None,
        };
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| ApiError::InvalidInput("Malformed multipart payload.".to_string()))?
        {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("text") => {
                    submission.text = Some(field.text().await.map_err(|_| {
                        ApiError::InvalidInput("Malformed multipart payload.".to_string())
                    })?);
                }
                Some("file") => {
                    submission.file = Some(
                        field
                            .bytes()
                            .await
                            .map_err(|_| {
                                ApiError::InvalidInput(
                                    "Malformed multipart payload.".to_string(),
                                )
                            })?
                            .to_vec(),
                    );
                }
                _ => {}
            }
        }
        Ok(submission)
    } else {
        let Json(body) = Json::<UploadRequest>::from_request(request, &())
            .await
            .map_err(|_| {
                ApiError::InvalidInput("Provide either a PDF file or non-empty text.".to_string())
            })?;
        Ok(Submission {
            text: body.text,
            file: None,
        })
    }
}

fn resolve_text(submission: Submission) -> Result<String, ApiError> {
    let mut text = submission.text.unwrap_or_default();
    if text.trim().is_empty() {
        if let Some(bytes) = submission.file {
            let extracted = extract::extract_text(&bytes);
            if extracted.is_empty() {
                return Err(ApiError::InvalidInput(
                    "Failed to extract text from PDF.".to_string(),
                ));
            }
            text = extracted;
        }
    }
    if text.trim().is_empty() {
        return Err(ApiError::InvalidInput(
            "Provide either a PDF file or non-empty text.".to_string(),
        ));
    }
    Ok(text)
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "upload",
                method: "POST",
                path: "/upload",
                description: "Summarize pasted text or an uploaded PDF and store it for follow-up questions. Response returns { \"summary\": string } plus an x-session-id header.",
                request_example: Some(json!({
                    "text": "Document contents"
                })),
            },
            CommandDescriptor {
                name: "ask",
                method: "POST",
                path: "/ask",
                description: "Answer a question strictly from the stored document; off-topic questions return a fixed message with { \"similarity\": number }.",
                request_example: Some(json!({
                    "question": "What is the main conclusion?"
                })),
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return summarization and answering counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

/// Wrapper mapping validation and pipeline failures onto HTTP responses.
#[derive(Debug, Error)]
enum ApiError {
    /// Request carried no usable document text or question.
    #[error("{0}")]
    InvalidInput(String),
    /// Question asked before any document was uploaded for the session.
    #[error("No document in session. Upload text or a PDF first.")]
    NoActiveDocument,
    /// Pipeline failure, surfaced with a gateway-class status.
    #[error(transparent)]
    Processing(#[from] ProcessingError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidInput(_) | Self::NoActiveDocument => StatusCode::BAD_REQUEST,
            Self::Processing(ProcessingError::Gateway(_)) => StatusCode::BAD_GATEWAY,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
