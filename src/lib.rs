#![deny(missing_docs)]

//! Core library for the Docbrief summarization and Q&A server.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// PDF text extraction with fallback.
pub mod extract;
/// Language model gateway abstraction and provider adapters.
pub mod gateway;
/// Structured logging and tracing setup.
pub mod logging;
/// Pipeline metrics helpers.
pub mod metrics;
/// Summarization and question-answering pipeline.
pub mod processing;
/// Per-session document storage.
pub mod session;
