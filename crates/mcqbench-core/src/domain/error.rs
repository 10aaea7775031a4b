//! Error taxonomy for the harness.
//!
//! `HarnessError` covers everything that is fatal before a trial starts
//! (configuration, question bank). `InvocationError` is the boundary error
//! of a single model call; it never aborts a trial and is recorded as an
//! `ERROR` answer instead.

use std::path::PathBuf;

/// Fatal harness errors surfaced before any trial executes.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("failed to read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(
        "questions file not found: questions-{test_set}.json. Available test sets: {}",
        format_available(.available)
    )]
    UnknownTestSet {
        test_set: String,
        available: Vec<String>,
    },

    #[error("failed to read question bank {path:?}: {source}")]
    QuestionBankRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse question bank {path:?}: {source}")]
    QuestionBankParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid question #{index} ({title:?}): {reason}")]
    InvalidQuestion {
        index: usize,
        title: String,
        reason: String,
    },

    #[error("too many options: {count} (at most 4 are supported)")]
    TooManyOptions { count: usize },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "none found".to_string()
    } else {
        available
            .iter()
            .map(|s| format!("\"{}\"", s))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Result type for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Failure of a single model invocation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvocationError {
    #[error("no API credential configured")]
    MissingCredential,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
