//! Error types for openai-gateway

use thiserror::Error;

/// Errors raised while constructing a gateway.
///
/// Failures of individual calls are reported as
/// [`mcqbench_core::InvocationError`] instead, so the harness can record
/// them per question.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Base URL is not an absolute http(s) URL
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::ClientBuild(err.to_string())
    }
}
