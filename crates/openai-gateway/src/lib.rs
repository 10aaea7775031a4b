//! OpenAI-Gateway: HTTP Model Invoker for MCQ Bench
//!
//! Implements [`mcqbench_core::ModelInvoker`] against an OpenAI-compatible
//! API. Reasoning models are called through the Responses endpoint with a
//! small output budget; all other models through Chat Completions with a
//! one-token answer.

pub mod client;
pub mod config;
pub mod error;
pub mod wire;

pub use client::OpenAiGateway;
pub use config::{GatewayConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::GatewayError;
