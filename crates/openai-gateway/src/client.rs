//! OpenAI-compatible HTTP invoker
//!
//! Routes each [`InvocationRequest`] by its call parameters: reasoning
//! models go to `/responses`, everything else to `/chat/completions`.
//! Calls are not retried; every failure is handed back to the harness as an
//! [`InvocationError`].

use async_trait::async_trait;
use mcqbench_core::{CallParams, InvocationError, InvocationRequest, ModelInvoker};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::wire::{error_message, ChatRequest, ChatResponse, ResponsesRequest, ResponsesResponse};

const USER_AGENT: &str = concat!("mcqbench/", env!("CARGO_PKG_VERSION"));

/// HTTP client for an OpenAI-compatible endpoint
pub struct OpenAiGateway {
    config: GatewayConfig,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiGateway")
            .field("base_url", &self.config.base_url)
            .field("has_api_key", &self.config.api_key.is_some())
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

impl OpenAiGateway {
    /// Create a new gateway
    pub fn new(mut config: GatewayConfig) -> Result<Self, GatewayError> {
        let url = reqwest::Url::parse(&config.base_url).map_err(|e| {
            GatewayError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: e.to_string(),
            }
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(GatewayError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: format!("unsupported scheme {:?}", url.scheme()),
            });
        }
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(OpenAiGateway {
            config,
            http_client,
        })
    }

    /// Create gateway from environment variables
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::new(GatewayConfig::from_env())
    }

    /// Normalised API root, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, InvocationError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(InvocationError::MissingCredential)?;

        let url = self.endpoint(path);
        debug!(url = %url, "POST");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(map_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InvocationError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let bytes = response.bytes().await.map_err(map_transport)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| InvocationError::MalformedResponse(e.to_string()))
    }
}

fn map_transport(err: reqwest::Error) -> InvocationError {
    if err.is_timeout() {
        InvocationError::Timeout
    } else {
        InvocationError::Transport(err.to_string())
    }
}

#[async_trait]
impl ModelInvoker for OpenAiGateway {
    async fn invoke(&self, request: &InvocationRequest) -> Result<String, InvocationError> {
        match request.params {
            CallParams::Reasoning {
                max_output_tokens,
                reasoning_effort,
                verbosity,
            } => {
                let body =
                    ResponsesRequest::new(request, max_output_tokens, reasoning_effort, verbosity);
                let response: ResponsesResponse = self.post("responses", &body).await?;
                Ok(response.text())
            }
            CallParams::Chat {
                max_tokens,
                temperature,
            } => {
                let body = ChatRequest::new(request, max_tokens, temperature);
                let response: ChatResponse = self.post("chat/completions", &body).await?;
                Ok(response.text())
            }
        }
    }
}
