//! Model invocation boundary and call-shape selection.
//!
//! The network call is an external capability behind [`ModelInvoker`]. What
//! belongs to the core is choosing the call shape for a model and turning a
//! [`ModelSpec`] into the exact request parameters:
//!
//! - **Reasoning** shape: system and user prompts as separate structured
//!   turns, a small output-token cap, lowest reasoning effort and verbosity,
//!   no temperature.
//! - **Chat** shape: two ordered messages, a one-token cap, temperature only
//!   when the model spec defines one.
//!
//! Shapes are looked up in a [`CallShapeRegistry`], so supporting a new
//! model is a registry entry rather than another branch.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{HarnessError, InvocationError, ModelSpec, Result};

/// Lowest output-token cap accepted for the reasoning shape.
pub const MIN_REASONING_OUTPUT_TOKENS: u32 = 16;

/// Output-token cap used by the default reasoning shape.
pub const DEFAULT_REASONING_OUTPUT_TOKENS: u32 = 32;

/// Output-token cap used by the default chat shape.
pub const DEFAULT_CHAT_MAX_TOKENS: u32 = 1;

/// Model that uses the reasoning shape in the default registry.
pub const DEFAULT_REASONING_MODEL: &str = "gpt-5";

/// Reasoning effort tier, lowest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningEffort {
    Minimal,
    Low,
    Medium,
    High,
}

impl ReasoningEffort {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Output verbosity tier, lowest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    Low,
    Medium,
    High,
}

impl Verbosity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Structural form used to call a model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallShape {
    Reasoning {
        max_output_tokens: u32,
        reasoning_effort: ReasoningEffort,
        verbosity: Verbosity,
    },
    Chat {
        max_tokens: u32,
    },
}

impl CallShape {
    /// Reasoning shape with the default cap and lowest tiers.
    pub fn reasoning() -> Self {
        Self::Reasoning {
            max_output_tokens: DEFAULT_REASONING_OUTPUT_TOKENS,
            reasoning_effort: ReasoningEffort::Minimal,
            verbosity: Verbosity::Low,
        }
    }

    /// Reasoning shape with a custom output cap (at least 16).
    pub fn reasoning_with_cap(max_output_tokens: u32) -> Result<Self> {
        if max_output_tokens < MIN_REASONING_OUTPUT_TOKENS {
            return Err(HarnessError::InvalidConfig(format!(
                "reasoning output cap {} is below the minimum of {}",
                max_output_tokens, MIN_REASONING_OUTPUT_TOKENS
            )));
        }
        Ok(Self::Reasoning {
            max_output_tokens,
            reasoning_effort: ReasoningEffort::Minimal,
            verbosity: Verbosity::Low,
        })
    }

    /// Chat shape with a one-token cap.
    pub fn chat() -> Self {
        Self::Chat {
            max_tokens: DEFAULT_CHAT_MAX_TOKENS,
        }
    }

    pub fn supports_temperature(&self) -> bool {
        matches!(self, Self::Chat { .. })
    }

    /// Request parameters for this shape. Temperature is carried only when
    /// the shape supports it and one is configured.
    pub fn params(&self, temperature: Option<f64>) -> CallParams {
        match *self {
            Self::Reasoning {
                max_output_tokens,
                reasoning_effort,
                verbosity,
            } => CallParams::Reasoning {
                max_output_tokens,
                reasoning_effort,
                verbosity,
            },
            Self::Chat { max_tokens } => CallParams::Chat {
                max_tokens,
                temperature,
            },
        }
    }
}

/// Parameters sent with one invocation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallParams {
    Reasoning {
        max_output_tokens: u32,
        reasoning_effort: ReasoningEffort,
        verbosity: Verbosity,
    },
    Chat {
        max_tokens: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        temperature: Option<f64>,
    },
}

/// How a registry entry matches model identifiers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "match", content = "value", rename_all = "snake_case")]
pub enum ModelPattern {
    Exact(String),
    Prefix(String),
}

impl ModelPattern {
    pub fn matches(&self, model: &str) -> bool {
        match self {
            Self::Exact(name) => model == name,
            Self::Prefix(prefix) => model.starts_with(prefix.as_str()),
        }
    }
}

/// Ordered mapping from model patterns to call shapes. First match wins;
/// unmatched models use the fallback.
#[derive(Debug)]
pub struct CallShapeRegistry {
    rules: Vec<(ModelPattern, CallShape)>,
    fallback: CallShape,
    ignored_temperature_warned: Mutex<HashSet<String>>,
}

impl Default for CallShapeRegistry {
    /// `gpt-5` uses the reasoning shape; everything else chats.
    fn default() -> Self {
        Self::new(CallShape::chat()).with_rule(
            ModelPattern::Exact(DEFAULT_REASONING_MODEL.to_string()),
            CallShape::reasoning(),
        )
    }
}

impl CallShapeRegistry {
    /// Empty registry: every model uses `fallback`.
    pub fn new(fallback: CallShape) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
            ignored_temperature_warned: Mutex::new(HashSet::new()),
        }
    }

    /// Append a rule. Earlier rules take precedence.
    pub fn with_rule(mut self, pattern: ModelPattern, shape: CallShape) -> Self {
        self.rules.push((pattern, shape));
        self
    }

    /// Call shape for a model identifier.
    pub fn shape_for(&self, model: &str) -> CallShape {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.matches(model))
            .map(|(_, shape)| *shape)
            .unwrap_or(self.fallback)
    }

    /// Request parameters for a model spec.
    ///
    /// A temperature configured for a model whose shape cannot take one is
    /// dropped, with a warning logged once per model.
    pub fn params_for(&self, model: &ModelSpec) -> CallParams {
        let shape = self.shape_for(&model.name);
        if let Some(temperature) = model.temperature {
            if !shape.supports_temperature() {
                self.warn_ignored_temperature(&model.name, temperature);
            }
        }
        shape.params(model.temperature)
    }

    fn warn_ignored_temperature(&self, model: &str, temperature: f64) {
        let first_time = match self.ignored_temperature_warned.lock() {
            Ok(mut seen) => seen.insert(model.to_string()),
            Err(_) => false,
        };
        if first_time {
            warn!(
                model = %model,
                temperature = temperature,
                "temperature not supported by this call shape; omitting it"
            );
        }
    }
}

/// One fully specified model call.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub params: CallParams,
}

/// Capability: given prompts and call parameters, return the model's raw
/// text output.
///
/// Implementations return an empty string when the response carries no
/// text. Any failure is an [`InvocationError`]; callers never retry.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(
        &self,
        request: &InvocationRequest,
    ) -> std::result::Result<String, InvocationError>;
}
