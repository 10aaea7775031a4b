//! Harness configuration: models, system prompts and run count.
//!
//! The configuration is an immutable value handed to the
//! [`Aggregator`](crate::aggregator::Aggregator) at construction time.

use serde::{Deserialize, Serialize};

use super::error::{HarnessError, Result};

/// A model under test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelSpec {
    /// Model identifier sent to the completion endpoint. Also selects the
    /// call shape.
    pub name: String,

    /// Sampling temperature. `None` means the parameter is omitted from the
    /// request entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    pub enabled: bool,
}

impl ModelSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            temperature: None,
            enabled: true,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Temperature for display, `N/A` when not configured.
    pub fn temperature_label(&self) -> String {
        temperature_label(self.temperature)
    }
}

/// Render an optional temperature the way logs and summaries show it.
pub fn temperature_label(temperature: Option<f64>) -> String {
    match temperature {
        Some(t) => t.to_string(),
        None => "N/A".to_string(),
    }
}

/// A named system prompt variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemPromptSpec {
    pub name: String,
    pub prompt: String,
    pub enabled: bool,
}

impl SystemPromptSpec {
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Top-level harness configuration, as stored in `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HarnessConfig {
    /// Shared text appended after every system prompt.
    #[serde(rename = "supersystemprompt")]
    pub supersystem_prompt: String,

    /// Identifier of the question bank to load.
    pub test_set: String,

    /// System prompt variants in configured order.
    pub system_prompts: Vec<SystemPromptSpec>,

    /// Models in configured order.
    pub models: Vec<ModelSpec>,

    /// Number of repetitions per model/prompt combination.
    pub runs: u32,
}

impl HarnessConfig {
    /// Reject configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            return Err(HarnessError::InvalidConfig(
                "runs must be at least 1".to_string(),
            ));
        }
        if self.test_set.trim().is_empty() {
            return Err(HarnessError::InvalidConfig(
                "testSet must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Enabled models in configured order.
    pub fn enabled_models(&self) -> impl Iterator<Item = &ModelSpec> {
        self.models.iter().filter(|m| m.enabled)
    }

    /// Enabled system prompts in configured order.
    pub fn enabled_prompts(&self) -> impl Iterator<Item = &SystemPromptSpec> {
        self.system_prompts.iter().filter(|p| p.enabled)
    }

    /// Per-prompt text followed by the shared supersystem text.
    pub fn combined_system_prompt(&self, spec: &SystemPromptSpec) -> String {
        format!("{}\n\n{}", spec.prompt, self.supersystem_prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "supersystemprompt": "Answer with a single letter.",
        "testSet": "en",
        "systemPrompts": [
            {"name": "plain", "prompt": "You are a quiz taker.", "enabled": true},
            {"name": "off", "prompt": "unused", "enabled": false}
        ],
        "models": [
            {"name": "gpt-4.1", "temperature": 0.2, "enabled": true},
            {"name": "gpt-5", "enabled": true},
            {"name": "o3", "enabled": false}
        ],
        "runs": 3
    }"#;

    #[test]
    fn parses_camel_case_config_layout() {
        let config: HarnessConfig = serde_json::from_str(SAMPLE).expect("parse");
        assert_eq!(config.test_set, "en");
        assert_eq!(config.runs, 3);
        assert_eq!(config.models[0].temperature, Some(0.2));
        assert_eq!(config.models[1].temperature, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn enabled_filters_keep_order() {
        let config: HarnessConfig = serde_json::from_str(SAMPLE).expect("parse");
        let models: Vec<_> = config.enabled_models().map(|m| m.name.as_str()).collect();
        assert_eq!(models, vec!["gpt-4.1", "gpt-5"]);
        let prompts: Vec<_> = config.enabled_prompts().map(|p| p.name.as_str()).collect();
        assert_eq!(prompts, vec!["plain"]);
    }

    #[test]
    fn combined_prompt_puts_spec_text_first() {
        let config: HarnessConfig = serde_json::from_str(SAMPLE).expect("parse");
        let combined = config.combined_system_prompt(&config.system_prompts[0]);
        assert_eq!(
            combined,
            "You are a quiz taker.\n\nAnswer with a single letter."
        );
    }

    #[test]
    fn zero_runs_rejected() {
        let mut config: HarnessConfig = serde_json::from_str(SAMPLE).expect("parse");
        config.runs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn temperature_label_formats() {
        assert_eq!(ModelSpec::new("m").temperature_label(), "N/A");
        assert_eq!(
            ModelSpec::new("m").with_temperature(0.7).temperature_label(),
            "0.7"
        );
        assert_eq!(
            ModelSpec::new("m").with_temperature(1.0).temperature_label(),
            "1"
        );
    }

    #[test]
    fn missing_temperature_not_serialized() {
        let json = serde_json::to_value(ModelSpec::new("gpt-5")).expect("serialize");
        assert!(json.get("temperature").is_none());
    }
}
