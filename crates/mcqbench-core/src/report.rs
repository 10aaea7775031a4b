//! Console rendering and the optional JSON summary export.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{FailedAnswer, Result, RunStats};
use crate::trial::TrialKey;

/// Version of the JSON summary layout.
pub const SUMMARY_SCHEMA_VERSION: &str = "1.0";

/// All statistics of one harness invocation, in execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub session_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub test_set: String,
    pub bank_digest: String,
    pub stats: Vec<RunStats>,
}

impl Summary {
    /// Final summary table: a header, then one line per trial.
    pub fn render(&self) -> String {
        let mut out = format!("=== SUMMARY (Test Set: {}) ===\n", self.test_set);
        for stats in &self.stats {
            out.push_str(&format_summary_line(stats));
            out.push('\n');
        }
        out
    }

    pub fn to_artifact(&self) -> SummaryArtifact {
        SummaryArtifact {
            schema_version: SUMMARY_SCHEMA_VERSION.to_string(),
            session_id: self.session_id,
            generated_at: self.generated_at,
            test_set: self.test_set.clone(),
            bank_digest: self.bank_digest.clone(),
            trials: self.stats.iter().map(TrialArtifact::from).collect(),
        }
    }
}

/// `Model <name> (temp:<t|N/A>) | Prompt[<prompt>] | Run <n>`
pub fn format_trial_header(key: &TrialKey<'_>) -> String {
    format!(
        "Model {} (temp:{}) | Prompt[{}] | Run {}",
        key.model.name,
        key.model.temperature_label(),
        key.prompt.name,
        key.run_number
    )
}

/// Score line of a finished trial, followed by its failures if any.
pub fn format_trial_outcome(stats: &RunStats) -> String {
    let mut out = format!(
        "Correct: {}/{} | Accuracy: {} | Duration: {}",
        stats.correct_count,
        stats.total_questions,
        stats.accuracy(),
        stats.duration()
    );
    if !stats.failed.is_empty() {
        out.push_str("\nFailed:");
        for FailedAnswer { question, answer } in &stats.failed {
            out.push_str(&format!("\n  Q: {}\n  Answer: {}", question, answer));
        }
    }
    out
}

/// One summary row.
pub fn format_summary_line(stats: &RunStats) -> String {
    format!(
        "{} (temperature:{}) | Prompt[{}] | Run {}: {}/{} correct | Accuracy: {} | Duration: {}",
        stats.model_name,
        stats.temperature_label(),
        stats.system_prompt_name,
        stats.run_number,
        stats.correct_count,
        stats.total_questions,
        stats.accuracy(),
        stats.duration()
    )
}

/// One trial in the JSON summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrialArtifact {
    pub model: String,
    pub temperature: Option<f64>,
    pub system_prompt: String,
    pub run: u32,
    pub total_questions: usize,
    pub correct_count: usize,
    pub failed_count: usize,
    pub accuracy: String,
    pub duration_secs: f64,
    pub failed: Vec<FailedAnswer>,
}

impl From<&RunStats> for TrialArtifact {
    fn from(stats: &RunStats) -> Self {
        Self {
            model: stats.model_name.clone(),
            temperature: stats.model_temperature,
            system_prompt: stats.system_prompt_name.clone(),
            run: stats.run_number,
            total_questions: stats.total_questions,
            correct_count: stats.correct_count,
            failed_count: stats.failed_count,
            accuracy: stats.accuracy(),
            duration_secs: stats.duration_secs(),
            failed: stats.failed.clone(),
        }
    }
}

/// JSON summary written by `--report`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryArtifact {
    pub schema_version: String,
    pub session_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub test_set: String,
    pub bank_digest: String,
    pub trials: Vec<TrialArtifact>,
}

/// Write the summary as pretty JSON.
pub fn write_summary_json(path: &Path, summary: &Summary) -> Result<()> {
    let content = serde_json::to_string_pretty(&summary.to_artifact())?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelSpec, SystemPromptSpec};

    fn stats(model: &str, temperature: Option<f64>, failed: Vec<FailedAnswer>) -> RunStats {
        RunStats {
            model_name: model.to_string(),
            model_temperature: temperature,
            system_prompt_name: "plain".to_string(),
            run_number: 2,
            total_questions: 3,
            correct_count: 3 - failed.len(),
            failed_count: failed.len(),
            duration_ms: 4_200,
            failed,
        }
    }

    fn summary(stats: Vec<RunStats>) -> Summary {
        Summary {
            session_id: Uuid::parse_str("11111111-1111-1111-1111-111111111111")
                .expect("valid UUID"),
            generated_at: DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
                .expect("parse RFC3339")
                .with_timezone(&Utc),
            test_set: "en".to_string(),
            bank_digest: "abc".to_string(),
            stats,
        }
    }

    #[test]
    fn trial_header_shows_na_for_missing_temperature() {
        let model = ModelSpec::new("gpt-5");
        let prompt = SystemPromptSpec::new("strict", "...");
        let key = TrialKey {
            model: &model,
            prompt: &prompt,
            run_number: 1,
        };
        assert_eq!(
            format_trial_header(&key),
            "Model gpt-5 (temp:N/A) | Prompt[strict] | Run 1"
        );
    }

    #[test]
    fn outcome_lists_failures() {
        let s = stats(
            "gpt-4.1",
            Some(0.2),
            vec![FailedAnswer {
                question: "Q1".to_string(),
                answer: "B - \"London\"".to_string(),
            }],
        );
        assert_eq!(
            format_trial_outcome(&s),
            "Correct: 2/3 | Accuracy: 66.7% | Duration: 4.2sec\nFailed:\n  Q: Q1\n  Answer: B - \"London\""
        );
    }

    #[test]
    fn outcome_without_failures_is_one_line() {
        let s = stats("gpt-4.1", None, vec![]);
        assert_eq!(
            format_trial_outcome(&s),
            "Correct: 3/3 | Accuracy: 100.0% | Duration: 4.2sec"
        );
    }

    #[test]
    fn summary_render_is_stable() {
        let rendered = summary(vec![
            stats("gpt-4.1", Some(0.2), vec![]),
            stats("gpt-5", None, vec![]),
        ])
        .render();
        let expected = "=== SUMMARY (Test Set: en) ===\n\
            gpt-4.1 (temperature:0.2) | Prompt[plain] | Run 2: 3/3 correct | Accuracy: 100.0% | Duration: 4.2sec\n\
            gpt-5 (temperature:N/A) | Prompt[plain] | Run 2: 3/3 correct | Accuracy: 100.0% | Duration: 4.2sec\n";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn summary_json_has_expected_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("summary.json");
        write_summary_json(&path, &summary(vec![stats("gpt-5", None, vec![])]))
            .expect("write summary");

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(raw["schema_version"], "1.0");
        assert_eq!(raw["test_set"], "en");
        assert_eq!(raw["trials"][0]["accuracy"], "100.0%");
        assert_eq!(raw["trials"][0]["temperature"], serde_json::Value::Null);
        assert_eq!(raw["trials"][0]["duration_secs"], 4.2);
    }
}
