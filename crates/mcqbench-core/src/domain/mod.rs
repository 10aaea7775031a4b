//! Domain models for MCQ Bench.
//!
//! Canonical definitions for the core entities:
//! - `Question` / `QuestionBank`: the multiple-choice items under test
//! - `HarnessConfig`: models, system prompts and run count
//! - `TrialResult` / `RunStats`: per-question outcome and per-trial statistics

pub mod config;
pub mod error;
pub mod question;
pub mod result;

pub use config::{temperature_label, HarnessConfig, ModelSpec, SystemPromptSpec};
pub use error::{HarnessError, InvocationError, Result};
pub use question::{AnswerOption, Question, QuestionBank, MAX_OPTIONS};
pub use result::{AnswerLetter, ChosenAnswer, FailedAnswer, RunStats, TrialResult};
