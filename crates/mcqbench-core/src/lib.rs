//! MCQ Bench Core Library
//!
//! Trial execution and scoring engine for measuring multiple-choice
//! accuracy of language models across system prompts, temperatures and
//! repeated runs.
//!
//! Data flows `Aggregator` → `TrialRunner` (per combination) → shuffle,
//! prompt, [`ModelInvoker`], parse (per question) → [`RunStats`] →
//! [`Summary`].

pub mod aggregator;
pub mod domain;
pub mod fakes;
pub mod invoker;
pub mod loader;
pub mod metrics;
pub mod obs;
pub mod parse;
pub mod prompt;
pub mod report;
pub mod shuffle;
pub mod telemetry;
pub mod trial;

pub use aggregator::{Aggregator, NoopObserver, TrialObserver};

pub use domain::{
    temperature_label, AnswerLetter, AnswerOption, ChosenAnswer, FailedAnswer, HarnessConfig,
    HarnessError, InvocationError, ModelSpec, Question, QuestionBank, Result, RunStats,
    SystemPromptSpec, TrialResult, MAX_OPTIONS,
};

pub use invoker::{
    CallParams, CallShape, CallShapeRegistry, InvocationRequest, ModelInvoker, ModelPattern,
    ReasoningEffort, Verbosity, DEFAULT_CHAT_MAX_TOKENS, DEFAULT_REASONING_MODEL,
    DEFAULT_REASONING_OUTPUT_TOKENS, MIN_REASONING_OUTPUT_TOKENS,
};

pub use loader::{available_test_sets, load_config, load_question_bank, question_bank_path};
pub use parse::parse_answer;
pub use prompt::build_prompt;
pub use report::{
    format_summary_line, format_trial_header, format_trial_outcome, write_summary_json, Summary,
    SummaryArtifact, TrialArtifact,
};
pub use shuffle::{shuffle_in_place, shuffled};
pub use trial::{score, TrialKey, TrialRunner};

pub use metrics::METRICS;
pub use obs::{
    emit_invalid_answer, emit_invocation_failed, emit_summary_completed, emit_trial_finished,
    emit_trial_started, trial_span,
};
pub use telemetry::init_tracing;

/// MCQ Bench version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
