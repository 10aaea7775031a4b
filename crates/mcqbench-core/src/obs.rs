//! Structured observability hooks for the trial lifecycle.
//!
//! - `trial_span`: span that tags everything inside a trial with its
//!   model, prompt and run number
//! - emit functions for trial start/finish, failed invocations, unparseable
//!   answers and the final summary

use tracing::{debug, info, warn, Span};

/// Span tagging everything inside one trial with its model, prompt and run.
///
/// Attach it with `tracing::Instrument` rather than entering it, since the
/// trial awaits model calls.
pub fn trial_span(model: &str, prompt: &str, run: u32) -> Span {
    tracing::info_span!("mcqbench.trial", model = %model, prompt = %prompt, run = run)
}

/// Emit event: trial started.
pub fn emit_trial_started(
    model: &str,
    temperature: &str,
    prompt: &str,
    run: u32,
    questions: usize,
) {
    info!(
        event = "trial.started",
        model = %model,
        temperature = %temperature,
        prompt = %prompt,
        run = run,
        questions = questions,
    );
}

/// Emit event: trial finished with its score and duration.
pub fn emit_trial_finished(
    model: &str,
    prompt: &str,
    run: u32,
    correct: usize,
    total: usize,
    duration_ms: u64,
) {
    info!(
        event = "trial.finished",
        model = %model,
        prompt = %prompt,
        run = run,
        correct = correct,
        total = total,
        duration_ms = duration_ms,
    );
}

/// Emit event: a model invocation failed (warning level).
pub fn emit_invocation_failed(model: &str, question: &str, error: &dyn std::fmt::Display) {
    warn!(
        event = "question.invocation_failed",
        model = %model,
        question = %question,
        error = %error,
    );
}

/// Emit event: the response contained no usable answer letter.
pub fn emit_invalid_answer(model: &str, question: &str, response: &str) {
    debug!(
        event = "question.invalid_answer",
        model = %model,
        question = %question,
        response = %response,
    );
}

/// Emit event: every combination has been executed.
pub fn emit_summary_completed(test_set: &str, trials: usize, duration_ms: u64) {
    info!(
        event = "summary.completed",
        test_set = %test_set,
        trials = trials,
        duration_ms = duration_ms,
    );
}
