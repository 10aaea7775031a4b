//! One trial: a full pass over the question bank for a single
//! (model, system prompt, run) combination.
//!
//! Per trial: start the clock, shuffle the questions, then for each
//! question shuffle its options, render the prompt, invoke the model, parse
//! and score the answer. Invocations are awaited one at a time. Failures are
//! recorded and the trial moves on; nothing here aborts a trial.

use std::time::Instant;

use rand::Rng;
use tracing::Instrument;

use crate::domain::{
    AnswerOption, HarnessConfig, ModelSpec, Question, RunStats, SystemPromptSpec, TrialResult,
};
use crate::invoker::{CallParams, CallShapeRegistry, InvocationRequest, ModelInvoker};
use crate::metrics::METRICS;
use crate::obs::{
    emit_invalid_answer, emit_invocation_failed, emit_trial_finished, emit_trial_started,
    trial_span,
};
use crate::parse::parse_answer;
use crate::prompt::build_prompt;
use crate::shuffle::shuffled;

/// Identifies one trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialKey<'a> {
    pub model: &'a ModelSpec,
    pub prompt: &'a SystemPromptSpec,
    /// 1-based.
    pub run_number: u32,
}

/// Executes trials against a fixed question bank.
pub struct TrialRunner<'a> {
    invoker: &'a dyn ModelInvoker,
    shapes: &'a CallShapeRegistry,
    config: &'a HarnessConfig,
    questions: &'a [Question],
}

impl<'a> TrialRunner<'a> {
    pub fn new(
        invoker: &'a dyn ModelInvoker,
        shapes: &'a CallShapeRegistry,
        config: &'a HarnessConfig,
        questions: &'a [Question],
    ) -> Self {
        Self {
            invoker,
            shapes,
            config,
            questions,
        }
    }

    /// Run one trial and fold its results into [`RunStats`].
    pub async fn run<R: Rng + ?Sized>(&self, key: &TrialKey<'_>, rng: &mut R) -> RunStats {
        let span = trial_span(&key.model.name, &key.prompt.name, key.run_number);
        self.run_inner(key, rng).instrument(span).await
    }

    async fn run_inner<R: Rng + ?Sized>(&self, key: &TrialKey<'_>, rng: &mut R) -> RunStats {
        let model = key.model;
        emit_trial_started(
            &model.name,
            &model.temperature_label(),
            &key.prompt.name,
            key.run_number,
            self.questions.len(),
        );

        let system_prompt = self.config.combined_system_prompt(key.prompt);
        let params = self.shapes.params_for(model);

        let start = Instant::now();
        let questions = shuffled(self.questions, rng);
        let mut results = Vec::with_capacity(questions.len());

        for question in &questions {
            let options = shuffled(&question.options, rng);
            let result = self
                .ask(model, &system_prompt, params, question, &options)
                .await;
            if result.correct {
                METRICS.inc_correct_answers();
            }
            results.push(result);
        }

        let elapsed = start.elapsed();
        let stats = RunStats::from_results(
            &model.name,
            model.temperature,
            &key.prompt.name,
            key.run_number,
            results,
            elapsed,
        );

        METRICS.inc_trials_completed();
        emit_trial_finished(
            &stats.model_name,
            &stats.system_prompt_name,
            stats.run_number,
            stats.correct_count,
            stats.total_questions,
            stats.duration_ms,
        );
        stats
    }

    async fn ask(
        &self,
        model: &ModelSpec,
        system_prompt: &str,
        params: CallParams,
        question: &Question,
        options: &[AnswerOption],
    ) -> TrialResult {
        let user_prompt = match build_prompt(&question.title, options) {
            Ok(prompt) => prompt,
            Err(e) => return TrialResult::error(&question.title, &e),
        };

        let request = InvocationRequest {
            model: model.name.clone(),
            system_prompt: system_prompt.to_string(),
            user_prompt,
            params,
        };

        METRICS.inc_invocations();
        match self.invoker.invoke(&request).await {
            Ok(response) => score(&model.name, question, options, &response),
            Err(e) => {
                METRICS.inc_invocation_errors();
                emit_invocation_failed(&model.name, &question.title, &e);
                TrialResult::error(&question.title, &e)
            }
        }
    }
}

/// Score a raw response against the options in the order they were shown.
///
/// The parsed letter is resolved through the shuffled `options`, never the
/// question's canonical order. A letter with no option behind it (e.g. `D`
/// on a three-option question) counts as `INVALID`.
pub fn score(
    model: &str,
    question: &Question,
    options: &[AnswerOption],
    response: &str,
) -> TrialResult {
    let chosen = parse_answer(response)
        .and_then(|letter| options.get(letter.index()).map(|option| (letter, option)));

    match chosen {
        Some((letter, option)) => TrialResult::answered(&question.title, letter, option),
        None => {
            METRICS.inc_invalid_answers();
            emit_invalid_answer(model, &question.title, response);
            TrialResult::invalid(&question.title, response)
        }
    }
}
