//! Drives every (model × system prompt × run) combination.
//!
//! Nesting is fixed: enabled models outermost, enabled prompts in the
//! middle, run index innermost. Trials execute one after another, so the
//! collected [`RunStats`] are in exactly that order.

use std::time::Instant;

use chrono::Utc;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::domain::{HarnessConfig, QuestionBank, RunStats};
use crate::invoker::{CallShapeRegistry, ModelInvoker};
use crate::metrics::METRICS;
use crate::obs::emit_summary_completed;
use crate::report::Summary;
use crate::trial::{TrialKey, TrialRunner};

/// Hook for progress output while trials execute.
pub trait TrialObserver: Send {
    fn trial_started(&mut self, _key: &TrialKey<'_>) {}

    fn trial_finished(&mut self, _stats: &RunStats) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl TrialObserver for NoopObserver {}

/// Owns the immutable run inputs and executes the full cross product.
#[derive(Debug)]
pub struct Aggregator {
    config: HarnessConfig,
    bank: QuestionBank,
    shapes: CallShapeRegistry,
}

impl Aggregator {
    pub fn new(config: HarnessConfig, bank: QuestionBank) -> Self {
        Self {
            config,
            bank,
            shapes: CallShapeRegistry::default(),
        }
    }

    /// Replace the default call-shape registry.
    pub fn with_call_shapes(mut self, shapes: CallShapeRegistry) -> Self {
        self.shapes = shapes;
        self
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Every combination in execution order.
    pub fn plan(&self) -> Vec<TrialKey<'_>> {
        let mut keys = Vec::new();
        for model in self.config.enabled_models() {
            for prompt in self.config.enabled_prompts() {
                for run_number in 1..=self.config.runs {
                    keys.push(TrialKey {
                        model,
                        prompt,
                        run_number,
                    });
                }
            }
        }
        keys
    }

    /// Execute every combination sequentially and collect the statistics.
    pub async fn run<R: Rng + ?Sized>(
        &self,
        invoker: &dyn ModelInvoker,
        rng: &mut R,
        observer: &mut dyn TrialObserver,
    ) -> Summary {
        let session_id = Uuid::new_v4();
        let start = Instant::now();
        let plan = self.plan();

        info!(
            session_id = %session_id,
            test_set = %self.bank.test_set,
            questions = self.bank.len(),
            trials = plan.len(),
            "Starting evaluation"
        );

        let runner = TrialRunner::new(invoker, &self.shapes, &self.config, &self.bank.questions);
        let mut stats = Vec::with_capacity(plan.len());

        for key in &plan {
            observer.trial_started(key);
            let trial = runner.run(key, rng).await;
            observer.trial_finished(&trial);
            stats.push(trial);
        }

        emit_summary_completed(
            &self.bank.test_set,
            stats.len(),
            start.elapsed().as_millis() as u64,
        );
        METRICS.flush();

        Summary {
            session_id,
            generated_at: Utc::now(),
            test_set: self.bank.test_set.clone(),
            bank_digest: self.bank.digest.clone(),
            stats,
        }
    }
}
