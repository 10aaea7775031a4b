//! Global atomic counters for harness observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event at the end of a run.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters.
pub struct Metrics {
    invocations: AtomicU64,
    invocation_errors: AtomicU64,
    invalid_answers: AtomicU64,
    correct_answers: AtomicU64,
    trials_completed: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            invocations: AtomicU64::new(0),
            invocation_errors: AtomicU64::new(0),
            invalid_answers: AtomicU64::new(0),
            correct_answers: AtomicU64::new(0),
            trials_completed: AtomicU64::new(0),
        }
    }

    pub fn inc_invocations(&self) {
        self.invocations.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "invocations", "counter incremented");
    }

    pub fn inc_invocation_errors(&self) {
        self.invocation_errors.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "invocation_errors", "counter incremented");
    }

    pub fn inc_invalid_answers(&self) {
        self.invalid_answers.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "invalid_answers", "counter incremented");
    }

    pub fn inc_correct_answers(&self) {
        self.correct_answers.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "correct_answers", "counter incremented");
    }

    pub fn inc_trials_completed(&self) {
        self.trials_completed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "trials_completed", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            invocations = self.invocations(),
            invocation_errors = self.invocation_errors(),
            invalid_answers = self.invalid_answers(),
            correct_answers = self.correct_answers(),
            trials_completed = self.trials_completed(),
        );
    }

    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::Relaxed)
    }

    pub fn invocation_errors(&self) -> u64 {
        self.invocation_errors.load(Ordering::Relaxed)
    }

    pub fn invalid_answers(&self) -> u64 {
        self.invalid_answers.load(Ordering::Relaxed)
    }

    pub fn correct_answers(&self) -> u64 {
        self.correct_answers.load(Ordering::Relaxed)
    }

    pub fn trials_completed(&self) -> u64 {
        self.trials_completed.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.invocations.store(0, Ordering::Relaxed);
        self.invocation_errors.store(0, Ordering::Relaxed);
        self.invalid_answers.store(0, Ordering::Relaxed);
        self.correct_answers.store(0, Ordering::Relaxed);
        self.trials_completed.store(0, Ordering::Relaxed);
    }
}
