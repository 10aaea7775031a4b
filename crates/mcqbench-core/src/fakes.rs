//! In-memory invokers and observers (testing only)
//!
//! Provides `ScriptedInvoker`, `FnInvoker`, `FailingInvoker` and
//! `RecordingObserver`, which satisfy the harness traits without any network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::aggregator::TrialObserver;
use crate::domain::{InvocationError, RunStats};
use crate::invoker::{InvocationRequest, ModelInvoker};
use crate::trial::TrialKey;

type InvokeResult = std::result::Result<String, InvocationError>;

// ---------------------------------------------------------------------------
// ScriptedInvoker
// ---------------------------------------------------------------------------

/// Replays a fixed sequence of responses and records every request.
///
/// Once the script is exhausted every further call fails with
/// `InvocationError::MalformedResponse`.
#[derive(Debug, Default)]
pub struct ScriptedInvoker {
    script: Mutex<VecDeque<InvokeResult>>,
    requests: Mutex<Vec<InvocationRequest>>,
}

impl ScriptedInvoker {
    pub fn new(script: impl IntoIterator<Item = InvokeResult>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Script that answers `text` `times` times.
    pub fn repeating(text: &str, times: usize) -> Self {
        Self::new((0..times).map(|_| Ok(text.to_string())))
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<InvocationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelInvoker for ScriptedInvoker {
    async fn invoke(&self, request: &InvocationRequest) -> InvokeResult {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(InvocationError::MalformedResponse(
                    "script exhausted".to_string(),
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// FnInvoker
// ---------------------------------------------------------------------------

/// Computes each response from the request with a closure.
pub struct FnInvoker<F> {
    respond: F,
}

impl<F> FnInvoker<F>
where
    F: Fn(&InvocationRequest) -> InvokeResult + Send + Sync,
{
    pub fn new(respond: F) -> Self {
        Self { respond }
    }
}

#[async_trait]
impl<F> ModelInvoker for FnInvoker<F>
where
    F: Fn(&InvocationRequest) -> InvokeResult + Send + Sync,
{
    async fn invoke(&self, request: &InvocationRequest) -> InvokeResult {
        (self.respond)(request)
    }
}

/// Letter under which `option_text` appears in a rendered user prompt.
pub fn letter_of(user_prompt: &str, option_text: &str) -> Option<String> {
    user_prompt.lines().skip(1).find_map(|line| {
        let (letter, text) = line.split_once(" - ")?;
        (text == option_text).then(|| letter.to_string())
    })
}

// ---------------------------------------------------------------------------
// FailingInvoker
// ---------------------------------------------------------------------------

/// Fails every call with the same error.
#[derive(Debug, Clone)]
pub struct FailingInvoker {
    error: InvocationError,
}

impl FailingInvoker {
    pub fn new(error: InvocationError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl ModelInvoker for FailingInvoker {
    async fn invoke(&self, _request: &InvocationRequest) -> InvokeResult {
        Err(self.error.clone())
    }
}

// ---------------------------------------------------------------------------
// RecordingObserver
// ---------------------------------------------------------------------------

/// Records trial start keys as `(model, prompt, run)` and finished stats.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub started: Vec<(String, String, u32)>,
    pub finished: Vec<RunStats>,
}

impl TrialObserver for RecordingObserver {
    fn trial_started(&mut self, key: &TrialKey<'_>) {
        self.started.push((
            key.model.name.clone(),
            key.prompt.name.clone(),
            key.run_number,
        ));
    }

    fn trial_finished(&mut self, stats: &RunStats) {
        self.finished.push(stats.clone());
    }
}
