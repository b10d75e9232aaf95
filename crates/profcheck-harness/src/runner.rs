//! Sequential check execution.
//!
//! [`CheckRunner`] walks its checks strictly in order:
//! `NotStarted -> Running(0) -> Recorded(0) -> Running(1) -> ... -> Completed`.
//! Every check produces exactly one outcome. Errors and panics are captured
//! as `Fail` outcomes with a bounded trace and never stop the sequence.

use profcheck_core::{emit_check_recorded, emit_check_started};
use serde::Serialize;
use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;
use std::time::Instant;

use crate::check::{Check, CheckOutcome};
use crate::error::CheckError;

/// Position of the runner in the check sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "check", rename_all = "snake_case")]
pub enum RunnerState {
    NotStarted,
    Running(usize),
    Recorded(usize),
    Completed,
}

/// Outcomes of a finished run, in check order.
#[derive(Debug, Clone)]
pub struct CompletedRun {
    pub outcomes: Vec<CheckOutcome>,
    /// Every state the runner passed through, starting at `NotStarted`.
    pub transitions: Vec<RunnerState>,
}

/// Ordered sequence of checks.
pub struct CheckRunner {
    checks: Vec<Box<dyn Check>>,
    state: RunnerState,
    transitions: Vec<RunnerState>,
}

impl CheckRunner {
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            state: RunnerState::NotStarted,
            transitions: vec![RunnerState::NotStarted],
        }
    }

    /// Append a check (builder pattern).
    pub fn with_check(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn push(&mut self, check: Box<dyn Check>) {
        self.checks.push(check);
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Run every check in order and hand back the recorded outcomes.
    pub fn run(mut self) -> CompletedRun {
        let checks = std::mem::take(&mut self.checks);
        let mut outcomes = Vec::with_capacity(checks.len());

        for (idx, check) in checks.iter().enumerate() {
            self.transition(RunnerState::Running(idx));
            emit_check_started(check.name(), idx);

            let outcome = execute(check.as_ref(), idx);
            let elapsed_ms = outcome
                .timing
                .map(|t| t.as_millis() as u64)
                .unwrap_or_default();
            emit_check_recorded(&outcome.name, idx, outcome.status, elapsed_ms);
            outcomes.push(outcome);

            self.transition(RunnerState::Recorded(idx));
        }

        self.transition(RunnerState::Completed);

        CompletedRun {
            outcomes,
            transitions: self.transitions,
        }
    }

    fn transition(&mut self, next: RunnerState) {
        tracing::debug!(from = ?self.state, to = ?next, "runner transition");
        self.state = next;
        self.transitions.push(next);
    }
}

impl Default for CheckRunner {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
}

static PANIC_HOOK: Once = Once::new();

/// Route panics raised inside a check to `tracing` instead of stderr.
/// Panics elsewhere still reach the previously installed hook.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CAPTURING.with(Cell::get) {
                tracing::debug!(panic = %info, "check panicked");
            } else {
                previous(info);
            }
        }));
    });
}

/// Run one check, converting errors and panics into `Fail` outcomes.
fn execute(check: &dyn Check, idx: usize) -> CheckOutcome {
    install_panic_hook();
    let name = check.name().to_string();
    let start = Instant::now();
    CAPTURING.with(|c| c.set(true));
    let result = panic::catch_unwind(AssertUnwindSafe(|| check.run()));
    CAPTURING.with(|c| c.set(false));
    let elapsed = start.elapsed();

    let outcome = match result {
        Ok(Ok(mut outcome)) => {
            outcome.name = name;
            outcome
        }
        Ok(Err(err)) => {
            let chain = error_chain(&err);
            let mut trace = vec![format!("check #{idx} ({name}) returned an error")];
            trace.extend(chain.iter().skip(1).map(|cause| format!("caused by: {cause}")));
            err.diagnostics()
                .iter()
                .fold(CheckOutcome::fail(name, chain.join(": ")), |outcome, line| {
                    outcome.with_diagnostic(line.clone())
                })
                .with_trace(trace.join("\n"))
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            CheckOutcome::fail(name.clone(), format!("check panicked: {message}"))
                .with_trace(format!("check #{idx} ({name}) panicked\n{message}"))
        }
    };

    if outcome.timing.is_some() {
        outcome
    } else {
        outcome.with_timing(elapsed)
    }
}

fn error_chain(err: &CheckError) -> Vec<String> {
    let mut chain = vec![err.to_string()];
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    chain
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
