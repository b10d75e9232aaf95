//! Structured observability hooks for the harness lifecycle.
//!
//! Provides a run-scoped span guard and emitters for the events an operator
//! grepping logs cares about: harness start/finish, each check transition,
//! and the fatal dependency-load failure.

use tracing::{error, info};

use crate::domain::status::Status;

/// RAII guard that enters a run-scoped tracing span for the duration of a
/// harness run.
///
/// ```ignore
/// let _span = HarnessSpan::enter("6f1c...");
/// // every event below is tagged with run_id
/// ```
pub struct HarnessSpan {
    _span: tracing::span::EnteredSpan,
}

impl HarnessSpan {
    pub fn enter(run_id: &str) -> Self {
        let span = tracing::info_span!("profcheck.run", run_id = %run_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: harness started against a runtime/profiler pair.
pub fn emit_harness_started(run_id: &str, runtime_version: &str, profiler_version: &str) {
    info!(
        event = "harness.started",
        run_id = %run_id,
        runtime_version = %runtime_version,
        profiler_version = %profiler_version,
    );
}

/// Emit event: a check entered the running state.
pub fn emit_check_started(check: &str, index: usize) {
    info!(event = "check.started", check = %check, index = index);
}

/// Emit event: a check outcome was recorded.
pub fn emit_check_recorded(check: &str, index: usize, status: Status, elapsed_ms: u64) {
    info!(
        event = "check.recorded",
        check = %check,
        index = index,
        status = %status,
        elapsed_ms = elapsed_ms,
    );
}

/// Emit event: harness finished with an overall status.
pub fn emit_harness_finished(run_id: &str, overall: Status, checks: usize, duration_ms: u64) {
    info!(
        event = "harness.finished",
        run_id = %run_id,
        overall = %overall,
        checks = checks,
        duration_ms = duration_ms,
    );
}

/// Emit event: the profiling integration could not be loaded.
pub fn emit_dependency_load_failed(check: &str, error: &dyn std::fmt::Display) {
    error!(event = "dependency.load_failed", check = %check, error = %error);
}
