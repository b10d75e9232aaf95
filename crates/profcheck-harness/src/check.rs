//! Check definitions and per-check outcomes.

use profcheck_core::Status;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::Result;

/// Longest trace kept on a failed outcome, in characters.
pub const MAX_TRACE_CHARS: usize = 1024;

/// Most trace lines kept on a failed outcome.
pub const MAX_TRACE_LINES: usize = 5;

/// Builtin harness checks, in execution order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinCheck {
    /// Profiling integration loaded.
    IntegrationLoad,

    /// Native profiler artifact present and readable.
    ArtifactProbe,

    /// Agent configuration validates.
    AgentConfig,

    /// Runtime/profiler pair against the compatibility matrix.
    Compatibility,

    /// CPU-bound liveness workload.
    Workload,
}

impl BuiltinCheck {
    /// Fixed execution order.
    pub const ALL: [BuiltinCheck; 5] = [
        BuiltinCheck::IntegrationLoad,
        BuiltinCheck::ArtifactProbe,
        BuiltinCheck::AgentConfig,
        BuiltinCheck::Compatibility,
        BuiltinCheck::Workload,
    ];

    /// Stable identifier used in reports and logs.
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinCheck::IntegrationLoad => "integration_load",
            BuiltinCheck::ArtifactProbe => "artifact_probe",
            BuiltinCheck::AgentConfig => "agent_config",
            BuiltinCheck::Compatibility => "compatibility",
            BuiltinCheck::Workload => "workload",
        }
    }

    /// Human-readable title for rendering.
    pub fn title(&self) -> &'static str {
        match self {
            BuiltinCheck::IntegrationLoad => "Loading profiling integration",
            BuiltinCheck::ArtifactProbe => "Checking native profiler artifact",
            BuiltinCheck::AgentConfig => "Building agent configuration (dry run)",
            BuiltinCheck::Compatibility => "Checking runtime/profiler compatibility",
            BuiltinCheck::Workload => "Simulating workload",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// Recorded result of one check execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Check identifier.
    pub name: String,

    pub status: Status,

    /// One-line human-readable summary.
    pub detail: String,

    /// Wall-clock time spent in the check.
    pub timing: Option<Duration>,

    /// Additional detail lines, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,

    /// Bounded failure context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl CheckOutcome {
    fn new(name: impl Into<String>, status: Status, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            detail: detail.into(),
            timing: None,
            diagnostics: Vec::new(),
            trace: None,
        }
    }

    pub fn pass(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, Status::Pass, detail)
    }

    pub fn warn(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, Status::Warn, detail)
    }

    pub fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, Status::Fail, detail)
    }

    pub fn skip(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, Status::Skip, detail)
    }

    pub fn with_timing(mut self, elapsed: Duration) -> Self {
        self.timing = Some(elapsed);
        self
    }

    pub fn with_diagnostic(mut self, line: impl Into<String>) -> Self {
        self.diagnostics.push(line.into());
        self
    }

    /// Attach failure context, truncated to [`MAX_TRACE_LINES`] lines and
    /// [`MAX_TRACE_CHARS`] characters.
    pub fn with_trace(mut self, trace: impl AsRef<str>) -> Self {
        self.trace = Some(bound_trace(trace.as_ref()));
        self
    }

    pub fn timing_ms(&self) -> Option<f64> {
        self.timing.map(|t| t.as_secs_f64() * 1000.0)
    }
}

/// Truncate a trace to the configured line and character limits.
pub fn bound_trace(trace: &str) -> String {
    let lines: Vec<&str> = trace.lines().collect();
    let mut out = lines
        .iter()
        .take(MAX_TRACE_LINES)
        .copied()
        .collect::<Vec<_>>()
        .join("\n");
    let mut truncated = lines.len() > MAX_TRACE_LINES;

    if out.chars().count() > MAX_TRACE_CHARS {
        out = out.chars().take(MAX_TRACE_CHARS).collect();
        truncated = true;
    }
    if truncated {
        out.push_str("\n... (truncated)");
    }
    out
}

/// A single independent harness check.
///
/// A check sees only its own inputs and never observes other outcomes.
/// Returning `Err` or panicking is allowed; the runner records either as a
/// `Fail` outcome and moves on.
pub trait Check {
    /// Identifier recorded on the outcome.
    fn name(&self) -> &str;

    fn run(&self) -> Result<CheckOutcome>;
}
