//! Report aggregation.
//!
//! Overall status precedence: any `Fail` wins, then any `Warn`, otherwise
//! `Pass`. `Skip` outcomes and timings never influence the overall status.
//! A [`Report`] is built once and exposes no mutating API.

use chrono::{DateTime, Utc};
use profcheck_core::Status;
use serde::{Deserialize, Serialize};

use crate::check::CheckOutcome;

/// Guidance for running a full profiling test after a clean preflight.
pub const NEXT_STEPS: [&str; 6] = [
    "start a profiling server (e.g. docker run -p 4040:4040 grafana/pyroscope)",
    "point the server_address option at it",
    "start the profiling agent from the application",
    "run a real workload and verify profiles are captured",
    "for 3.4.6+ specific testing, ensure the runtime is >= 3.4.6",
    "verify that profiling works without crashes and stack traces are captured correctly",
];

/// Counters per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub pass: usize,
    pub warn: usize,
    pub fail: usize,
    pub skip: usize,
}

/// Environment the checks ran against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub runtime_version: String,
    pub runtime_platform: String,
    pub profiler_version: String,
    pub integration_name: String,
    pub integration_version: Option<String>,
}

/// Identity of a run, supplied to the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportHeader {
    pub run_id: String,
    pub environment: Environment,
    pub inputs_digest: String,
    pub duration_ms: u64,
}

/// Final, immutable harness report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    run_id: String,
    generated_at: DateTime<Utc>,
    environment: Environment,
    inputs_digest: String,
    duration_ms: u64,
    outcomes: Vec<CheckOutcome>,
    summary: ReportSummary,
    overall: Status,
    next_steps: Vec<String>,
}

impl Report {
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn inputs_digest(&self) -> &str {
        &self.inputs_digest
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn outcomes(&self) -> &[CheckOutcome] {
        &self.outcomes
    }

    pub fn outcome(&self, name: &str) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    pub fn summary(&self) -> &ReportSummary {
        &self.summary
    }

    pub fn overall(&self) -> Status {
        self.overall
    }

    pub fn next_steps(&self) -> &[String] {
        &self.next_steps
    }

    /// Statuses in check order; timing-free view used to compare runs.
    pub fn statuses(&self) -> Vec<(String, Status)> {
        self.outcomes
            .iter()
            .map(|o| (o.name.clone(), o.status))
            .collect()
    }

    /// Render as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Overall status of a sequence of outcomes.
pub fn overall_status(outcomes: &[CheckOutcome]) -> Status {
    outcomes
        .iter()
        .map(|o| o.status)
        .filter(|s| s.rank() > 0)
        .max_by_key(|s| s.rank())
        .unwrap_or(Status::Pass)
}

/// Builds reports for one run.
#[derive(Debug, Clone, Default)]
pub struct ReportAggregator {
    header: ReportHeader,
}

impl ReportAggregator {
    pub fn new(header: ReportHeader) -> Self {
        Self { header }
    }

    /// Consume the outcomes into a report.
    pub fn aggregate(self, outcomes: Vec<CheckOutcome>) -> Report {
        let mut summary = ReportSummary::default();
        for outcome in &outcomes {
            match outcome.status {
                Status::Pass => summary.pass += 1,
                Status::Warn => summary.warn += 1,
                Status::Fail => summary.fail += 1,
                Status::Skip => summary.skip += 1,
            }
        }
        let overall = overall_status(&outcomes);

        Report {
            run_id: self.header.run_id,
            generated_at: Utc::now(),
            environment: self.header.environment,
            inputs_digest: self.header.inputs_digest,
            duration_ms: self.header.duration_ms,
            outcomes,
            summary,
            overall,
            next_steps: NEXT_STEPS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Aggregate outcomes with an empty header.
pub fn aggregate(outcomes: Vec<CheckOutcome>) -> Report {
    ReportAggregator::default().aggregate(outcomes)
}
