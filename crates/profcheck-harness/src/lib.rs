//! profcheck harness - native profiler preflight
//!
//! Provides the preflight pipeline that:
//! - Loads the profiling integration (the only fatal step)
//! - Runs the artifact, configuration, compatibility and workload checks in order
//! - Captures every failure as an outcome instead of stopping early
//! - Aggregates outcomes into an immutable report

pub mod artifact;
pub mod check;
pub mod checks;
pub mod error;
pub mod inputs;
pub mod integration;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod workload;

// Re-export key types
pub use artifact::{default_artifact_path, probe, ArtifactStatus};
pub use check::{BuiltinCheck, Check, CheckOutcome};
pub use error::{CheckError, DependencyLoadError, WorkloadFault};
pub use inputs::{HarnessInputs, HarnessSettings};
pub use integration::{DeclaredIntegration, IntegrationInfo, IntegrationLoader};
pub use pipeline::Harness;
pub use report::{aggregate, overall_status, Environment, Report, ReportAggregator, ReportSummary};
pub use runner::{CheckRunner, CompletedRun, RunnerState};
pub use workload::{WorkloadProbe, WorkloadSample};
