//! Harness orchestration: load the integration, run the checks, aggregate.

use profcheck_core::{
    emit_dependency_load_failed, emit_harness_finished, emit_harness_started,
    CompatibilityMatrix, HarnessSpan,
};
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::check::BuiltinCheck;
use crate::checks::{
    ArtifactCheck, CompatibilityCheck, ConfigCheck, IntegrationCheck, WorkloadCheck,
};
use crate::error::DependencyLoadError;
use crate::inputs::HarnessInputs;
use crate::integration::{IntegrationInfo, IntegrationLoader};
use crate::report::{Environment, Report, ReportAggregator, ReportHeader};
use crate::runner::CheckRunner;
use crate::workload::WorkloadProbe;

/// Harness entry point.
pub struct Harness;

impl Harness {
    /// Run the full preflight.
    ///
    /// Loading the integration is the only step allowed to end the run
    /// early; it returns `Err` and no report is produced. Every later check
    /// always runs and lands in the report.
    pub fn run(
        loader: &dyn IntegrationLoader,
        inputs: &HarnessInputs,
    ) -> Result<Report, DependencyLoadError> {
        let start = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        let _span = HarnessSpan::enter(&run_id);
        emit_harness_started(&run_id, &inputs.runtime_version, &inputs.profiler_version);

        let info = loader.load().map_err(|e| {
            emit_dependency_load_failed(BuiltinCheck::IntegrationLoad.name(), &e);
            e
        })?;
        info!(integration = %info.name, "Integration loaded");

        let environment = Environment {
            runtime_version: inputs.runtime_version.clone(),
            runtime_platform: inputs.runtime_platform.clone(),
            profiler_version: inputs.profiler_version.clone(),
            integration_name: info.name.clone(),
            integration_version: info.version.clone(),
        };

        let completed = Self::runner(info, inputs).run();

        let duration_ms = start.elapsed().as_millis() as u64;
        let header = ReportHeader {
            run_id: run_id.clone(),
            environment,
            inputs_digest: inputs.digest(),
            duration_ms,
        };
        let report = ReportAggregator::new(header).aggregate(completed.outcomes);

        emit_harness_finished(&run_id, report.overall(), report.outcomes().len(), duration_ms);
        Ok(report)
    }

    /// The builtin checks in their fixed order.
    pub fn runner(info: IntegrationInfo, inputs: &HarnessInputs) -> CheckRunner {
        let settings = &inputs.settings;
        CheckRunner::new()
            .with_check(IntegrationCheck::new(info))
            .with_check(ArtifactCheck::new(inputs.artifact_path.clone()))
            .with_check(ConfigCheck::new(inputs.agent_options.clone()))
            .with_check(CompatibilityCheck::new(
                inputs.runtime_version.clone(),
                inputs.profiler_version.clone(),
                CompatibilityMatrix::interrupt_boundary(&settings.boundary),
            ))
            .with_check(WorkloadCheck::new(
                settings.fibonacci_input,
                WorkloadProbe::new(settings.max_fibonacci_input),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::DeclaredIntegration;
    use profcheck_core::Status;

    #[test]
    fn test_runner_order_matches_builtin_order() {
        let dir = tempfile::tempdir().unwrap();
        let info = DeclaredIntegration::new("pyroscope", dir.path()).load().unwrap();
        let inputs = HarnessInputs::new("3.4.6", "0.37.1", dir.path().join("rbspy.so"));

        let completed = Harness::runner(info, &inputs).run();
        let names: Vec<&str> = completed.outcomes.iter().map(|o| o.name.as_str()).collect();
        let expected: Vec<&str> = BuiltinCheck::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_dependency_failure_produces_no_report() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DeclaredIntegration::new("pyroscope", dir.path().join("missing"));
        let inputs = HarnessInputs::new("3.4.6", "0.37.1", dir.path().join("rbspy.so"));
        assert!(Harness::run(&loader, &inputs).is_err());
    }

    #[test]
    fn test_report_environment() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DeclaredIntegration::new("pyroscope", dir.path()).with_version("0.6.6");
        let inputs = HarnessInputs::new("3.4.6", "0.37.1", dir.path().join("rbspy.so"))
            .with_platform("arm64-darwin23");

        let report = Harness::run(&loader, &inputs).unwrap();
        assert_eq!(report.environment().runtime_platform, "arm64-darwin23");
        assert_eq!(report.environment().integration_version.as_deref(), Some("0.6.6"));
        assert_eq!(report.inputs_digest(), inputs.digest());
        assert_eq!(report.overall(), Status::Warn);
    }
}
