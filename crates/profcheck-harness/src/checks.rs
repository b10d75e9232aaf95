//! The builtin checks.
//!
//! Each check owns the inputs it needs and nothing else.

use profcheck_core::agent_config;
use profcheck_core::{CompatibilityMatrix, Verdict, Version};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::artifact::{self, ArtifactStatus};
use crate::check::{BuiltinCheck, Check, CheckOutcome};
use crate::error::{CheckError, Result};
use crate::integration::IntegrationInfo;
use crate::workload::WorkloadProbe;

/// Records the already-loaded integration.
pub struct IntegrationCheck {
    info: IntegrationInfo,
}

impl IntegrationCheck {
    pub fn new(info: IntegrationInfo) -> Self {
        Self { info }
    }
}

impl Check for IntegrationCheck {
    fn name(&self) -> &str {
        BuiltinCheck::IntegrationLoad.name()
    }

    fn run(&self) -> Result<CheckOutcome> {
        let mut outcome = CheckOutcome::pass(
            self.name(),
            format!("{} integration loaded", self.info.name),
        )
        .with_diagnostic(format!("root: {}", self.info.root.display()));
        if let Some(version) = &self.info.version {
            outcome = outcome.with_diagnostic(format!("version: {version}"));
        }
        Ok(outcome)
    }
}

/// Probes the native profiler artifact.
pub struct ArtifactCheck {
    path: PathBuf,
}

impl ArtifactCheck {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Check for ArtifactCheck {
    fn name(&self) -> &str {
        BuiltinCheck::ArtifactProbe.name()
    }

    fn run(&self) -> Result<CheckOutcome> {
        let shown = self.path.display();
        let outcome = match artifact::probe(&self.path) {
            ArtifactStatus::Found { size_bytes: 0 } => {
                CheckOutcome::warn(self.name(), format!("native artifact at {shown} is empty"))
                    .with_diagnostic("size: 0 bytes")
            }
            ArtifactStatus::Found { size_bytes } => {
                CheckOutcome::pass(self.name(), format!("native artifact found: {shown}"))
                    .with_diagnostic(format!("size: {size_bytes} bytes"))
            }
            ArtifactStatus::NotFound => CheckOutcome::warn(
                self.name(),
                format!("native artifact not found at {shown}"),
            )
            .with_diagnostic("expected when running from a development checkout"),
            ArtifactStatus::ReadError { reason } => CheckOutcome::fail(
                self.name(),
                format!("native artifact at {shown} is unreadable"),
            )
            .with_trace(reason),
        };
        Ok(outcome)
    }
}

/// Builds the agent configuration without activating it.
pub struct ConfigCheck {
    options: BTreeMap<String, Value>,
}

impl ConfigCheck {
    pub fn new(options: BTreeMap<String, Value>) -> Self {
        Self { options }
    }
}

impl Check for ConfigCheck {
    fn name(&self) -> &str {
        BuiltinCheck::AgentConfig.name()
    }

    fn run(&self) -> Result<CheckOutcome> {
        let built = agent_config::build(&self.options).map_err(|source| CheckError::Config {
            source,
            warnings: agent_config::unrecognized_options(&self.options)
                .into_iter()
                .map(|w| w.message)
                .collect(),
        })?;
        let config = &built.config;

        let mut outcome = if built.warnings.is_empty() {
            CheckOutcome::pass(self.name(), "configuration created")
        } else {
            CheckOutcome::warn(
                self.name(),
                format!(
                    "configuration created with {} ignored option(s)",
                    built.warnings.len()
                ),
            )
        };

        for (name, value) in config.entries() {
            outcome = outcome.with_diagnostic(format!("{name}: {value}"));
        }
        for warning in &built.warnings {
            outcome = outcome.with_diagnostic(warning.message.clone());
        }
        Ok(outcome.with_diagnostic(format!(
            "agent not started; actual {} profiling requires a server at {}",
            config.sampling_mode(),
            config.server_address
        )))
    }
}

/// Evaluates the runtime/profiler pair against the compatibility matrix.
pub struct CompatibilityCheck {
    runtime_version: String,
    profiler_version: String,
    matrix: CompatibilityMatrix,
}

impl CompatibilityCheck {
    pub fn new(
        runtime_version: impl Into<String>,
        profiler_version: impl Into<String>,
        matrix: CompatibilityMatrix,
    ) -> Self {
        Self {
            runtime_version: runtime_version.into(),
            profiler_version: profiler_version.into(),
            matrix,
        }
    }
}

impl Check for CompatibilityCheck {
    fn name(&self) -> &str {
        BuiltinCheck::Compatibility.name()
    }

    fn run(&self) -> Result<CheckOutcome> {
        let runtime = Version::parse(&self.runtime_version).map_err(|source| {
            CheckError::Version {
                subject: "runtime",
                source,
            }
        })?;
        let profiler = Version::parse(&self.profiler_version).map_err(|source| {
            CheckError::Version {
                subject: "profiler",
                source,
            }
        })?;

        let eval = self.matrix.evaluate(&runtime, &profiler);
        let outcome = match eval.verdict {
            Verdict::Supported => CheckOutcome::pass(
                self.name(),
                format!("runtime {runtime} is compatible with profiler {profiler}"),
            )
            .with_diagnostic("this runtime includes the interrupt masking changes"),
            Verdict::Unsupported => CheckOutcome::fail(
                self.name(),
                format!("runtime {runtime} is not supported by profiler {profiler}"),
            )
            .with_diagnostic("upgrade the profiler before enabling profiling"),
            Verdict::Unknown if eval.matched() => CheckOutcome::skip(
                self.name(),
                format!("runtime {runtime} predates the interrupt-handling boundary"),
            )
            .with_diagnostic("the profiler fix is primarily needed for runtime 3.4.6+ support"),
            Verdict::Unknown => CheckOutcome::warn(
                self.name(),
                format!("compatibility of runtime {runtime} with profiler {profiler} is unknown"),
            ),
        };

        Ok(outcome
            .with_diagnostic(format!("verdict: {}", eval.verdict))
            .with_diagnostic(eval.rationale))
    }
}

/// Runs and times the CPU-bound workload.
pub struct WorkloadCheck {
    input: u32,
    probe: WorkloadProbe,
}

impl WorkloadCheck {
    pub fn new(input: u32, probe: WorkloadProbe) -> Self {
        Self { input, probe }
    }
}

impl Check for WorkloadCheck {
    fn name(&self) -> &str {
        BuiltinCheck::Workload.name()
    }

    fn run(&self) -> Result<CheckOutcome> {
        let sample = self.probe.run(self.input)?;
        Ok(CheckOutcome::pass(
            self.name(),
            format!(
                "workload completed: fibonacci({}) = {}",
                sample.n, sample.result
            ),
        )
        .with_diagnostic(format!("elapsed: {:.2}ms", sample.elapsed_ms()))
        .with_diagnostic("with the agent running, this workload would generate stack traces")
        .with_timing(sample.elapsed))
    }
}
