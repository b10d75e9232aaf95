//! Harness inputs and their deterministic identity.

use profcheck_core::{AgentConfigBuilder, InterruptBoundary};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::check::BuiltinCheck;
use crate::workload::{DEFAULT_FIBONACCI_INPUT, DEFAULT_MAX_INPUT};

/// Tunable constants carried into the checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessSettings {
    pub boundary: InterruptBoundary,
    pub fibonacci_input: u32,
    pub max_fibonacci_input: u32,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            boundary: InterruptBoundary::default(),
            fibonacci_input: DEFAULT_FIBONACCI_INPUT,
            max_fibonacci_input: DEFAULT_MAX_INPUT,
        }
    }
}

/// Everything one harness run depends on.
///
/// Version strings stay unparsed here; parsing happens inside the
/// compatibility check so a malformed version fails that check only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessInputs {
    pub runtime_version: String,
    pub runtime_platform: String,
    pub profiler_version: String,
    pub artifact_path: PathBuf,
    pub agent_options: BTreeMap<String, Value>,
    pub settings: HarnessSettings,
}

impl HarnessInputs {
    /// Inputs with the dry-run agent options and default settings.
    pub fn new(
        runtime_version: impl Into<String>,
        profiler_version: impl Into<String>,
        artifact_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runtime_version: runtime_version.into(),
            runtime_platform: host_platform(),
            profiler_version: profiler_version.into(),
            artifact_path: artifact_path.into(),
            agent_options: AgentConfigBuilder::dry_run_defaults().options().clone(),
            settings: HarnessSettings::default(),
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.runtime_platform = platform.into();
        self
    }

    /// Set (or replace) an agent option.
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.agent_options.insert(name.into(), value.into());
        self
    }

    pub fn with_settings(mut self, settings: HarnessSettings) -> Self {
        self.settings = settings;
        self
    }

    /// SHA-256 over the ordered check names and every input (hex).
    ///
    /// Identical inputs always produce the same digest, so two reports can be
    /// compared for equal preconditions.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        let mut field = |bytes: &[u8]| {
            hasher.update(bytes);
            hasher.update(b"\0");
        };

        for check in BuiltinCheck::ALL {
            field(check.name().as_bytes());
        }
        field(self.runtime_version.as_bytes());
        field(self.runtime_platform.as_bytes());
        field(self.profiler_version.as_bytes());
        field(self.artifact_path.to_string_lossy().as_bytes());
        for (name, value) in &self.agent_options {
            field(name.as_bytes());
            field(value.to_string().as_bytes());
        }
        field(self.settings.boundary.runtime_threshold.to_string().as_bytes());
        field(self.settings.boundary.profiler_threshold.to_string().as_bytes());
        field(&self.settings.fibonacci_input.to_le_bytes());
        field(&self.settings.max_fibonacci_input.to_le_bytes());

        hex::encode(hasher.finalize())
    }
}

/// `<arch>-<os>` of the running host.
pub fn host_platform() -> String {
    format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS)
}
