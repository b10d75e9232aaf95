//! Error types for harness checks.

use std::path::PathBuf;
use thiserror::Error;

use profcheck_core::{ConfigValidationError, MatrixError, VersionParseError};

/// The profiling integration could not be loaded. This is the only fatal
/// condition: no check runs without it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyLoadError {
    #[error("integration name must not be empty")]
    MissingName,

    #[error("integration {name} cannot be loaded from {}: {reason}", .root.display())]
    Unavailable {
        name: String,
        root: PathBuf,
        reason: String,
    },
}

/// Failure of the CPU-bound workload probe.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkloadFault {
    #[error("input {n} exceeds the workload ceiling of {max}")]
    InputTooLarge { n: u32, max: u32 },
}

/// A check could not produce an outcome on its own. The runner turns every
/// variant into a `Fail` outcome.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("invalid {subject} version")]
    Version {
        subject: &'static str,
        #[source]
        source: VersionParseError,
    },

    #[error("agent configuration rejected")]
    Config {
        #[source]
        source: ConfigValidationError,
        /// Non-fatal findings gathered before validation failed.
        warnings: Vec<String>,
    },

    #[error("compatibility matrix rejected")]
    Matrix(#[from] MatrixError),

    #[error("workload failed")]
    Workload(#[from] WorkloadFault),
}

impl CheckError {
    /// Diagnostic lines to keep on the failed outcome.
    pub fn diagnostics(&self) -> &[String] {
        match self {
            CheckError::Config { warnings, .. } => warnings,
            _ => &[],
        }
    }
}

impl From<ConfigValidationError> for CheckError {
    fn from(source: ConfigValidationError) -> Self {
        CheckError::Config {
            source,
            warnings: Vec::new(),
        }
    }
}

/// Result type for a single check.
pub type Result<T> = std::result::Result<T, CheckError>;
