//! Loading the profiling integration.
//!
//! [`IntegrationLoader`] is the seam to whatever provides the profiling
//! integration. Failing to load it is the single fatal harness condition.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::DependencyLoadError;

/// Default integration name.
pub const DEFAULT_INTEGRATION_NAME: &str = "pyroscope";

/// Facts about a successfully loaded integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationInfo {
    pub name: String,
    /// Declared integration version, when known.
    pub version: Option<String>,
    pub root: PathBuf,
}

/// Loads the profiling integration.
pub trait IntegrationLoader {
    fn load(&self) -> Result<IntegrationInfo, DependencyLoadError>;
}

/// Integration declared by name, optional version and an install root that
/// must be an existing directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredIntegration {
    pub name: String,
    pub version: Option<String>,
    pub root: PathBuf,
}

impl DeclaredIntegration {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            version: None,
            root: root.into(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

impl IntegrationLoader for DeclaredIntegration {
    fn load(&self) -> Result<IntegrationInfo, DependencyLoadError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DependencyLoadError::MissingName);
        }

        let unavailable = |reason: String| DependencyLoadError::Unavailable {
            name: name.to_string(),
            root: self.root.clone(),
            reason,
        };
        let metadata = fs::metadata(&self.root).map_err(|e| unavailable(e.to_string()))?;
        if !metadata.is_dir() {
            return Err(unavailable("integration root is not a directory".to_string()));
        }

        Ok(IntegrationInfo {
            name: name.to_string(),
            version: self
                .version
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            root: self.root.clone(),
        })
    }
}
