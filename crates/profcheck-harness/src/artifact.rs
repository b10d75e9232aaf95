//! Native profiler artifact probe.
//!
//! Read-only: the artifact is stat'ed and opened for reading once, its
//! contents are never read and it is never loaded or executed.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Artifact location relative to the integration root.
pub const DEFAULT_ARTIFACT_RELATIVE_PATH: &str = "lib/rbspy/rbspy.so";

/// What the probe observed at the artifact path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactStatus {
    Found { size_bytes: u64 },
    NotFound,
    ReadError { reason: String },
}

/// Default artifact path under an integration root.
pub fn default_artifact_path(root: &Path) -> PathBuf {
    root.join(DEFAULT_ARTIFACT_RELATIVE_PATH)
}

/// Probe the artifact at `path`. No retry on transient errors.
pub fn probe(path: &Path) -> ArtifactStatus {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return ArtifactStatus::NotFound,
        Err(e) => {
            return ArtifactStatus::ReadError {
                reason: e.to_string(),
            }
        }
    };

    if metadata.is_dir() {
        return ArtifactStatus::ReadError {
            reason: "path is a directory".to_string(),
        };
    }
    if !metadata.is_file() {
        return ArtifactStatus::ReadError {
            reason: "path is not a regular file".to_string(),
        };
    }

    match File::open(path) {
        Ok(_) => ArtifactStatus::Found {
            size_bytes: metadata.len(),
        },
        Err(e) => ArtifactStatus::ReadError {
            reason: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_probe_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(probe(&dir.path().join("rbspy.so")), ArtifactStatus::NotFound);
    }

    #[test]
    fn test_probe_found_reports_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rbspy.so");
        let mut file = File::create(&path).unwrap();
        file.write_all(&[0x7f, b'E', b'L', b'F', 0, 0, 0, 0]).unwrap();
        drop(file);

        assert_eq!(probe(&path), ArtifactStatus::Found { size_bytes: 8 });
    }

    #[test]
    fn test_probe_directory_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        match probe(dir.path()) {
            ArtifactStatus::ReadError { reason } => assert!(reason.contains("directory")),
            other => panic!("expected ReadError, got {:?}", other),
        }
    }

    #[test]
    fn test_default_artifact_path() {
        let path = default_artifact_path(Path::new("/gems/pyroscope"));
        assert_eq!(path, PathBuf::from("/gems/pyroscope/lib/rbspy/rbspy.so"));
    }
}
