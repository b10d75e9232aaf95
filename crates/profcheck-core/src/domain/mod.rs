//! Domain models for profcheck.
//!
//! Canonical definitions shared by the harness and the CLI:
//! - `Status`: the per-check and overall outcome classification
//! - error taxonomy for version parsing, matrix construction and config validation

pub mod error;
pub mod status;

pub use error::{ConfigValidationError, MatrixError, VersionParseError};
pub use status::Status;
