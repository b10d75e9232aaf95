//! Domain-level error taxonomy for profcheck.

/// Errors produced while parsing a version string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    #[error("invalid version format '{input}': {reason}")]
    InvalidFormat { input: String, reason: String },
}

impl VersionParseError {
    pub(crate) fn invalid(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors produced while assembling a compatibility matrix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    #[error("rules {first} and {second} overlap with conflicting verdicts at equal specificity")]
    AmbiguousRules { first: usize, second: usize },

    #[error("rule {index} has an empty {subject} range")]
    EmptyRange { index: usize, subject: &'static str },
}

/// Errors produced by agent configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("option {option} is out of range: {reason}")]
    OutOfRange { option: String, reason: String },

    #[error("option {option} expects {expected}")]
    InvalidType {
        option: String,
        expected: &'static str,
    },

    #[error("option {option} has an invalid value: {reason}")]
    InvalidValue { option: String, reason: String },

    #[error("required option {0} is missing")]
    MissingOption(String),
}
