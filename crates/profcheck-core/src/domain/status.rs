//! Check and report status classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome classification for a single check or a whole report.
///
/// `Skip` marks a check that was not applicable. It never raises the
/// overall status of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Skip,
    Warn,
    Fail,
}

impl Status {
    /// Severity rank used for overall precedence. `Skip` ranks with `Pass`.
    pub fn rank(self) -> u8 {
        match self {
            Status::Pass | Status::Skip => 0,
            Status::Warn => 1,
            Status::Fail => 2,
        }
    }

    pub fn is_failure(self) -> bool {
        self == Status::Fail
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pass => write!(f, "PASS"),
            Status::Skip => write!(f, "SKIP"),
            Status::Warn => write!(f, "WARN"),
            Status::Fail => write!(f, "FAIL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_rank() {
        assert_eq!(Status::Pass.rank(), Status::Skip.rank());
        assert!(Status::Warn.rank() > Status::Pass.rank());
        assert!(Status::Fail.rank() > Status::Warn.rank());
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&Status::Warn).unwrap();
        assert_eq!(json, "\"warn\"");
        let back: Status = serde_json::from_str("\"skip\"").unwrap();
        assert_eq!(back, Status::Skip);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::Fail.to_string(), "FAIL");
        assert_eq!(Status::Pass.to_string(), "PASS");
    }
}
