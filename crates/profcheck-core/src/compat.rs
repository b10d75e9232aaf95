//! Runtime/profiler compatibility matrix.
//!
//! Maps a (runtime version, profiler version) pair to a [`Verdict`] by
//! selecting the most specific [`CompatRule`] whose ranges contain both
//! versions. Pairs that no rule covers evaluate to [`Verdict::Unknown`].
//!
//! The standard matrix encodes the interrupt-handling boundary: runtimes at
//! or above 3.4 changed how sampling interrupts are delivered, and need a
//! profiler at or above 0.37.1. Below the runtime threshold the fix does not
//! apply and the pair is reported as informational.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::MatrixError;
use crate::version::Version;

/// Runtime version (major, minor) at which interrupt handling changed.
pub const RUNTIME_INTERRUPT_THRESHOLD: [u64; 2] = [3, 4];

/// First profiler version known to handle the changed interrupt delivery.
pub const PROFILER_KNOWN_GOOD: [u64; 3] = [0, 37, 1];

/// Compatibility classification for a version pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Supported,
    Unsupported,
    Unknown,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Supported => f.write_str("supported"),
            Verdict::Unsupported => f.write_str("unsupported"),
            Verdict::Unknown => f.write_str("unknown"),
        }
    }
}

/// Half-open version range: `min` inclusive, `max` exclusive when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRange {
    pub min: Version,
    pub max: Option<Version>,
}

impl VersionRange {
    /// Every version at or above `min`.
    pub fn at_least(min: Version) -> Self {
        Self { min, max: None }
    }

    /// Versions in `[min, max)`.
    pub fn between(min: Version, max: Version) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// Every version.
    pub fn any() -> Self {
        Self::at_least(Version::from_components(&[0]))
    }

    pub fn contains(&self, version: &Version) -> bool {
        *version >= self.min && self.max.as_ref().map_or(true, |max| version < max)
    }

    pub fn is_empty(&self) -> bool {
        self.max.as_ref().is_some_and(|max| *max <= self.min)
    }

    pub fn overlaps(&self, other: &VersionRange) -> bool {
        let below_other_max = other.max.as_ref().map_or(true, |max| self.min < *max);
        let other_below_max = self.max.as_ref().map_or(true, |max| other.min < *max);
        below_other_max && other_below_max
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.max {
            Some(max) => write!(f, ">={}, <{}", self.min, max),
            None => write!(f, ">={}", self.min),
        }
    }
}

/// A single matrix entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatRule {
    pub runtime: VersionRange,
    pub profiler: VersionRange,
    pub verdict: Verdict,
    /// Human-readable explanation carried into the evaluation.
    pub rationale: String,
}

impl CompatRule {
    fn matches(&self, runtime: &Version, profiler: &Version) -> bool {
        self.runtime.contains(runtime) && self.profiler.contains(profiler)
    }

    fn specificity(&self) -> (&Version, bool, &Version, bool) {
        (
            &self.runtime.min,
            self.runtime.max.is_some(),
            &self.profiler.min,
            self.profiler.max.is_some(),
        )
    }
}

/// Thresholds that define the interrupt-handling boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterruptBoundary {
    /// Runtime versions at or above this need the profiler fix.
    pub runtime_threshold: Version,
    /// Profiler versions at or above this carry the fix.
    pub profiler_threshold: Version,
}

impl Default for InterruptBoundary {
    fn default() -> Self {
        Self {
            runtime_threshold: Version::from_components(&RUNTIME_INTERRUPT_THRESHOLD),
            profiler_threshold: Version::from_components(&PROFILER_KNOWN_GOOD),
        }
    }
}

/// Result of evaluating a version pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub verdict: Verdict,
    pub rationale: String,
    /// Index of the rule that decided the verdict; `None` when nothing matched.
    pub rule: Option<usize>,
}

impl Evaluation {
    /// Whether any rule covered the evaluated pair.
    pub fn matched(&self) -> bool {
        self.rule.is_some()
    }
}

/// Ordered set of compatibility rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityMatrix {
    rules: Vec<CompatRule>,
}

impl CompatibilityMatrix {
    /// Build a matrix, rejecting empty ranges and rules that could yield two
    /// different verdicts for the same pair at equal specificity.
    pub fn new(rules: Vec<CompatRule>) -> Result<Self, MatrixError> {
        for (index, rule) in rules.iter().enumerate() {
            if rule.runtime.is_empty() {
                return Err(MatrixError::EmptyRange {
                    index,
                    subject: "runtime",
                });
            }
            if rule.profiler.is_empty() {
                return Err(MatrixError::EmptyRange {
                    index,
                    subject: "profiler",
                });
            }
        }

        for (first, a) in rules.iter().enumerate() {
            for (offset, b) in rules[first + 1..].iter().enumerate() {
                let conflicting = a.verdict != b.verdict
                    && a.runtime.overlaps(&b.runtime)
                    && a.profiler.overlaps(&b.profiler)
                    && a.specificity() == b.specificity();
                if conflicting {
                    return Err(MatrixError::AmbiguousRules {
                        first,
                        second: first + 1 + offset,
                    });
                }
            }
        }

        Ok(Self { rules })
    }

    /// The standard matrix for the interrupt-handling boundary.
    ///
    /// Rules whose range would be empty (a zero threshold) are omitted, so the
    /// result never fails validation.
    pub fn interrupt_boundary(boundary: &InterruptBoundary) -> Self {
        let zero = Version::from_components(&[0]);
        let runtime_min = &boundary.runtime_threshold;
        let profiler_min = &boundary.profiler_threshold;
        let mut rules = Vec::with_capacity(3);

        rules.push(CompatRule {
            runtime: VersionRange::at_least(runtime_min.clone()),
            profiler: VersionRange::at_least(profiler_min.clone()),
            verdict: Verdict::Supported,
            rationale: format!(
                "runtime >= {runtime_min} changed interrupt handling for sampling; \
                 profiler >= {profiler_min} includes the interrupt-handling fix"
            ),
        });

        if *profiler_min > zero {
            rules.push(CompatRule {
                runtime: VersionRange::at_least(runtime_min.clone()),
                profiler: VersionRange::between(zero.clone(), profiler_min.clone()),
                verdict: Verdict::Unsupported,
                rationale: format!(
                    "runtime >= {runtime_min} changed interrupt handling for sampling; \
                     profilers below {profiler_min} lack the interrupt-handling fix"
                ),
            });
        }

        if *runtime_min > zero {
            rules.push(CompatRule {
                runtime: VersionRange::between(zero, runtime_min.clone()),
                profiler: VersionRange::any(),
                verdict: Verdict::Unknown,
                rationale: format!(
                    "runtime below {runtime_min} predates the interrupt-handling change; \
                     the profiler fix is not required"
                ),
            });
        }

        Self { rules }
    }

    pub fn rules(&self) -> &[CompatRule] {
        &self.rules
    }

    /// Evaluate a version pair against the matrix.
    ///
    /// The most specific matching rule wins; ties resolve to the earliest rule.
    pub fn evaluate(&self, runtime: &Version, profiler: &Version) -> Evaluation {
        let mut best: Option<(usize, &CompatRule)> = None;
        for (idx, rule) in self.rules.iter().enumerate() {
            if !rule.matches(runtime, profiler) {
                continue;
            }
            match best {
                Some((_, current)) if rule.specificity() <= current.specificity() => {}
                _ => best = Some((idx, rule)),
            }
        }

        match best {
            Some((idx, rule)) => Evaluation {
                verdict: rule.verdict,
                rationale: format!(
                    "{} (runtime {}, profiler {})",
                    rule.rationale, runtime, profiler
                ),
                rule: Some(idx),
            },
            None => Evaluation {
                verdict: Verdict::Unknown,
                rationale: format!(
                    "no compatibility rule covers runtime {} with profiler {}",
                    runtime, profiler
                ),
                rule: None,
            },
        }
    }
}

impl Default for CompatibilityMatrix {
    fn default() -> Self {
        Self::interrupt_boundary(&InterruptBoundary::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).expect("valid version")
    }

    #[test]
    fn test_range_contains_inclusive_lower_exclusive_upper() {
        let range = VersionRange::between(v("3.4"), v("3.5"));
        assert!(range.contains(&v("3.4.0")));
        assert!(range.contains(&v("3.4.99")));
        assert!(!range.contains(&v("3.5")));
        assert!(!range.contains(&v("3.3.9")));
    }

    #[test]
    fn test_range_overlap() {
        let a = VersionRange::between(v("1"), v("2"));
        let b = VersionRange::between(v("2"), v("3"));
        let c = VersionRange::at_least(v("1.5"));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }

    #[test]
    fn test_default_matrix_verdicts() {
        let matrix = CompatibilityMatrix::default();

        let supported = matrix.evaluate(&v("3.4.6"), &v("0.37.1"));
        assert_eq!(supported.verdict, Verdict::Supported);
        assert!(supported.rationale.contains("interrupt"));

        let unknown = matrix.evaluate(&v("3.3.0"), &v("0.20.0"));
        assert_eq!(unknown.verdict, Verdict::Unknown);
        assert!(unknown.matched());

        let unsupported = matrix.evaluate(&v("3.4.0"), &v("0.10.0"));
        assert_eq!(unsupported.verdict, Verdict::Unsupported);
    }

    #[test]
    fn test_exact_thresholds_are_inclusive() {
        let matrix = CompatibilityMatrix::default();
        assert_eq!(
            matrix.evaluate(&v("3.4"), &v("0.37.1")).verdict,
            Verdict::Supported
        );
        assert_eq!(
            matrix.evaluate(&v("3.4.0"), &v("0.37.0")).verdict,
            Verdict::Unsupported
        );
        assert_eq!(
            matrix.evaluate(&v("4.0"), &v("1.0")).verdict,
            Verdict::Supported
        );
    }

    #[test]
    fn test_below_threshold_never_unsupported() {
        let matrix = CompatibilityMatrix::default();
        for profiler in ["0.1", "0.20.0", "0.37.1", "2.0"] {
            assert_eq!(
                matrix.evaluate(&v("3.3.9"), &v(profiler)).verdict,
                Verdict::Unknown
            );
        }
    }

    #[test]
    fn test_custom_boundary() {
        let boundary = InterruptBoundary {
            runtime_threshold: v("3.5"),
            profiler_threshold: v("0.40"),
        };
        let matrix = CompatibilityMatrix::interrupt_boundary(&boundary);
        assert_eq!(
            matrix.evaluate(&v("3.4.6"), &v("0.37.1")).verdict,
            Verdict::Unknown
        );
        assert_eq!(
            matrix.evaluate(&v("3.5.1"), &v("0.37.1")).verdict,
            Verdict::Unsupported
        );
    }

    #[test]
    fn test_zero_thresholds_omit_empty_rules() {
        let boundary = InterruptBoundary {
            runtime_threshold: v("0"),
            profiler_threshold: v("0"),
        };
        let matrix = CompatibilityMatrix::interrupt_boundary(&boundary);
        assert_eq!(matrix.rules().len(), 1);
        assert!(CompatibilityMatrix::new(matrix.rules().to_vec()).is_ok());
    }

    #[test]
    fn test_no_matching_rule_is_unknown() {
        let matrix = CompatibilityMatrix::new(vec![CompatRule {
            runtime: VersionRange::at_least(v("3.4")),
            profiler: VersionRange::at_least(v("0.37.1")),
            verdict: Verdict::Supported,
            rationale: "fixed".to_string(),
        }])
        .unwrap();
        let eval = matrix.evaluate(&v("2.7"), &v("0.37.1"));
        assert_eq!(eval.verdict, Verdict::Unknown);
        assert!(!eval.matched());
    }

    #[test]
    fn test_most_specific_rule_wins() {
        let matrix = CompatibilityMatrix::new(vec![
            CompatRule {
                runtime: VersionRange::at_least(v("3.4")),
                profiler: VersionRange::at_least(v("0.37.1")),
                verdict: Verdict::Supported,
                rationale: "general".to_string(),
            },
            CompatRule {
                runtime: VersionRange::between(v("3.4.2"), v("3.4.3")),
                profiler: VersionRange::any(),
                verdict: Verdict::Unsupported,
                rationale: "patch-level regression".to_string(),
            },
        ])
        .unwrap();

        assert_eq!(
            matrix.evaluate(&v("3.4.2"), &v("0.40")).verdict,
            Verdict::Unsupported
        );
        assert_eq!(
            matrix.evaluate(&v("3.4.6"), &v("0.40")).verdict,
            Verdict::Supported
        );
    }

    #[test]
    fn test_ambiguous_rules_rejected() {
        let err = CompatibilityMatrix::new(vec![
            CompatRule {
                runtime: VersionRange::at_least(v("3.4")),
                profiler: VersionRange::any(),
                verdict: Verdict::Supported,
                rationale: "a".to_string(),
            },
            CompatRule {
                runtime: VersionRange::at_least(v("3.4")),
                profiler: VersionRange::any(),
                verdict: Verdict::Unsupported,
                rationale: "b".to_string(),
            },
        ])
        .unwrap_err();
        assert_eq!(err, MatrixError::AmbiguousRules { first: 0, second: 1 });
    }

    #[test]
    fn test_empty_range_rejected() {
        let err = CompatibilityMatrix::new(vec![CompatRule {
            runtime: VersionRange::between(v("3.4"), v("3.4.0")),
            profiler: VersionRange::any(),
            verdict: Verdict::Supported,
            rationale: "empty".to_string(),
        }])
        .unwrap_err();
        assert!(matches!(err, MatrixError::EmptyRange { index: 0, .. }));
    }
}
