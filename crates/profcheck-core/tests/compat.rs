use profcheck_core::{
    CompatRule, CompatibilityMatrix, InterruptBoundary, MatrixError, Verdict, Version,
    VersionRange,
};

fn v(s: &str) -> Version {
    Version::parse(s).expect("valid version")
}

// ── Interrupt boundary ──────────────────────────────────────────────────

#[test]
fn runtime_346_with_profiler_0371_is_supported() {
    let eval = CompatibilityMatrix::default().evaluate(&v("3.4.6"), &v("0.37.1"));
    assert_eq!(eval.verdict, Verdict::Supported);
    assert!(eval.rationale.contains("interrupt-handling"));
}

#[test]
fn runtime_330_is_unknown_not_unsupported() {
    let eval = CompatibilityMatrix::default().evaluate(&v("3.3.0"), &v("0.20.0"));
    assert_eq!(eval.verdict, Verdict::Unknown);
    assert!(eval.rationale.contains("not required"));
}

#[test]
fn runtime_at_boundary_with_old_profiler_is_unsupported() {
    let eval = CompatibilityMatrix::default().evaluate(&v("3.4.0"), &v("0.10.0"));
    assert_eq!(eval.verdict, Verdict::Unsupported);
}

#[test]
fn default_boundary_matches_named_constants() {
    let boundary = InterruptBoundary::default();
    assert_eq!(boundary.runtime_threshold, v("3.4"));
    assert_eq!(boundary.profiler_threshold, v("0.37.1"));
}

#[test]
fn default_matrix_passes_validation() {
    let rules = CompatibilityMatrix::default().rules().to_vec();
    assert_eq!(rules.len(), 3);
    assert!(CompatibilityMatrix::new(rules).is_ok());
}

// ── Custom matrices ─────────────────────────────────────────────────────

#[test]
fn patch_level_exception_overrides_general_rule() {
    let mut rules = CompatibilityMatrix::default().rules().to_vec();
    rules.push(CompatRule {
        runtime: VersionRange::between(v("3.4.0"), v("3.4.1")),
        profiler: VersionRange::at_least(v("0.37.1")),
        verdict: Verdict::Unknown,
        rationale: "3.4.0 was never validated".to_string(),
    });
    let matrix = CompatibilityMatrix::new(rules).expect("valid matrix");

    let eval = matrix.evaluate(&v("3.4.0"), &v("0.37.1"));
    assert_eq!(eval.verdict, Verdict::Unknown);
    assert_eq!(eval.rule, Some(3));

    let eval = matrix.evaluate(&v("3.4.1"), &v("0.37.1"));
    assert_eq!(eval.verdict, Verdict::Supported);
}

#[test]
fn conflicting_rules_are_rejected() {
    let rule = |verdict| CompatRule {
        runtime: VersionRange::at_least(v("3.4")),
        profiler: VersionRange::between(v("0.30"), v("0.40")),
        verdict,
        rationale: String::new(),
    };
    let err = CompatibilityMatrix::new(vec![rule(Verdict::Supported), rule(Verdict::Unsupported)])
        .unwrap_err();
    assert!(matches!(err, MatrixError::AmbiguousRules { .. }));
}

#[test]
fn identical_verdict_overlap_is_allowed() {
    let rule = CompatRule {
        runtime: VersionRange::at_least(v("3.4")),
        profiler: VersionRange::any(),
        verdict: Verdict::Supported,
        rationale: String::new(),
    };
    assert!(CompatibilityMatrix::new(vec![rule.clone(), rule]).is_ok());
}
