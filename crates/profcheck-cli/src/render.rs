//! Report presenters.

use profcheck_core::Status;
use profcheck_harness::{BuiltinCheck, Report};
use std::fmt::Write as _;

const BANNER: &str = "profcheck preflight\n===================\n";

/// Plain-text rendering: banner, one block per check, summary, next steps.
pub fn render_text(report: &Report) -> String {
    let mut out = String::with_capacity(2048);
    out.push_str(BANNER);

    let env = report.environment();
    let _ = writeln!(
        out,
        "Runtime:     {} ({})",
        env.runtime_version, env.runtime_platform
    );
    let _ = writeln!(out, "Profiler:    rbspy {}", env.profiler_version);
    match &env.integration_version {
        Some(version) => {
            let _ = writeln!(out, "Integration: {} {version}", env.integration_name);
        }
        None => {
            let _ = writeln!(out, "Integration: {}", env.integration_name);
        }
    }
    let _ = writeln!(out, "Run:         {}", report.run_id());

    for outcome in report.outcomes() {
        let title = BuiltinCheck::from_name(&outcome.name)
            .map(|c| c.title())
            .unwrap_or(outcome.name.as_str());
        let _ = writeln!(out, "\n[{}] {title}", outcome.status);
        let _ = writeln!(out, "       {}", outcome.detail);
        for line in &outcome.diagnostics {
            let _ = writeln!(out, "       {line}");
        }
        if let Some(trace) = &outcome.trace {
            for line in trace.lines() {
                let _ = writeln!(out, "       | {line}");
            }
        }
    }

    let summary = report.summary();
    let _ = writeln!(
        out,
        "\nOverall: {} ({} pass, {} warn, {} fail, {} skip) in {}ms",
        report.overall(),
        summary.pass,
        summary.warn,
        summary.fail,
        summary.skip,
        report.duration_ms()
    );

    if report.overall() != Status::Fail {
        out.push_str("\nNext steps for a full profiling test:\n");
        for (i, step) in report.next_steps().iter().enumerate() {
            let _ = writeln!(out, "  {}. {step}", i + 1);
        }
    }
    out
}

/// Pretty JSON of the full report.
pub fn render_json(report: &Report) -> serde_json::Result<String> {
    report.to_json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use profcheck_harness::{aggregate, CheckOutcome};

    #[test]
    fn test_render_text_lists_checks_in_order() {
        let report = aggregate(vec![
            CheckOutcome::pass("integration_load", "pyroscope integration loaded"),
            CheckOutcome::warn("artifact_probe", "native artifact not found at x")
                .with_diagnostic("expected when running from a development checkout"),
        ]);
        let text = render_text(&report);

        assert!(text.starts_with("profcheck preflight"));
        let load = text.find("[PASS] Loading profiling integration").unwrap();
        let probe = text.find("[WARN] Checking native profiler artifact").unwrap();
        assert!(load < probe);
        assert!(text.contains("Overall: WARN (1 pass, 1 warn, 0 fail, 0 skip)"));
        assert!(text.contains("Next steps"));
    }

    #[test]
    fn test_render_text_failed_run_shows_trace_without_next_steps() {
        let report = aggregate(vec![CheckOutcome::fail("agent_config", "rejected")
            .with_trace("check #2 (agent_config) returned an error\ncaused by: bad")]);
        let text = render_text(&report);

        assert!(text.contains("[FAIL] Building agent configuration (dry run)"));
        assert!(text.contains("| caused by: bad"));
        assert!(!text.contains("Next steps"));
    }

    #[test]
    fn test_render_text_custom_check_uses_name() {
        let report = aggregate(vec![CheckOutcome::skip("custom_probe", "n/a")]);
        assert!(render_text(&report).contains("[SKIP] custom_probe"));
    }

    #[test]
    fn test_render_json_is_parseable() {
        let report = aggregate(vec![CheckOutcome::pass("workload", "ok")]);
        let value: serde_json::Value =
            serde_json::from_str(&render_json(&report).unwrap()).unwrap();
        assert_eq!(value["overall"], "pass");
        assert_eq!(value["outcomes"][0]["name"], "workload");
    }
}
