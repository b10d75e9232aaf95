//! profcheck - native profiler compatibility preflight
//!
//! Verifies that a runtime build, the profiling integration and the native
//! sampling profiler artifact fit together, without starting the agent.
//!
//! Exit codes: `0` for PASS or WARN, `1` for FAIL, `2` for invalid arguments
//! and `3` when the profiling integration cannot be loaded.

mod render;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use profcheck_core::{init_tracing, InterruptBoundary, Status, Version, PROFILER_KNOWN_GOOD};
use profcheck_harness::{
    default_artifact_path, DeclaredIntegration, Harness, HarnessInputs, HarnessSettings,
};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, Level};

/// Overall FAIL.
const EXIT_FAIL: i32 = 1;

/// Invalid command line, including unparsable thresholds.
const EXIT_USAGE: i32 = 2;

/// The integration failed to load; no report was produced.
const EXIT_DEPENDENCY_FAILURE: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "profcheck")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Native profiler compatibility preflight", long_about = None)]
struct Cli {
    /// Runtime version under test (e.g. 3.4.6)
    #[arg(long, env = "PROFCHECK_RUNTIME_VERSION")]
    runtime_version: String,

    /// Runtime platform (default: host <arch>-<os>)
    #[arg(long, env = "PROFCHECK_RUNTIME_PLATFORM")]
    runtime_platform: Option<String>,

    /// Native profiler version
    #[arg(long, default_value_t = default_profiler_version())]
    profiler_version: String,

    /// Profiling integration name
    #[arg(long, default_value = profcheck_harness::integration::DEFAULT_INTEGRATION_NAME)]
    integration_name: String,

    /// Declared integration version
    #[arg(long, env = "PROFCHECK_INTEGRATION_VERSION")]
    integration_version: Option<String>,

    /// Integration install root
    #[arg(long, default_value = ".")]
    integration_root: PathBuf,

    /// Native profiler artifact (default: <root>/lib/rbspy/rbspy.so)
    #[arg(long)]
    artifact: Option<PathBuf>,

    /// Agent option as key=value; may be repeated
    #[arg(long = "option", value_name = "KEY=VALUE", value_parser = parse_agent_option)]
    options: Vec<(String, Value)>,

    /// Runtime version from which the profiler fix is required
    #[arg(long)]
    runtime_threshold: Option<String>,

    /// First profiler version carrying the fix
    #[arg(long)]
    profiler_threshold: Option<String>,

    /// Fibonacci input for the workload
    #[arg(long)]
    fib_input: Option<u32>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json_logs: bool,
}

fn default_profiler_version() -> String {
    Version::from_components(&PROFILER_KNOWN_GOOD).to_string()
}

/// Parse `key=value`; integers and booleans are typed, anything else is a
/// string.
fn parse_agent_option(raw: &str) -> std::result::Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("option key is empty in '{raw}'"));
    }

    let value = value.trim();
    let typed = if let Ok(n) = value.parse::<i64>() {
        Value::from(n)
    } else if value == "true" || value == "false" {
        Value::Bool(value == "true")
    } else {
        Value::from(value)
    };
    Ok((key.to_string(), typed))
}

fn parse_threshold(raw: &str, flag: &str) -> Result<Version> {
    Version::parse(raw).with_context(|| format!("invalid --{flag} '{raw}'"))
}

fn settings(cli: &Cli) -> Result<HarnessSettings> {
    let mut boundary = InterruptBoundary::default();
    if let Some(raw) = &cli.runtime_threshold {
        boundary.runtime_threshold = parse_threshold(raw, "runtime-threshold")?;
    }
    if let Some(raw) = &cli.profiler_threshold {
        boundary.profiler_threshold = parse_threshold(raw, "profiler-threshold")?;
    }

    let mut settings = HarnessSettings {
        boundary,
        ..HarnessSettings::default()
    };
    if let Some(n) = cli.fib_input {
        settings.fibonacci_input = n;
    }
    Ok(settings)
}

fn inputs(cli: &Cli) -> Result<HarnessInputs> {
    let artifact = cli
        .artifact
        .clone()
        .unwrap_or_else(|| default_artifact_path(&cli.integration_root));

    let mut inputs = HarnessInputs::new(&cli.runtime_version, &cli.profiler_version, artifact)
        .with_settings(settings(cli)?);
    if let Some(platform) = &cli.runtime_platform {
        inputs = inputs.with_platform(platform);
    }
    for (key, value) in &cli.options {
        inputs = inputs.with_option(key, value.clone());
    }
    Ok(inputs)
}

fn loader(cli: &Cli) -> DeclaredIntegration {
    let loader = DeclaredIntegration::new(&cli.integration_name, &cli.integration_root);
    match &cli.integration_version {
        Some(version) => loader.with_version(version),
        None => loader,
    }
}

fn exit_code(overall: Status) -> i32 {
    if overall.is_failure() {
        EXIT_FAIL
    } else {
        0
    }
}

/// Help and version requests exit cleanly; every other parse error is usage.
fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        EXIT_USAGE
    } else {
        0
    }
}

/// Run the preflight and print the report; returns the process exit code.
fn run(cli: &Cli, inputs: &HarnessInputs) -> Result<i32> {
    debug!(digest = %inputs.digest(), "Harness inputs resolved");

    let report = match Harness::run(&loader(cli), inputs) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("fatal: {e}");
            return Ok(EXIT_DEPENDENCY_FAILURE);
        }
    };

    match cli.format {
        OutputFormat::Text => print!("{}", render::render_text(&report)),
        OutputFormat::Json => println!(
            "{}",
            render::render_json(&report).context("Failed to serialize report")?
        ),
    }
    Ok(exit_code(report.overall()))
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = usage_exit_code(&e);
            e.print().context("Failed to print usage")?;
            std::process::exit(code);
        }
    };

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json_logs, level);

    let inputs = match inputs(&cli) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(EXIT_USAGE);
        }
    };

    let code = run(&cli, &inputs)?;
    std::process::exit(code);
}
