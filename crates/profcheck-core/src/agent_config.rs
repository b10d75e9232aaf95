//! Agent configuration built from named options.
//!
//! [`AgentConfigBuilder`] validates a closed set of recognized options into an
//! [`AgentConfig`] value. Building is pure: nothing is started, no network
//! connection is opened and no thread is spawned. Unrecognized options are
//! kept out of the config and reported as warnings so newer option names do
//! not break older harness builds.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::error::ConfigValidationError;

pub const OPT_APPLICATION_NAME: &str = "application_name";
pub const OPT_SERVER_ADDRESS: &str = "server_address";
pub const OPT_SAMPLE_RATE: &str = "sample_rate";
pub const OPT_DETECT_SUBPROCESSES: &str = "detect_subprocesses";
pub const OPT_ONCPU: &str = "oncpu";
pub const OPT_LOG_LEVEL: &str = "log_level";

/// Every option name the builder understands.
pub const RECOGNIZED_OPTIONS: [&str; 6] = [
    OPT_APPLICATION_NAME,
    OPT_SERVER_ADDRESS,
    OPT_SAMPLE_RATE,
    OPT_DETECT_SUBPROCESSES,
    OPT_ONCPU,
    OPT_LOG_LEVEL,
];

/// Samples per second when `sample_rate` is omitted.
pub const DEFAULT_SAMPLE_RATE: u32 = 100;

/// Agent log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Map a numeric logger severity (0 = debug .. 3 = error).
    fn from_severity(severity: i64) -> Option<Self> {
        match severity {
            0 => Some(LogLevel::Debug),
            1 => Some(LogLevel::Info),
            2 => Some(LogLevel::Warn),
            3 => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Validated agent configuration. A plain value until an external agent
/// component chooses to activate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub application_name: String,
    pub server_address: String,
    /// Samples per second.
    pub sample_rate: u32,
    pub detect_subprocesses: bool,
    /// `true` samples on-CPU time only, `false` samples wall-clock time.
    pub oncpu: bool,
    pub log_level: LogLevel,
}

impl AgentConfig {
    /// Option name/value pairs in canonical order, for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (OPT_APPLICATION_NAME, self.application_name.clone()),
            (OPT_SERVER_ADDRESS, self.server_address.clone()),
            (OPT_SAMPLE_RATE, self.sample_rate.to_string()),
            (OPT_DETECT_SUBPROCESSES, self.detect_subprocesses.to_string()),
            (OPT_ONCPU, self.oncpu.to_string()),
            (OPT_LOG_LEVEL, self.log_level.to_string()),
        ]
    }

    pub fn sampling_mode(&self) -> &'static str {
        if self.oncpu {
            "on-cpu"
        } else {
            "wall-clock"
        }
    }
}

/// Non-fatal diagnostic produced while building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub option: String,
    pub message: String,
}

/// A successfully built config plus any warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltConfig {
    pub config: AgentConfig,
    pub warnings: Vec<ConfigWarning>,
}

/// Validating builder over named options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentConfigBuilder {
    options: BTreeMap<String, Value>,
}

impl AgentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-filled with a local dry-run configuration.
    pub fn dry_run_defaults() -> Self {
        Self::new()
            .option(OPT_APPLICATION_NAME, "ruby.smoke.test")
            .option(OPT_SERVER_ADDRESS, "http://localhost:4040")
            .option(OPT_SAMPLE_RATE, DEFAULT_SAMPLE_RATE)
            .option(OPT_DETECT_SUBPROCESSES, false)
            .option(OPT_ONCPU, true)
            .option(OPT_LOG_LEVEL, "debug")
    }

    /// Set (or replace) a named option.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    pub fn options(&self) -> &BTreeMap<String, Value> {
        &self.options
    }

    /// Validate the collected options.
    pub fn build(&self) -> Result<BuiltConfig, ConfigValidationError> {
        build(&self.options)
    }
}

/// One warning per option outside [`RECOGNIZED_OPTIONS`], in key order.
///
/// Independent of validation, so callers can report ignored options even
/// when [`build`] rejects the set.
pub fn unrecognized_options(options: &BTreeMap<String, Value>) -> Vec<ConfigWarning> {
    options
        .keys()
        .filter(|name| !RECOGNIZED_OPTIONS.contains(&name.as_str()))
        .map(|name| ConfigWarning {
            option: name.clone(),
            message: format!("unrecognized option '{name}' ignored"),
        })
        .collect()
}

/// Validate a set of named options into an [`AgentConfig`].
pub fn build(options: &BTreeMap<String, Value>) -> Result<BuiltConfig, ConfigValidationError> {
    let warnings = unrecognized_options(options);
    for warning in &warnings {
        tracing::warn!(option = %warning.option, "ignoring unrecognized agent option");
    }

    let application_name = required_str(options, OPT_APPLICATION_NAME)?;
    validate_application_name(&application_name)?;

    let server_address = required_str(options, OPT_SERVER_ADDRESS)?;
    validate_server_address(&server_address)?;

    let sample_rate = match options.get(OPT_SAMPLE_RATE) {
        Some(value) => parse_sample_rate(value)?,
        None => DEFAULT_SAMPLE_RATE,
    };

    let detect_subprocesses = optional_bool(options, OPT_DETECT_SUBPROCESSES)?.unwrap_or(false);
    let oncpu = optional_bool(options, OPT_ONCPU)?.unwrap_or(true);

    let log_level = match options.get(OPT_LOG_LEVEL) {
        Some(value) => parse_log_level(value)?,
        None => LogLevel::Debug,
    };

    Ok(BuiltConfig {
        config: AgentConfig {
            application_name,
            server_address,
            sample_rate,
            detect_subprocesses,
            oncpu,
            log_level,
        },
        warnings,
    })
}

fn required_str(
    options: &BTreeMap<String, Value>,
    name: &str,
) -> Result<String, ConfigValidationError> {
    match options.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ConfigValidationError::InvalidType {
            option: name.to_string(),
            expected: "a string",
        }),
        None => Err(ConfigValidationError::MissingOption(name.to_string())),
    }
}

fn optional_bool(
    options: &BTreeMap<String, Value>,
    name: &str,
) -> Result<Option<bool>, ConfigValidationError> {
    match options.get(name) {
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ConfigValidationError::InvalidType {
            option: name.to_string(),
            expected: "a boolean",
        }),
        None => Ok(None),
    }
}

fn validate_application_name(name: &str) -> Result<(), ConfigValidationError> {
    if name.trim().is_empty() {
        return Err(ConfigValidationError::InvalidValue {
            option: OPT_APPLICATION_NAME.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if name.chars().any(char::is_whitespace) {
        return Err(ConfigValidationError::InvalidValue {
            option: OPT_APPLICATION_NAME.to_string(),
            reason: format!("'{name}' must not contain whitespace"),
        });
    }
    Ok(())
}

/// Shape check only; the address is never dereferenced.
fn validate_server_address(address: &str) -> Result<(), ConfigValidationError> {
    let invalid = |reason: String| ConfigValidationError::InvalidValue {
        option: OPT_SERVER_ADDRESS.to_string(),
        reason,
    };

    if address.chars().any(char::is_whitespace) {
        return Err(invalid(format!("'{address}' must not contain whitespace")));
    }
    let rest = address
        .strip_prefix("http://")
        .or_else(|| address.strip_prefix("https://"))
        .ok_or_else(|| invalid(format!("'{address}' must start with http:// or https://")))?;

    let authority = rest.split('/').next().unwrap_or_default();
    // Bracketed IPv6 literal: the port separator follows the closing bracket.
    let (host, port) = match authority.strip_prefix('[') {
        Some(bracketed) => {
            let (host, tail) = bracketed
                .split_once(']')
                .ok_or_else(|| invalid(format!("'{address}' has an unclosed IPv6 literal")))?;
            match tail {
                "" => (host, None),
                _ => match tail.strip_prefix(':') {
                    Some(port) => (host, Some(port)),
                    None => return Err(invalid(format!("'{address}' has an invalid port"))),
                },
            }
        }
        None => match authority.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (authority, None),
        },
    };
    if let Some(port) = port {
        if port.parse::<u16>().is_err() {
            return Err(invalid(format!("'{address}' has an invalid port")));
        }
    }
    if host.is_empty() {
        return Err(invalid(format!("'{address}' has no host")));
    }
    Ok(())
}

fn parse_sample_rate(value: &Value) -> Result<u32, ConfigValidationError> {
    let rate = value.as_i64().ok_or_else(|| ConfigValidationError::InvalidType {
        option: OPT_SAMPLE_RATE.to_string(),
        expected: "an integer",
    })?;
    if rate <= 0 {
        return Err(ConfigValidationError::OutOfRange {
            option: OPT_SAMPLE_RATE.to_string(),
            reason: format!("must be a positive number of samples per second, got {rate}"),
        });
    }
    u32::try_from(rate).map_err(|_| ConfigValidationError::OutOfRange {
        option: OPT_SAMPLE_RATE.to_string(),
        reason: format!("{rate} exceeds {}", u32::MAX),
    })
}

fn parse_log_level(value: &Value) -> Result<LogLevel, ConfigValidationError> {
    match value {
        Value::String(s) => s
            .parse::<LogLevel>()
            .map_err(|reason| ConfigValidationError::InvalidValue {
                option: OPT_LOG_LEVEL.to_string(),
                reason,
            }),
        Value::Number(n) => n
            .as_i64()
            .and_then(LogLevel::from_severity)
            .ok_or_else(|| ConfigValidationError::OutOfRange {
                option: OPT_LOG_LEVEL.to_string(),
                reason: format!("numeric severity must be 0..=3, got {n}"),
            }),
        _ => Err(ConfigValidationError::InvalidType {
            option: OPT_LOG_LEVEL.to_string(),
            expected: "a level name or numeric severity",
        }),
    }
}
