//! profcheck core library
//!
//! Pure building blocks for the profiler preflight harness:
//! - `version`: dot-separated version parsing and ordering
//! - `compat`: runtime/profiler compatibility matrix
//! - `agent_config`: validated agent configuration values
//! - `telemetry` / `obs`: tracing setup and structured lifecycle events

pub mod agent_config;
pub mod compat;
pub mod domain;
pub mod obs;
pub mod telemetry;
pub mod version;

pub use agent_config::{
    AgentConfig, AgentConfigBuilder, BuiltConfig, ConfigWarning, LogLevel, RECOGNIZED_OPTIONS,
};
pub use compat::{
    CompatRule, CompatibilityMatrix, Evaluation, InterruptBoundary, Verdict, VersionRange,
    PROFILER_KNOWN_GOOD, RUNTIME_INTERRUPT_THRESHOLD,
};
pub use domain::{ConfigValidationError, MatrixError, Status, VersionParseError};
pub use obs::{
    emit_check_recorded, emit_check_started, emit_dependency_load_failed, emit_harness_finished,
    emit_harness_started, HarnessSpan,
};
pub use telemetry::init_tracing;
pub use version::{compare, Version};

/// profcheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
