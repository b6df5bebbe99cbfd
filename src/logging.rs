//! Structured logging setup
//!
//! All diagnostics go through `tracing`. The subscriber writes to stderr so
//! the `resolve`/`extract` commands can keep stdout for their result.
//!
//! Environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `VAULT_CODEGEN_LOG_LEVEL` | `info` | trace/debug/info/warn/error |
//! | `VAULT_CODEGEN_LOG_FORMAT` | `pretty` | `json` or `pretty` |
//! | `VAULT_CODEGEN_LOG_ASYNC` | `false` | buffer output on a writer thread |
//! | `VAULT_CODEGEN_LOG_TARGET_FILTER` | unset | extra comma-separated directives |
//! | `VAULT_CODEGEN_LOG_INCLUDE_LOCATION` | `false` | add file:line to events |
//!
//! `RUST_LOG`, when set, replaces the level.

use anyhow::{Context, Result};
use serde_json::Value;
use std::env;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Placeholder logged instead of a sensitive value.
pub const REDACTED: &str = "<redacted>";

/// Log format: JSON for machines, pretty-print for terminals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Enable async buffered logging
    pub async_logging: bool,
    /// Module filter (comma-separated directives)
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("VAULT_CODEGEN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(
                &env::var("VAULT_CODEGEN_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            ),
            async_logging: env_flag("VAULT_CODEGEN_LOG_ASYNC"),
            target_filter: env::var("VAULT_CODEGEN_LOG_TARGET_FILTER").ok(),
            include_location: env_flag("VAULT_CODEGEN_LOG_INCLUDE_LOCATION"),
        }
    }

    /// Verbose configuration for local debugging and tests
    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            async_logging: false,
            target_filter: None,
            include_location: true,
        }
    }

    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));
        if let Some(target_filter) = &self.target_filter {
            for directive in target_filter.split(',').map(str::trim).filter(|d| !d.is_empty()) {
                match directive.parse() {
                    Ok(directive) => filter = filter.add_directive(directive),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {}", directive),
                }
            }
        }
        filter
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(false)
}

/// Initialize logging from the environment.
///
/// Keep the returned guard alive until exit when async logging is on;
/// dropping it flushes buffered events.
pub fn init_logging() -> Result<Option<WorkerGuard>> {
    init_logging_with_config(&LogConfig::from_env())
}

pub fn init_logging_with_config(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let (writer, guard) = if config.async_logging {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(writer), Some(guard))
    } else {
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stderr), None)
    };

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_span_list(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}

/// Mask `value` for logging when it belongs to a sensitive attribute.
pub fn redact(value: &Value, sensitive: bool) -> Value {
    if sensitive && !value.is_null() {
        Value::String(REDACTED.to_string())
    } else {
        value.clone()
    }
}
