//! Process-wide logging setup.
//!
//! Library code logs through the `log` macros and opens `tracing` spans
//! around network calls. [`init`] installs a tracing subscriber and bridges
//! `log` records into it, so both end up in the same output.

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

/// Filter used when neither an explicit filter nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines on stderr.
    #[default]
    Human,
    /// One JSON object per line on stderr.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(LogFormat::Human),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("Unknown log format '{}'", other)),
        }
    }
}

#[derive(Error, Debug)]
pub enum LogInitError {
    #[error("Invalid log filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },

    #[error("A global subscriber is already installed")]
    AlreadyInstalled,

    #[error("Failed to bridge log records: {0}")]
    Bridge(String),
}

/// Builds the filter from `explicit`, else `RUST_LOG`, else [`DEFAULT_FILTER`].
pub fn build_filter(explicit: Option<&str>) -> Result<EnvFilter, LogInitError> {
    match explicit {
        Some(filter) => EnvFilter::try_new(filter).map_err(|e| LogInitError::Filter {
            filter: filter.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Installs the global subscriber and the `log` bridge. Call once, early in
/// `main`.
pub fn init(format: LogFormat, filter: Option<&str>) -> Result<(), LogInitError> {
    let env_filter = build_filter(filter)?;

    let output = match format {
        LogFormat::Human => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .with_target(true)
            .boxed(),
    };

    let subscriber = Registry::default().with(env_filter).with(output);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|_| LogInitError::AlreadyInstalled)?;

    tracing_log::LogTracer::init().map_err(|e| LogInitError::Bridge(e.to_string()))?;

    log::debug!("Logging initialized ({:?})", format);
    Ok(())
}
