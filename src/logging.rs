// ABOUTME: Structured logging setup for the plan forge library and CLI
// ABOUTME: Picks an output format, quiets HTTP client crates, and writes everything to stderr
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging setup
//!
//! Logs go to stderr so that generated documents written to stdout stay
//! machine-readable. Library code only emits `tracing` events; installing a
//! subscriber is left to the binary (or to an embedding service).

use std::env;
use std::io;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::constants::service_names;

/// Crates whose debug output drowns pipeline events
const NOISY_TARGETS: [&str; 4] = ["hyper", "hyper_util", "reqwest", "rustls"];

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event, for log shippers
    Json,
    /// Multi-field human-readable lines
    Pretty,
    /// Single-line terminal output
    Compact,
}

impl LogFormat {
    fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("json") => Self::Json,
            Some("pretty") => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

/// Subscriber settings
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)] // One flag per optional output field
pub struct LoggingConfig {
    /// Level for this crate's events (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Add source file and line to each event
    pub include_location: bool,
    /// Add thread id and name to each event
    pub include_thread: bool,
    /// Emit span open/close events
    pub include_spans: bool,
    /// Reported in the startup event
    pub service_name: String,
    /// Reported in the startup event
    pub service_version: String,
    /// Deployment environment; `production` turns on every optional field
    pub environment: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Compact,
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: service_names::PLAN_FORGE.to_owned(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".to_owned(),
        }
    }
}

impl LoggingConfig {
    /// Read `RUST_LOG`, `LOG_FORMAT`, `ENVIRONMENT`, `LOG_INCLUDE_*`, `SERVICE_NAME`
    /// and `SERVICE_VERSION`, keeping defaults for anything unset
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);
        let verbose_fields = environment == "production";
        let flag = |key: &str| verbose_fields || env::var_os(key).is_some();

        Self {
            level: env::var("RUST_LOG").unwrap_or(defaults.level),
            format: LogFormat::from_name(env::var("LOG_FORMAT").ok().as_deref()),
            include_location: flag("LOG_INCLUDE_LOCATION"),
            include_thread: flag("LOG_INCLUDE_THREAD"),
            include_spans: flag("LOG_INCLUDE_SPANS"),
            service_name: env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
            service_version: env::var("SERVICE_VERSION").unwrap_or(defaults.service_version),
            environment,
        }
    }

    /// Override the level, e.g. from a `--verbose` flag
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// `RUST_LOG` (or the configured level), HTTP crates capped at warn,
    /// and this crate at the configured level
    fn env_filter(&self) -> EnvFilter {
        let base = env::var("RUST_LOG").unwrap_or_else(|_| self.level.clone());

        NOISY_TARGETS
            .iter()
            .map(|target| format!("{target}=warn"))
            .chain(std::iter::once(format!("pierre_plan_forge={}", self.level)))
            .filter_map(|directive| directive.parse().ok())
            .fold(EnvFilter::new(base), EnvFilter::add_directive)
    }

    fn span_events(&self) -> FmtSpan {
        if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn fmt_layer(&self) -> BoxedLayer {
        let layer = fmt::layer()
            .with_writer(io::stderr)
            .with_span_events(self.span_events())
            .with_file(self.include_location)
            .with_line_number(self.include_location)
            .with_thread_ids(self.include_thread)
            .with_thread_names(self.include_thread);

        match self.format {
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Pretty => layer.with_target(true).boxed(),
            LogFormat::Compact => layer.compact().with_target(false).boxed(),
        }
    }

    /// Install the global subscriber and log one startup event
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        tracing_subscriber::registry()
            .with(self.fmt_layer().with_filter(self.env_filter()))
            .try_init()?;

        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            log.location = self.include_location,
            log.thread = self.include_thread,
            log.spans = self.include_spans,
            "Logging initialized"
        );

        Ok(())
    }
}

/// Install the subscriber described by the environment
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}
