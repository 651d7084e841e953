// ABOUTME: Logging configuration and structured logging setup for the form coach
// ABOUTME: Chooses output format, quiets HTTP client crates, and tunes per-frame pipeline verbosity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging for the coaching pipeline
//!
//! The stages log once per processed frame at `debug`, which is too chatty
//! for a normal run. `COACH_PIPELINE_LOG` sets the level of the
//! `pierre_form_coach::stages` target independently of `RUST_LOG`.

use std::env;
use std::io;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::constants::service_names;

/// Crates whose debug output drowns the per-frame pipeline logs
const NOISY_TARGETS: [&str; 4] = ["hyper=warn", "hyper::proto=warn", "reqwest=warn", "rustls=warn"];

/// Target of the per-frame stage logs
const PIPELINE_TARGET: &str = "pierre_form_coach::stages";

/// Logging configuration
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct LoggingConfig {
    /// Default level for every target
    pub level: String,
    /// Level for the per-frame stage logs, when different from `level`
    pub pipeline_level: Option<String>,
    /// Output format
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread ids and names
    pub include_thread: bool,
    /// Emit span open/close events
    pub include_spans: bool,
    /// Service name attached to the startup record
    pub service_name: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line on stdout
    Json,
    /// Multi-line human output on stdout
    Pretty,
    /// Single-line output on stderr, leaving stdout to the replay CLI
    Compact,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value, defaulting to pretty output
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            pipeline_level: None,
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: service_names::FORM_COACH.to_owned(),
        }
    }
}

impl LoggingConfig {
    /// Read `RUST_LOG`, `COACH_PIPELINE_LOG`, `LOG_FORMAT`, `LOG_INCLUDE_*`, and `SERVICE_NAME`
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            level: env::var("RUST_LOG").unwrap_or(defaults.level),
            pipeline_level: env::var("COACH_PIPELINE_LOG")
                .ok()
                .filter(|level| !level.trim().is_empty()),
            format: env::var("LOG_FORMAT").map_or(defaults.format, |value| LogFormat::parse(&value)),
            include_location: env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: env::var("LOG_INCLUDE_THREAD").is_ok(),
            include_spans: env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
        }
    }

    /// Settings for the replay CLI: compact stderr output, stage logs only when verbose
    #[must_use]
    pub fn for_replay(verbose: bool) -> Self {
        let mut config = Self::from_env();
        config.level = if verbose { "debug" } else { "info" }.to_owned();
        if !verbose {
            config.pipeline_level = Some("info".to_owned());
        }
        config.format = LogFormat::Compact;
        config
    }

    /// Filter directives in the order they are applied
    #[must_use]
    pub fn directives(&self) -> Vec<String> {
        let mut directives = vec![self.level.clone()];
        directives.extend(NOISY_TARGETS.iter().map(|&target| target.to_owned()));
        if let Some(pipeline) = &self.pipeline_level {
            directives.push(format!("{PIPELINE_TARGET}={pipeline}"));
        }
        directives
    }

    fn env_filter(&self) -> EnvFilter {
        let mut directives = self.directives().into_iter();
        let base = directives.next().unwrap_or_else(|| "info".to_owned());
        directives.fold(EnvFilter::new(base), |filter, directive| {
            match directive.parse() {
                Ok(parsed) => filter.add_directive(parsed),
                Err(_) => filter,
            }
        })
    }

    fn span_events(&self) -> FmtSpan {
        if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber has already been installed
    pub fn init(&self) -> Result<()> {
        let json = (self.format == LogFormat::Json).then(|| {
            fmt::layer()
                .json()
                .with_file(self.include_location)
                .with_line_number(self.include_location)
                .with_thread_ids(self.include_thread)
                .with_thread_names(self.include_thread)
                .with_span_events(self.span_events())
                .with_writer(io::stdout)
        });
        let pretty = (self.format == LogFormat::Pretty).then(|| {
            fmt::layer()
                .with_file(self.include_location)
                .with_line_number(self.include_location)
                .with_thread_ids(self.include_thread)
                .with_thread_names(self.include_thread)
                .with_span_events(self.span_events())
                .with_writer(io::stdout)
        });
        let compact = (self.format == LogFormat::Compact).then(|| {
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(io::stderr)
        });

        tracing_subscriber::registry()
            .with(self.env_filter())
            .with(json)
            .with(pretty)
            .with(compact)
            .try_init()?;

        info!(
            service.name = %self.service_name,
            service.version = env!("CARGO_PKG_VERSION"),
            log.level = %self.level,
            log.pipeline_level = self.pipeline_level.as_deref().unwrap_or("inherit"),
            log.format = ?self.format,
            "Form coach logging initialized"
        );
        Ok(())
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}
