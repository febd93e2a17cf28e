//! Structured logging for apertium-setup
//!
//! Diagnostics go to stderr so that generated text on stdout (`show`,
//! `check`) stays clean. Events use structured fields:
//!
//! - `operation`: the pipeline stage (e.g. "resolve", "emit")
//! - `status`: the outcome ("success", "skipped", "error")
//! - `target`: a target file name being resolved
//! - `kind`: the catalog kind a target maps to
//!
//! # Examples
//!
//! ```rust
//! use tracing::debug;
//!
//! debug!(
//!     operation = "resolve",
//!     status = "success",
//!     target = "eng.automorf.bin",
//!     kind = "automorf.bin",
//!     "target resolved"
//! );
//! ```

use std::{fmt as std_fmt, io};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    fmt::{self, format::Writer},
    prelude::*,
    EnvFilter,
};

/// Formatter that tags every line with the tool name instead of the module path
struct SetupFormatter {
    with_ansi: bool,
}

impl<S, N> FormatEvent<S, N> for SetupFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std_fmt::Result {
        let meta = event.metadata();

        write!(
            writer,
            "{} ",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6fZ")
        )?;

        if self.with_ansi {
            let level_style = match *meta.level() {
                tracing::Level::ERROR => "\x1b[31m",
                tracing::Level::WARN => "\x1b[33m",
                tracing::Level::INFO => "\x1b[32m",
                tracing::Level::DEBUG => "\x1b[34m",
                tracing::Level::TRACE => "\x1b[35m",
            };
            write!(
                writer,
                "{}{:5}(apertium-setup)\x1b[0m: ",
                level_style,
                meta.level()
            )?;
        } else {
            write!(writer, "{:5}(apertium-setup): ", meta.level())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, colored
    Pretty,
    /// Same layout without colors (CI, redirected output)
    Compact,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// Parse from the APERTIUM_SETUP_LOG_FORMAT environment variable
    pub fn from_env() -> Self {
        let requested = std::env::var("APERTIUM_SETUP_LOG_FORMAT").unwrap_or_default();
        Self::parse(&requested, std::env::var("CI").is_ok())
    }

    fn parse(requested: &str, in_ci: bool) -> Self {
        match requested.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            "pretty" => Self::Pretty,
            _ if in_ci => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Initialize the global tracing subscriber
///
/// # Environment Variables
///
/// - `RUST_LOG`: log level filter (default "info")
/// - `APERTIUM_SETUP_LOG_FORMAT`: "pretty", "compact" or "json"
/// - `CI`: if set, defaults to compact format
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match LogFormat::from_env() {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .event_format(SetupFormatter { with_ansi: true })
                        .with_writer(io::stderr),
                )
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .event_format(SetupFormatter { with_ansi: false })
                        .with_writer(io::stderr),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_file(false)
                        .with_line_number(false)
                        .with_ansi(false)
                        .with_writer(io::stderr)
                        .json(),
                )
                .init();
        }
    }
}

/// Operation names for consistent logging
pub mod operations {
    pub const LOAD_METADATA: &str = "load_metadata";
    pub const LOAD_MODES: &str = "load_modes";
    pub const SETUP: &str = "setup";
    pub const RESOLVE: &str = "resolve";
    pub const EMIT: &str = "emit";
}

/// Status values for consistent logging
pub mod status {
    pub const SUCCESS: &str = "success";
    pub const SKIPPED: &str = "skipped";
    pub const ERROR: &str = "error";
}
