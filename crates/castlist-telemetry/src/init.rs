//! Subscriber installation for the `castlist` binary.
//!
//! Everything goes to stderr so that tables and JSON printed on stdout can be
//! piped without log noise. `RUST_LOG` overrides the configured directive.

use std::io;
use std::str::FromStr;

use once_cell::sync::OnceCell;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{Result, TelemetryError};

/// Directive applied when neither the caller nor `RUST_LOG` picks one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

const UNKNOWN_BUILD: &str = "dev";

static RECORDED_BUILD: OnceCell<String> = OnceCell::new();

/// How the binary wants its logs emitted.
#[derive(Debug, Clone)]
pub struct LogSettings<'a> {
    /// `EnvFilter` directive such as `info` or `castlist_core=debug`.
    pub filter: &'a str,
    /// Line format.
    pub format: LogFormat,
    /// Commit or version label stamped on the startup event.
    pub build: &'a str,
}

impl Default for LogSettings<'_> {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_LEVEL,
            format: LogFormat::infer(),
            build: build_sha(),
        }
    }
}

/// Line format for emitted events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Human-oriented text lines.
    Pretty,
}

impl LogFormat {
    /// Text in debug builds, JSON in release builds.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(value: &str) -> Result<Self> {
        let name = value.trim();
        if name.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else if name.eq_ignore_ascii_case("pretty") || name.eq_ignore_ascii_case("text") {
            Ok(Self::Pretty)
        } else {
            Err(TelemetryError::UnknownFormat {
                value: value.to_owned(),
            })
        }
    }
}

/// Register the process-wide subscriber described by `settings`.
///
/// # Errors
///
/// Fails with [`TelemetryError::SubscriberInstall`] when a global subscriber
/// is already in place.
pub fn init_logging(settings: &LogSettings) -> Result<()> {
    // Only the first recorded build label sticks.
    let _ = RECORDED_BUILD.set(settings.build.to_owned());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.filter));
    let text = matches!(settings.format, LogFormat::Pretty).then(|| {
        fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
    });
    let json = matches!(settings.format, LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .try_init()
        .map_err(|source| TelemetryError::SubscriberInstall { source })?;

    tracing::debug!(build = build_sha(), format = ?settings.format, "logging ready");
    Ok(())
}

/// Build label recorded by the first [`init_logging`] call, or `dev`.
#[must_use]
pub fn build_sha() -> &'static str {
    RECORDED_BUILD.get().map_or(UNKNOWN_BUILD, String::as_str)
}
