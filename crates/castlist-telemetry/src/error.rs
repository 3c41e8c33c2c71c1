//! Failures surfaced while configuring log output.

use thiserror::Error;

/// Shorthand for telemetry results.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Reasons logging could not be configured.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber was already registered, or registration failed.
    #[error("failed to install tracing subscriber")]
    SubscriberInstall {
        /// Registration failure reported by `tracing-subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
    /// The requested format name is neither `pretty` nor `json`.
    #[error("unknown log format")]
    UnknownFormat {
        /// Name as supplied by the caller.
        value: String,
    },
}
