//! # Design
//!
//! - Keep error messages constant while carrying context fields for debugging.
//! - Transport failures and rejected requests are separate variants; a failed
//!   connection never masquerades as a response body.
//! - Preserve source errors without re-logging at call sites.

use std::io;
use std::path::PathBuf;

use castlist_api_models::{EntityId, ErrorEnvelope, ValidationError};
use reqwest::Method;
use serde_json::Value;
use thiserror::Error;

/// Result alias for API client operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result alias for state container operations.
pub type AppResult<T> = Result<T, AppError>;

/// Body captured from a response with a failure status.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// The API's `{ success, error, message }` document.
    Envelope(ErrorEnvelope),
    /// Some other JSON document.
    Json(Value),
    /// Non-JSON text.
    Text(String),
    /// No body at all.
    Empty,
}

impl ErrorBody {
    /// Classify raw response bytes, preferring the structured envelope.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        if text.trim().is_empty() {
            return Self::Empty;
        }
        if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(bytes) {
            return Self::Envelope(envelope);
        }
        serde_json::from_slice::<Value>(bytes)
            .map_or_else(|_| Self::Text(text.trim().to_string()), Self::Json)
    }

    /// Best-effort human-readable message.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Envelope(envelope) => Some(envelope.message.clone()),
            Self::Json(value) => value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| Some(value.to_string())),
            Self::Text(text) => Some(text.clone()),
            Self::Empty => None,
        }
    }
}

/// Errors raised by the HTTP API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The base URL and path did not form a valid URL.
    #[error("invalid api url")]
    InvalidUrl {
        /// Offending URL text.
        url: String,
        /// Underlying parse error.
        source: url::ParseError,
    },
    /// The request never produced a response (DNS, refused connection, timeout).
    #[error("http transport failed")]
    Transport {
        /// HTTP method of the request.
        method: Method,
        /// API path of the request.
        path: String,
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },
    /// The API answered with a failure status.
    #[error("api rejected the request")]
    Rejected {
        /// HTTP method of the request.
        method: Method,
        /// API path of the request.
        path: String,
        /// HTTP status code returned by the server.
        status: u16,
        /// Parsed (or raw) response body.
        body: ErrorBody,
    },
    /// A success response did not match the expected envelope.
    #[error("failed to decode api response")]
    Decode {
        /// API path of the request.
        path: String,
        /// Underlying serde error.
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Status code for rejected requests.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// One-line description including the context fields.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidUrl { url, source } => format!("invalid api url '{url}': {source}"),
            Self::Transport {
                method,
                path,
                source,
            } => format!("request {method} {path} failed: {source}"),
            Self::Rejected {
                method,
                path,
                status,
                body,
            } => body.message().map_or_else(
                || format!("{method} {path} rejected with status {status}"),
                |message| format!("{method} {path} rejected with status {status}: {message}"),
            ),
            Self::Decode { path, source } => {
                format!("response from {path} could not be decoded: {source}")
            }
        }
    }
}

/// Errors raised by session storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("session storage io failed")]
    Io {
        /// Backing file path.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The backing file did not contain a valid session document.
    #[error("session storage is corrupt")]
    Corrupt {
        /// Backing file path.
        path: PathBuf,
        /// Underlying serde error.
        source: serde_json::Error,
    },
}

impl StorageError {
    /// One-line description including the backing path.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Io { path, source } => format!("{}: {source}", path.display()),
            Self::Corrupt { path, source } => {
                format!("{} is not a valid session file: {source}", path.display())
            }
        }
    }
}

/// Errors raised by the application state container.
#[derive(Debug, Error)]
pub enum AppError {
    /// An API call failed.
    #[error("api operation failed")]
    Api {
        /// Operation identifier.
        operation: &'static str,
        /// Source API error.
        source: ApiError,
    },
    /// Session storage failed.
    #[error("session storage operation failed")]
    Storage {
        /// Operation identifier.
        operation: &'static str,
        /// Source storage error.
        source: StorageError,
    },
    /// A draft was rejected before submission.
    #[error("draft failed validation")]
    Validation {
        /// Source validation error.
        source: ValidationError,
    },
    /// The operation needs a token and none is held.
    #[error("not authenticated")]
    NotAuthenticated,
    /// The referenced entity is not in the current lists.
    #[error("entity not found")]
    NotFound {
        /// Entity kind (`movie` or `actor`).
        kind: &'static str,
        /// Requested identifier.
        id: EntityId,
    },
}

impl AppError {
    pub(crate) fn api(operation: &'static str) -> impl FnOnce(ApiError) -> Self {
        move |source| Self::Api { operation, source }
    }

    pub(crate) fn storage(operation: &'static str) -> impl FnOnce(StorageError) -> Self {
        move |source| Self::Storage { operation, source }
    }

    /// One-line description including the context fields.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Api { operation, source } => format!("{operation}: {}", source.detail()),
            Self::Storage { operation, source } => format!("{operation}: {}", source.detail()),
            Self::Validation { source } => source.to_string(),
            Self::NotAuthenticated => "not logged in".to_string(),
            Self::NotFound { kind, id } => format!("{kind} {id} not found"),
        }
    }
}
