//! Exit-code classification and HTTP client wiring for the binary.

use std::time::Duration;

use anyhow::anyhow;
use castlist_core::{ApiError, AppError};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use thiserror::Error;
use url::Url;

/// Correlation header attached to every outgoing request.
const REQUEST_ID: &str = "x-request-id";

/// Outcome of a failed command. The variant decides the process exit code.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// The user asked for something that cannot be done as stated.
    #[error("{0}")]
    Validation(String),
    /// The command was fine but the environment let it down.
    #[error("{0:#}")]
    Failure(anyhow::Error),
}

pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    /// `2` for bad input, `3` for operational failures.
    pub(crate) const fn exit_code(&self) -> i32 {
        if matches!(self, Self::Validation(_)) { 2 } else { 3 }
    }

    /// Text printed after `error:` on stderr.
    pub(crate) fn display_message(&self) -> String {
        self.to_string()
    }
}

impl From<AppError> for CliError {
    fn from(error: AppError) -> Self {
        classify_app_error(&error)
    }
}

/// Shared HTTP plumbing for one invocation.
#[derive(Clone)]
pub(crate) struct HttpContext {
    pub(crate) client: Client,
}

impl HttpContext {
    /// Build a client with a request timeout that stamps `trace_id` on each call.
    pub(crate) fn new(timeout_secs: u64, trace_id: &str) -> CliResult<Self> {
        let trace = HeaderValue::from_str(trace_id)
            .map_err(|_| CliError::failure(anyhow!("request id is not a valid header value")))?;
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID, trace);

        Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map(|client| Self { client })
            .map_err(|err| CliError::failure(anyhow!(err).context("HTTP client setup failed")))
    }
}

/// Parse a URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    Url::parse(input).map_err(|err| format!("'{input}' is not a usable URL: {err}"))
}

/// Map a container error onto the CLI's two-tier error model.
///
/// Input problems (bad drafts, unknown ids, rejected payloads) are validation
/// errors; everything else is an operational failure.
pub(crate) fn classify_app_error(error: &AppError) -> CliError {
    match error {
        AppError::Validation { .. } | AppError::NotFound { .. } => {
            CliError::validation(error.detail())
        }
        AppError::NotAuthenticated => {
            CliError::validation("not logged in (run `castlist login`)")
        }
        AppError::Api {
            source: api @ ApiError::Rejected { status, .. },
            ..
        } if matches!(status, 400 | 409 | 422) => CliError::validation(api.detail()),
        AppError::Api { .. } | AppError::Storage { .. } => {
            CliError::failure(anyhow!(error.detail()))
        }
    }
}
