use thiserror::Error;

use crate::http_client::HttpError;

/// Validation and contract errors raised before any request is built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,

    #[error(
        "invalid period '{value}', expected one of 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max"
    )]
    InvalidPeriod { value: String },
    #[error(
        "invalid interval '{value}', expected one of 1m, 2m, 5m, 15m, 30m, 90m, 1h, 1d, 5d, 1wk, 1mo, 3mo, all"
    )]
    InvalidInterval { value: String },

    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("date '{value}' does not exist in the local timezone")]
    NonexistentLocalTime { value: String },
}

/// Per-request failure. Never escapes the orchestrator; it is folded into
/// [`crate::FetchResult::Failure`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: HttpError,
    },

    #[error("request to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("response from {url} is not valid JSON: {message}")]
    Decode { url: String, message: String },

    #[error("chart payload from {url} has no result")]
    MissingChartResult { url: String },

    #[error("request slots are closed")]
    Closed,
}
