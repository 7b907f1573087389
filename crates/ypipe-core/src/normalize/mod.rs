//! Normalization of raw vendor payloads.
//!
//! Every parse here is total: a malformed payload degrades to an empty or
//! absent table and a log line, never an error that could abort sibling
//! requests in the same batch.

mod chart;
mod summary;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::fetcher::BoundedFetcher;
use crate::request::RequestSpec;
use crate::{FetchResult, Interval, Summary};

pub use chart::{parse_prices, round_to_hint};
pub use summary::parse_summary_html;

/// Why a payload section could not be normalized.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("missing '{0}'")]
    Missing(&'static str),
    #[error("malformed '{section}': {message}")]
    Malformed {
        section: &'static str,
        message: String,
    },
    #[error("'{field}' has {found} values, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("unknown exchange timezone '{0}'")]
    UnknownTimezone(String),
    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(i64),
}

/// Fetches one chart request and normalizes it.
///
/// Transport failures, undecodable bodies and payloads without
/// `chart.result[0]` become [`FetchResult::Failure`]; anything wrong inside
/// the result only empties the affected tables.
pub async fn fetch_chart(
    fetcher: &BoundedFetcher,
    spec: &RequestSpec,
    requested: Interval,
) -> FetchResult {
    let payload: Value = match fetcher.bounded_fetch_json(spec).await {
        Ok(payload) => payload,
        Err(error) => {
            return FetchResult::Failure {
                reason: error.to_string(),
            }
        }
    };

    if let Some(error) = payload.pointer("/chart/error").filter(|error| !error.is_null()) {
        info!(symbol = spec.tail(), %error, "chart endpoint reported an error");
    }

    let Some(result) = payload.pointer("/chart/result/0") else {
        info!(symbol = spec.tail(), interval = %requested, "chart payload has no result");
        return FetchResult::Failure {
            reason: crate::FetchError::MissingChartResult {
                url: spec.url.clone(),
            }
            .to_string(),
        };
    };

    let frames = parse_prices(result);
    let interval = frames
        .interval
        .unwrap_or_else(|| requested.as_str().to_owned());
    debug!(symbol = spec.tail(), interval = %interval, rows = frames.prices.len(), "OK");

    FetchResult::Success {
        interval,
        prices: frames.prices,
        dividends: frames.dividends,
        splits: frames.splits,
    }
}

/// Fetches the quote page for one symbol and flattens its summary table.
/// Any failure yields an empty mapping.
pub async fn fetch_summary(fetcher: &BoundedFetcher, spec: &RequestSpec) -> Summary {
    match fetcher.bounded_fetch(spec).await {
        Ok(response) => parse_summary_html(&response.body),
        Err(_) => Summary::new(),
    }
}
