use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::Symbol;

/// Name of the price table's row key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// ISO-8601 timestamps in the exchange timezone (intraday series).
    Datetime,
    /// `YYYY-MM-DD` calendar dates (daily and coarser series).
    Date,
}

/// One normalized OHLCV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub index: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjclose: f64,
    pub volume: u64,
    pub symbol: String,
    pub currency: String,
    pub exchange: String,
}

/// Price rows keyed by strictly increasing index values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    pub index: IndexKind,
    pub rows: Vec<PriceRecord>,
}

impl PriceTable {
    pub fn new(index: IndexKind, rows: Vec<PriceRecord>) -> Self {
        Self { index, rows }
    }

    /// Table returned when a payload carries no usable series.
    pub fn empty() -> Self {
        Self::new(IndexKind::Date, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, pick: impl Fn(&PriceRecord) -> f64) -> Vec<f64> {
        self.rows.iter().map(pick).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendRecord {
    pub date: String,
    pub dividends: f64,
    pub symbol: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitRecord {
    pub date: String,
    pub splits: f64,
    pub symbol: String,
}

/// Dividend rows sorted by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendTable {
    pub rows: Vec<DividendRecord>,
}

/// Split rows sorted by date; `splits` is numerator / denominator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitTable {
    pub rows: Vec<SplitRecord>,
}

/// Normalized chart payload. Dividend and split tables are `None` when the
/// payload has no such events, or when their records are malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFrames {
    pub interval: Option<String>,
    pub prices: PriceTable,
    pub dividends: Option<DividendTable>,
    pub splits: Option<SplitTable>,
}

/// Outcome of one chart request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchResult {
    Success {
        interval: String,
        prices: PriceTable,
        dividends: Option<DividendTable>,
        splits: Option<SplitTable>,
    },
    Failure {
        reason: String,
    },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn prices(&self) -> Option<&PriceTable> {
        match self {
            Self::Success { prices, .. } => Some(prices),
            Self::Failure { .. } => None,
        }
    }
}

/// Flattened key/value summary table from the quote page.
pub type Summary = BTreeMap<String, String>;

/// One (symbol, interval) result paired with its symbol's summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    pub symbol: Symbol,
    pub fetch: FetchResult,
    pub summary: Arc<Summary>,
}

/// Ordered batch output: symbol-major, then interval enumeration order.
pub type BatchResult = Vec<BatchEntry>;
