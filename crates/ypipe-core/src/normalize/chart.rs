use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::PayloadError;
use crate::{
    is_intraday_label, ChartFrames, DividendRecord, DividendTable, IndexKind, PriceRecord,
    PriceTable, SplitRecord, SplitTable,
};

// f64 carries ~15 significant digits; finer hints are no-ops.
const MAX_ROUNDING_DIGITS: u32 = 15;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteMeta {
    symbol: String,
    exchange_name: String,
    currency: String,
    data_granularity: String,
    price_hint: u32,
    exchange_timezone_name: String,
}

#[derive(Debug, Deserialize)]
struct QuoteSeries {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseSeries {
    adjclose: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActionMeta {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    price_hint: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct DividendEvent {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize)]
struct SplitEvent {
    numerator: f64,
    denominator: f64,
    date: i64,
}

/// Normalizes one `chart.result[i]` object into price, dividend and split
/// tables. Never fails; problems are logged and empty the affected table.
pub fn parse_prices(raw: &Value) -> ChartFrames {
    let interval = raw
        .pointer("/meta/dataGranularity")
        .and_then(Value::as_str)
        .map(str::to_owned);

    let prices = parse_quotes(raw).unwrap_or_else(|error| {
        info!(%error, "invalid price data");
        PriceTable::empty()
    });
    let (dividends, splits) = parse_actions(raw);

    ChartFrames {
        interval,
        prices,
        dividends,
        splits,
    }
}

/// Rounds to `digits` decimals, ties to even. Values too large to scale are
/// returned unchanged.
pub fn round_to_hint(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits.min(MAX_ROUNDING_DIGITS) as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round_ties_even() / factor
}

fn section<T: DeserializeOwned>(
    value: Option<&Value>,
    name: &'static str,
) -> Result<T, PayloadError> {
    let value = value.ok_or(PayloadError::Missing(name))?;
    T::deserialize(value).map_err(|e| PayloadError::Malformed {
        section: name,
        message: e.to_string(),
    })
}

fn check_len<T>(field: &'static str, values: &[T], expected: usize) -> Result<(), PayloadError> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(PayloadError::LengthMismatch {
            field,
            expected,
            found: values.len(),
        })
    }
}

fn parse_quotes(raw: &Value) -> Result<PriceTable, PayloadError> {
    let meta: QuoteMeta = section(raw.get("meta"), "meta")?;
    let timestamps: Vec<i64> = section(raw.get("timestamp"), "timestamp")?;
    let quote: QuoteSeries = section(raw.pointer("/indicators/quote/0"), "indicators.quote")?;

    let n = timestamps.len();
    check_len("open", &quote.open, n)?;
    check_len("high", &quote.high, n)?;
    check_len("low", &quote.low, n)?;
    check_len("close", &quote.close, n)?;
    check_len("volume", &quote.volume, n)?;

    let adjclose = match raw.pointer("/indicators/adjclose") {
        Some(block) => {
            let series: AdjCloseSeries = section(block.get(0), "indicators.adjclose")?;
            check_len("adjclose", &series.adjclose, n)?;
            series.adjclose
        }
        None => quote.close.clone(),
    };

    let tz: Tz = meta
        .exchange_timezone_name
        .parse()
        .map_err(|_| PayloadError::UnknownTimezone(meta.exchange_timezone_name.clone()))?;
    let index = if is_intraday_label(&meta.data_granularity) {
        IndexKind::Datetime
    } else {
        IndexKind::Date
    };

    let hint = meta.price_hint;
    let round = |value: Option<f64>| {
        value
            .filter(|v| v.is_finite())
            .map(|v| round_to_hint(v, hint))
    };

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| timestamps[i]);

    let mut rows: Vec<PriceRecord> = Vec::with_capacity(n);
    for i in order {
        let (Some(open), Some(high), Some(low), Some(close), Some(adjclose)) = (
            round(quote.open[i]),
            round(quote.high[i]),
            round(quote.low[i]),
            round(quote.close[i]),
            round(adjclose[i]),
        ) else {
            continue;
        };
        let volume = round(quote.volume[i]).map_or(0, |v| v.max(0.0) as u64);

        let key = format_index(to_exchange_time(timestamps[i], &tz)?, index);
        let record = PriceRecord {
            index: key,
            open,
            high,
            low,
            close,
            adjclose,
            volume,
            symbol: meta.symbol.clone(),
            currency: meta.currency.clone(),
            exchange: meta.exchange_name.clone(),
        };

        // Collapsing to dates can repeat a key (live bar + last daily bar).
        match rows.last_mut() {
            Some(last) if last.index == record.index => *last = record,
            _ => rows.push(record),
        }
    }

    Ok(PriceTable::new(index, rows))
}

fn to_exchange_time(timestamp: i64, tz: &Tz) -> Result<DateTime<Tz>, PayloadError> {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .map(|utc| utc.with_timezone(tz))
        .ok_or(PayloadError::InvalidTimestamp(timestamp))
}

fn format_index(datetime: DateTime<Tz>, index: IndexKind) -> String {
    match index {
        IndexKind::Datetime => datetime.to_rfc3339_opts(SecondsFormat::Secs, false),
        IndexKind::Date => datetime.format("%Y-%m-%d").to_string(),
    }
}

fn utc_date(timestamp: i64) -> Result<String, PayloadError> {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .map(|datetime| datetime.format("%Y-%m-%d").to_string())
        .ok_or(PayloadError::InvalidTimestamp(timestamp))
}

fn parse_actions(raw: &Value) -> (Option<DividendTable>, Option<SplitTable>) {
    let Some(events) = raw.get("events").filter(|events| !events.is_null()) else {
        return (None, None);
    };
    if !events.is_object() {
        info!("invalid action data: events is not an object");
        return (None, None);
    }

    let meta: ActionMeta = raw
        .get("meta")
        .and_then(|meta| ActionMeta::deserialize(meta).ok())
        .unwrap_or_default();

    let dividends = events
        .get("dividends")
        .and_then(|block| match parse_dividends(block, &meta) {
            Ok(table) => table,
            Err(error) => {
                info!(%error, "invalid dividend data");
                None
            }
        });
    let splits = events
        .get("splits")
        .and_then(|block| match parse_splits(block, &meta) {
            Ok(table) => table,
            Err(error) => {
                info!(%error, "invalid split data");
                None
            }
        });

    (dividends, splits)
}

fn parse_dividends(
    block: &Value,
    meta: &ActionMeta,
) -> Result<Option<DividendTable>, PayloadError> {
    let events: BTreeMap<String, DividendEvent> = section(Some(block), "events.dividends")?;
    if events.is_empty() {
        return Ok(None);
    }
    let hint = meta.price_hint.ok_or(PayloadError::Missing("meta.priceHint"))?;

    let mut events: Vec<DividendEvent> = events.into_values().collect();
    events.sort_by_key(|event| event.date);

    let rows = events
        .into_iter()
        .map(|event| {
            Ok(DividendRecord {
                date: utc_date(event.date)?,
                dividends: round_to_hint(event.amount, hint),
                symbol: meta.symbol.clone().unwrap_or_default(),
                currency: meta.currency.clone().unwrap_or_default(),
            })
        })
        .collect::<Result<Vec<_>, PayloadError>>()?;

    Ok(Some(DividendTable { rows }))
}

fn parse_splits(block: &Value, meta: &ActionMeta) -> Result<Option<SplitTable>, PayloadError> {
    let events: BTreeMap<String, SplitEvent> = section(Some(block), "events.splits")?;
    if events.is_empty() {
        return Ok(None);
    }

    let mut events: Vec<SplitEvent> = events.into_values().collect();
    events.sort_by_key(|event| event.date);

    let rows = events
        .into_iter()
        .map(|event| {
            let ratio = event.numerator / event.denominator;
            if !ratio.is_finite() {
                return Err(PayloadError::Malformed {
                    section: "events.splits",
                    message: format!("ratio {}/{}", event.numerator, event.denominator),
                });
            }
            Ok(SplitRecord {
                date: utc_date(event.date)?,
                splits: ratio,
                symbol: meta.symbol.clone().unwrap_or_default(),
            })
        })
        .collect::<Result<Vec<_>, PayloadError>>()?;

    Ok(Some(SplitTable { rows }))
}
