//! Request specification builder.
//!
//! Turns symbols and period/interval/start/end into the `(url, parameters)`
//! pairs the fetcher executes. Pure apart from reading the injected clock.

use std::sync::Arc;

use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::config::DEFAULT_CHART_BASE_URL;
use crate::{
    clean_start_end_period, DateInput, Interval, IntervalSelection, Period, PeriodWindow, Symbol,
    ValidationError,
};

const EVENTS: &str = "div,splits";

/// Resolved query parameters for one chart request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ParamSet {
    #[serde(flatten)]
    pub window: PeriodWindow,
    #[serde(rename = "includePrePost")]
    pub include_pre_post: bool,
    pub events: &'static str,
    pub interval: Interval,
}

impl ParamSet {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .window
            .query_pairs()
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value))
            .collect();
        pairs.push((
            String::from("includePrePost"),
            u8::from(self.include_pre_post).to_string(),
        ));
        pairs.push((String::from("events"), self.events.to_owned()));
        pairs.push((
            String::from("interval"),
            self.interval.as_str().to_ascii_lowercase(),
        ));
        pairs
    }
}

/// One GET request: target URL plus its query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl RequestSpec {
    pub fn chart(url: impl Into<String>, params: &ParamSet) -> Self {
        Self {
            url: url.into(),
            params: params.query_pairs(),
        }
    }

    pub fn page(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: Vec::new(),
        }
    }

    /// Last path segment (the symbol for chart and quote URLs), for logs.
    pub fn tail(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or(&self.url)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Builds chart URLs and parameter sets.
#[derive(Debug, Clone)]
pub struct RequestSpecBuilder {
    base_url: String,
    clock: Arc<dyn Clock>,
}

impl Default for RequestSpecBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CHART_BASE_URL)
    }
}

impl RequestSpecBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// `{base}chart/{symbol}` for each symbol, in input order, duplicates kept.
    pub fn price_urls(&self, symbols: &[Symbol]) -> Vec<String> {
        symbols
            .iter()
            .map(|symbol| format!("{}chart/{}", self.base_url, symbol))
            .collect()
    }

    /// Parameter sets for the requested interval, one per concrete interval
    /// when `all` is requested. The period is capped per interval before the
    /// window is resolved.
    pub fn price_params(
        &self,
        period: Option<Period>,
        interval: IntervalSelection,
        start: Option<DateInput>,
        end: Option<DateInput>,
    ) -> Result<Vec<ParamSet>, ValidationError> {
        let now = self.clock.now_epoch();

        interval
            .intervals()
            .into_iter()
            .map(|interval| {
                let effective = interval.effective_period(period);
                let window = clean_start_end_period(start, end, Some(effective), now)?;
                Ok(ParamSet {
                    window,
                    include_pre_post: true,
                    events: EVENTS,
                    interval,
                })
            })
            .collect()
    }

    /// Same as [`Self::price_params`] but from raw text, applying input
    /// validation first.
    pub fn price_params_from_str(
        &self,
        period: Option<&str>,
        interval: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<ParamSet>, ValidationError> {
        let period = period.map(str::parse::<Period>).transpose()?;
        let interval = interval.parse::<IntervalSelection>()?;
        let start = start.map(str::parse::<DateInput>).transpose()?;
        let end = end.map(str::parse::<DateInput>).transpose()?;
        self.price_params(period, interval, start, end)
    }
}
