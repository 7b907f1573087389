//! Batch orchestration.
//!
//! A [`FetchOrchestrator`] turns one [`BatchQuery`] into a [`BatchResult`]:
//! every (symbol, interval) chart request and every symbol's quote page run
//! concurrently under the fetcher's cap, results come back in input order,
//! and the finished batch is memoized per query.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::{BatchCache, CacheMode};
use crate::clock::Clock;
use crate::config::PipelineConfig;
use crate::fetcher::BoundedFetcher;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::normalize::{fetch_chart, fetch_summary};
use crate::request::{RequestSpec, RequestSpecBuilder};
use crate::{
    BatchEntry, BatchResult, DateInput, IntervalSelection, Period, Summary, Symbol,
    ValidationError,
};

/// Validated arguments of one batch call. Also the memoization key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchQuery {
    pub symbols: Vec<Symbol>,
    pub period: Option<Period>,
    pub interval: IntervalSelection,
    pub start: Option<DateInput>,
    pub end: Option<DateInput>,
}

impl BatchQuery {
    pub fn new(
        symbols: Vec<Symbol>,
        period: Option<Period>,
        interval: IntervalSelection,
        start: Option<DateInput>,
        end: Option<DateInput>,
    ) -> Self {
        Self {
            symbols,
            period,
            interval,
            start,
            end,
        }
    }

    /// Parses raw text arguments, rejecting unknown periods and intervals,
    /// malformed dates and blank symbols.
    pub fn parse<S: AsRef<str>>(
        symbols: &[S],
        period: Option<&str>,
        interval: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let symbols = symbols
            .iter()
            .map(|symbol| Symbol::parse(symbol.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            symbols,
            period: period.map(str::parse::<Period>).transpose()?,
            interval: interval.parse::<IntervalSelection>()?,
            start: start.map(str::parse::<DateInput>).transpose()?,
            end: end.map(str::parse::<DateInput>).transpose()?,
        })
    }
}

/// Drives whole batches through the builder, fetcher and normalizer.
pub struct FetchOrchestrator {
    builder: RequestSpecBuilder,
    fetcher: BoundedFetcher,
    quote_page_url: String,
    cache_mode: CacheMode,
    cache: Mutex<BatchCache>,
}

impl FetchOrchestrator {
    pub fn new(client: Arc<dyn HttpClient>, config: PipelineConfig) -> Self {
        Self {
            builder: RequestSpecBuilder::new(config.chart_base_url.clone()),
            fetcher: BoundedFetcher::from_config(client, &config),
            quote_page_url: config.quote_page_url,
            cache_mode: config.cache_mode,
            cache: Mutex::new(BatchCache::with_capacity(config.cache_capacity)),
        }
    }

    /// Orchestrator over the real HTTP transport.
    pub fn from_config(config: PipelineConfig) -> Self {
        let client = Arc::new(ReqwestHttpClient::new(&config.user_agent));
        Self::new(client, config)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.builder = self.builder.with_clock(clock);
        self
    }

    pub fn with_cache_mode(mut self, mode: CacheMode) -> Self {
        self.cache_mode = mode;
        self
    }

    pub fn fetcher(&self) -> &BoundedFetcher {
        &self.fetcher
    }

    /// Fetches and normalizes every (symbol, interval) pair of `query`.
    ///
    /// Entries are symbol-major, then in interval enumeration order; each
    /// carries its symbol's summary. Only request construction can fail:
    /// per-request problems become [`crate::FetchResult::Failure`] entries or
    /// empty tables. With [`CacheMode::Use`] an identical earlier query is
    /// answered from memory without any request. Calls are serialized, so
    /// concurrent identical queries fetch once. At most
    /// [`PipelineConfig::cache_capacity`] distinct queries are remembered; the
    /// oldest is evicted first.
    pub async fn get(&self, query: BatchQuery) -> Result<Arc<BatchResult>, ValidationError> {
        let mut cache = self.cache.lock().await;

        if self.cache_mode.reads() {
            if let Some(batch) = cache.get(&query) {
                debug!(symbols = query.symbols.len(), "batch served from cache");
                return Ok(batch);
            }
        }

        let urls = self.builder.price_urls(&query.symbols);
        let params = self
            .builder
            .price_params(query.period, query.interval, query.start, query.end)?;

        let mut specs = Vec::with_capacity(urls.len() * params.len());
        for url in &urls {
            for param in &params {
                specs.push((RequestSpec::chart(url.as_str(), param), param.interval));
            }
        }
        let pages: Vec<RequestSpec> = query
            .symbols
            .iter()
            .map(|symbol| RequestSpec::page(format!("{}{}", self.quote_page_url, symbol)))
            .collect();

        info!(
            symbols = query.symbols.len(),
            intervals = params.len(),
            requests = specs.len() + pages.len(),
            "fetching batch"
        );

        let charts = join_all(
            specs
                .iter()
                .map(|(spec, interval)| fetch_chart(&self.fetcher, spec, *interval)),
        );
        let summaries = join_all(pages.iter().map(|page| fetch_summary(&self.fetcher, page)));
        let (charts, summaries) = tokio::join!(charts, summaries);

        let summaries: Vec<Arc<Summary>> = summaries.into_iter().map(Arc::new).collect();
        let per_symbol = params.len();
        let batch: BatchResult = charts
            .into_iter()
            .enumerate()
            .map(|(position, fetch)| {
                let owner = position / per_symbol;
                BatchEntry {
                    symbol: query.symbols[owner].clone(),
                    fetch,
                    summary: Arc::clone(&summaries[owner]),
                }
            })
            .collect();

        let failures = batch.iter().filter(|entry| !entry.fetch.is_success()).count();
        info!(entries = batch.len(), failures, "batch complete");

        let batch = Arc::new(batch);
        if self.cache_mode.writes() {
            cache.put(query, Arc::clone(&batch));
        }
        Ok(batch)
    }

    /// [`Self::get`] from raw text arguments.
    pub async fn get_str<S: AsRef<str>>(
        &self,
        symbols: &[S],
        period: Option<&str>,
        interval: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Arc<BatchResult>, ValidationError> {
        let query = BatchQuery::parse(symbols, period, interval, start, end)?;
        self.get(query).await
    }

    /// Drops every memoized batch.
    pub async fn invalidate(&self) {
        self.cache.lock().await.clear();
    }

    pub async fn cached_batches(&self) -> usize {
        self.cache.lock().await.len()
    }
}
