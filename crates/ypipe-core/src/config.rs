//! Pipeline configuration.

use std::time::Duration;

use tracing::warn;

use crate::cache::CacheMode;

pub const DEFAULT_CHART_BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/";
pub const DEFAULT_QUOTE_PAGE_URL: &str = "https://finance.yahoo.com/quote/";
/// Process-wide ceiling on in-flight requests.
pub const DEFAULT_MAX_CONCURRENCY: usize = 1000;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Distinct batches an orchestrator memoizes before evicting the oldest.
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

const ENV_MAX_CONCURRENCY: &str = "YPIPE_MAX_CONCURRENCY";
const ENV_TIMEOUT_MS: &str = "YPIPE_TIMEOUT_MS";
const ENV_CHART_BASE_URL: &str = "YPIPE_CHART_BASE_URL";
const ENV_QUOTE_PAGE_URL: &str = "YPIPE_QUOTE_PAGE_URL";
const ENV_CACHE_CAPACITY: &str = "YPIPE_CACHE_CAPACITY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Prefix for `chart/{symbol}` URLs; must end with `/`.
    pub chart_base_url: String,
    /// Prefix for quote page URLs; the symbol is appended.
    pub quote_page_url: String,
    pub max_concurrency: usize,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub cache_mode: CacheMode,
    pub cache_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chart_base_url: String::from(DEFAULT_CHART_BASE_URL),
            quote_page_url: String::from(DEFAULT_QUOTE_PAGE_URL),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: String::from(concat!("ypipe/", env!("CARGO_PKG_VERSION"))),
            cache_mode: CacheMode::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by `YPIPE_*` environment variables. Unparseable
    /// values are skipped with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_MAX_CONCURRENCY) {
            match raw.trim().parse::<usize>() {
                Ok(limit) => config = config.with_max_concurrency(limit),
                Err(_) => {
                    warn!(variable = ENV_MAX_CONCURRENCY, value = %raw, "ignoring invalid value")
                }
            }
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config = config.with_request_timeout(Duration::from_millis(ms)),
                Err(_) => warn!(variable = ENV_TIMEOUT_MS, value = %raw, "ignoring invalid value"),
            }
        }
        if let Some(raw) = lookup(ENV_CACHE_CAPACITY) {
            match raw.trim().parse::<usize>() {
                Ok(limit) => config = config.with_cache_capacity(limit),
                Err(_) => {
                    warn!(variable = ENV_CACHE_CAPACITY, value = %raw, "ignoring invalid value")
                }
            }
        }
        if let Some(url) = lookup(ENV_CHART_BASE_URL) {
            config = config.with_chart_base_url(url);
        }
        if let Some(url) = lookup(ENV_QUOTE_PAGE_URL) {
            config.quote_page_url = url;
        }

        config
    }

    /// Sets the concurrency ceiling; zero is raised to one.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit.max(1);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_chart_base_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.chart_base_url = url;
        self
    }

    pub fn with_cache_mode(mut self, mode: CacheMode) -> Self {
        self.cache_mode = mode;
        self
    }

    /// Sets how many batches are memoized; zero is raised to one.
    pub fn with_cache_capacity(mut self, limit: usize) -> Self {
        self.cache_capacity = limit.max(1);
        self
    }

    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.request_timeout.as_millis()).unwrap_or(u64::MAX)
    }
}
