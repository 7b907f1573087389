//! # ypipe Core
//!
//! Bounded-concurrency fetch-and-normalize pipeline for Yahoo Finance chart
//! data.
//!
//! ## Overview
//!
//! One batch call turns symbols plus a period/interval/start/end query into
//! normalized price, dividend and split tables, each paired with the
//! symbol's quote-page summary:
//!
//! - **Request building**: chart URLs and per-interval parameter sets, with
//!   the intraday period caps applied
//! - **Bounded fetching**: every GET runs under one shared semaphore and a
//!   per-request timeout
//! - **Normalization**: raw chart JSON and quote HTML become typed tables;
//!   bad payloads degrade to empty tables instead of errors
//! - **Orchestration**: order-preserving fan-out with per-query memoization
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Batch memoization and cache modes |
//! | [`clock`] | Wall-clock seam for window resolution |
//! | [`config`] | Pipeline configuration and environment overrides |
//! | [`domain`] | Query vocabulary and output records |
//! | [`error`] | Validation and per-request error types |
//! | [`fetcher`] | Concurrency-capped GET execution |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`normalize`] | Chart JSON and summary HTML parsing |
//! | [`orchestrator`] | Batch fan-out, pairing and memoization |
//! | [`request`] | Chart URL and parameter construction |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ypipe_core::{BatchQuery, FetchOrchestrator, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = FetchOrchestrator::from_config(PipelineConfig::from_env());
//!     let query = BatchQuery::parse(&["AAPL"], Some("1mo"), "1d", None, None)?;
//!
//!     for entry in orchestrator.get(query).await?.iter() {
//!         if let Some(prices) = entry.fetch.prices() {
//!             println!("{}: {} rows", entry.symbol, prices.len());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  FetchOrchestrator   │──────▶ BatchCache
//! └──────────┬───────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │  RequestSpecBuilder  │
//! └──────────┬───────────┘
//!            │ RequestSpec
//!            ▼
//! ┌──────────────────────┐     ┌──────────────────┐
//! │  BoundedFetcher      │────▶│ HttpClient       │
//! │  (semaphore/timeout) │     │ (reqwest/noop)   │
//! └──────────┬───────────┘     └──────────────────┘
//!            │ JSON / HTML
//!            ▼
//! ┌──────────────────────┐
//! │  normalize           │
//! │  (tables, summary)   │
//! └──────────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Only argument validation fails a batch:
//!
//! ```rust
//! use ypipe_core::{BatchQuery, ValidationError};
//!
//! let error = BatchQuery::parse(&["AAPL"], Some("2d"), "1d", None, None).unwrap_err();
//! assert!(matches!(error, ValidationError::InvalidPeriod { .. }));
//! ```
//!
//! Transport failures, timeouts and undecodable bodies become
//! [`FetchResult::Failure`] entries; malformed payload sections become empty
//! or absent tables. Both are logged through `tracing`.

pub mod cache;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod normalize;
pub mod orchestrator;
pub mod request;

// Caching
pub use cache::{BatchCache, CacheMode};

// Clock
pub use clock::{Clock, FixedClock, SystemClock};

// Configuration
pub use config::PipelineConfig;

// Domain models
pub use domain::{
    clean_start_end_period, is_intraday_label, BatchEntry, BatchResult, ChartFrames, DateInput,
    DividendRecord, DividendTable, FetchResult, IndexKind, Interval, IntervalSelection, Period,
    PeriodWindow, PriceRecord, PriceTable, SplitRecord, SplitTable, Summary, Symbol,
};

// Error types
pub use error::{FetchError, ValidationError};

// Fetching
pub use fetcher::BoundedFetcher;

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};

// Normalization
pub use normalize::{parse_prices, parse_summary_html, round_to_hint, PayloadError};

// Orchestration
pub use orchestrator::{BatchQuery, FetchOrchestrator};

// Request building
pub use request::{ParamSet, RequestSpec, RequestSpecBuilder};
