//! CLI argument definitions for ypipe.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `prices` | Fetch and normalize chart data plus quote summaries |
//! | `params` | Print the chart requests a query would issue, without fetching |
//!
//! # Examples
//!
//! ```bash
//! ypipe prices AAPL --period 1mo --interval 1d --pretty
//! ypipe prices AAPL MSFT --interval all --concurrency 16
//! ypipe params AAPL --start 2024-01-02 --end 2024-02-01
//! ```

use clap::{Args, Parser, Subcommand};

/// Bounded-concurrency Yahoo Finance chart fetcher.
#[derive(Debug, Parser)]
#[command(name = "ypipe", author, version, about = "Yahoo chart fetch-and-normalize pipeline")]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Maximum simultaneous requests (defaults to YPIPE_MAX_CONCURRENCY or 1000).
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in milliseconds (defaults to YPIPE_TIMEOUT_MS or 10000).
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch price, dividend and split tables with each symbol's summary.
    ///
    ///   ypipe prices AAPL
    ///   ypipe prices AAPL MSFT --period 5d --interval 1h
    Prices(QueryArgs),

    /// Print chart URLs and query parameters without any network access.
    Params(QueryArgs),
}

/// Batch query shared by every command.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// One or more vendor symbols (e.g. AAPL, ^GSPC, EURUSD=X).
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,

    /// Look-back range: 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max.
    ///
    /// Omitted means the full history. Intraday intervals cap it.
    #[arg(long)]
    pub period: Option<String>,

    /// Sampling interval: 1m, 2m, 5m, 15m, 30m, 90m, 1h, 1d, 5d, 1wk, 1mo, 3mo or all.
    #[arg(long, default_value = "1d")]
    pub interval: String,

    /// Window start (YYYY-MM-DD, local midnight).
    #[arg(long)]
    pub start: Option<String>,

    /// Window end (YYYY-MM-DD, local midnight). Defaults to now.
    #[arg(long)]
    pub end: Option<String>,
}
