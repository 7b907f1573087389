//! # Domain Models
//!
//! Request vocabulary and normalized output records for the chart pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Non-blank vendor ticker |
//! | [`Period`] | Named look-back range (`1d` .. `max`) |
//! | [`Interval`] | Concrete sampling granularity (`1m` .. `3mo`) |
//! | [`IntervalSelection`] | One interval or `all` |
//! | [`DateInput`] | Parsed start/end bound |
//! | [`PeriodWindow`] | Named range or absolute epoch bounds |
//! | [`PriceTable`] | Normalized OHLCV rows |
//! | [`DividendTable`] / [`SplitTable`] | Corporate action rows |
//! | [`FetchResult`] | Success or failure of one chart request |
//!
//! Text inputs are parsed into these types up front; everything downstream
//! of [`crate::BatchQuery`] works with validated values only.

mod interval;
mod period;
mod records;
mod symbol;
mod window;

pub use interval::{is_intraday_label, Interval, IntervalSelection};
pub use period::Period;
pub use records::{
    BatchEntry, BatchResult, ChartFrames, DividendRecord, DividendTable, FetchResult, IndexKind,
    PriceRecord, PriceTable, SplitRecord, SplitTable, Summary,
};
pub use symbol::Symbol;
pub use window::{clean_start_end_period, DateInput, PeriodWindow};
