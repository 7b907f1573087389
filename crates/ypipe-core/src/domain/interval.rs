use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Period, ValidationError};

const ALL_INTERVALS: &str = "all";

/// Sampling granularity of a chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "2m")]
    TwoMinutes,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "90m")]
    NinetyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1wk")]
    OneWeek,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
}

impl Interval {
    pub const ALL: [Self; 12] = [
        Self::OneMinute,
        Self::TwoMinutes,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::NinetyMinutes,
        Self::OneHour,
        Self::OneDay,
        Self::FiveDays,
        Self::OneWeek,
        Self::OneMonth,
        Self::ThreeMonths,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::TwoMinutes => "2m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::NinetyMinutes => "90m",
            Self::OneHour => "1h",
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneWeek => "1wk",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
        }
    }

    /// Minute- and hour-suffixed intervals.
    pub fn is_intraday(self) -> bool {
        is_intraday_label(self.as_str())
    }

    /// Applies the vendor's look-back limits for fine-grained series.
    ///
    /// `1m` data only exists for the last few days and other intraday data for
    /// roughly a month; a missing period means the full history.
    pub fn effective_period(self, requested: Option<Period>) -> Period {
        let period = requested.unwrap_or(Period::Max);
        match self {
            Self::OneMinute => period.clamp_to(Period::FiveDays),
            other if other.is_intraday() => period.clamp_to(Period::OneMonth),
            _ => period,
        }
    }
}

/// True for granularity labels ending in `m` (minutes) or `h` (hours).
///
/// Works on vendor labels such as `"60m"` that have no [`Interval`] variant.
/// `"1mo"` and `"3mo"` end in `o` and are not intraday.
pub fn is_intraday_label(label: &str) -> bool {
    label.ends_with('m') || label.ends_with('h')
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|interval| interval.as_str() == value)
            .ok_or_else(|| ValidationError::InvalidInterval {
                value: value.to_owned(),
            })
    }
}

/// Requested interval: one concrete interval or every interval (`"all"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum IntervalSelection {
    Single(Interval),
    All,
}

impl IntervalSelection {
    /// Concrete intervals to request, in enumeration order.
    pub fn intervals(self) -> Vec<Interval> {
        match self {
            Self::Single(interval) => vec![interval],
            Self::All => Interval::ALL.to_vec(),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single(interval) => interval.as_str(),
            Self::All => ALL_INTERVALS,
        }
    }
}

impl Display for IntervalSelection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntervalSelection {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == ALL_INTERVALS {
            return Ok(Self::All);
        }
        Interval::from_str(value).map(Self::Single)
    }
}

impl From<Interval> for IntervalSelection {
    fn from(value: Interval) -> Self {
        Self::Single(value)
    }
}

impl From<IntervalSelection> for String {
    fn from(value: IntervalSelection) -> Self {
        value.as_str().to_owned()
    }
}

impl TryFrom<String> for IntervalSelection {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_interval() {
        let interval = Interval::from_str("1wk").expect("must parse");
        assert_eq!(interval, Interval::OneWeek);
    }

    #[test]
    fn rejects_invalid_interval() {
        for value in ["2h", "b", "", "1M", "all "] {
            let err = IntervalSelection::from_str(value).expect_err("must fail");
            assert!(matches!(err, ValidationError::InvalidInterval { .. }));
        }
    }

    #[test]
    fn all_expands_to_every_concrete_interval_in_order() {
        let selection = IntervalSelection::from_str("all").expect("must parse");
        assert_eq!(selection.intervals(), Interval::ALL.to_vec());
        assert_eq!(selection.intervals().len(), 12);
    }

    #[test]
    fn only_minute_and_hour_intervals_are_intraday() {
        let intraday: Vec<_> = Interval::ALL
            .into_iter()
            .filter(|interval| interval.is_intraday())
            .map(Interval::as_str)
            .collect();
        assert_eq!(intraday, ["1m", "2m", "5m", "15m", "30m", "90m", "1h"]);
    }

    #[test]
    fn intraday_intervals_cap_the_period() {
        assert_eq!(
            Interval::OneMinute.effective_period(Some(Period::Max)),
            Period::FiveDays
        );
        assert_eq!(
            Interval::OneHour.effective_period(Some(Period::Max)),
            Period::OneMonth
        );
        assert_eq!(
            Interval::OneMinute.effective_period(Some(Period::OneDay)),
            Period::OneDay
        );
        assert_eq!(Interval::OneDay.effective_period(None), Period::Max);
        assert_eq!(
            Interval::OneWeek.effective_period(Some(Period::YearToDate)),
            Period::YearToDate
        );
    }
}
