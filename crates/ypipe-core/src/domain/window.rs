use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::{Period, ValidationError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Start or end of an explicit request window.
///
/// Text input is parsed eagerly, so a malformed date is rejected when the
/// query is built rather than halfway through a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateInput {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl DateInput {
    /// Seconds since the epoch, reading the value as local wall-clock time.
    /// Date-only values resolve to local midnight.
    pub fn to_local_epoch(self) -> Result<i64, ValidationError> {
        self.to_epoch_in(&Local)
    }

    /// Seconds since the epoch, reading the value as wall-clock time in `tz`.
    /// Ambiguous times take the earlier instant; times skipped by a DST jump
    /// are rejected.
    pub fn to_epoch_in<Tz: TimeZone>(self, tz: &Tz) -> Result<i64, ValidationError> {
        let naive = match self {
            Self::Date(date) => date.and_time(NaiveTime::MIN),
            Self::DateTime(datetime) => datetime,
        };

        tz.from_local_datetime(&naive)
            .earliest()
            .map(|datetime| datetime.timestamp())
            .ok_or_else(|| ValidationError::NonexistentLocalTime {
                value: naive.to_string(),
            })
    }
}

impl FromStr for DateInput {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(Self::Date)
            .map_err(|_| ValidationError::InvalidDate {
                value: value.to_owned(),
            })
    }
}

impl From<NaiveDate> for DateInput {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl Display for DateInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            Self::DateTime(datetime) => write!(f, "{}", datetime.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

/// Time window of one chart request: a named range or absolute bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PeriodWindow {
    Range { range: Period },
    Explicit { period1: i64, period2: i64 },
}

impl PeriodWindow {
    pub fn query_pairs(self) -> Vec<(&'static str, String)> {
        match self {
            Self::Range { range } => vec![("range", range.as_str().to_owned())],
            Self::Explicit { period1, period2 } => vec![
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
            ],
        }
    }
}

/// Resolves start/end/period into the window sent to the chart endpoint.
///
/// An explicit `start`, a missing period, or `max` all produce absolute
/// bounds; `start` defaults to the epoch and `end` to `now`. Any other
/// period is passed through as a named range and `end` is ignored.
pub fn clean_start_end_period(
    start: Option<DateInput>,
    end: Option<DateInput>,
    period: Option<Period>,
    now: i64,
) -> Result<PeriodWindow, ValidationError> {
    match period {
        Some(range) if start.is_none() && range != Period::Max => Ok(PeriodWindow::Range { range }),
        _ => {
            let period1 = start.map(DateInput::to_local_epoch).transpose()?.unwrap_or(0);
            let period2 = end.map(DateInput::to_local_epoch).transpose()?.unwrap_or(now);
            Ok(PeriodWindow::Explicit { period1, period2 })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_midnight(year: i32, month: u32, day: u32) -> i64 {
        let naive = NaiveDate::from_ymd_opt(year, month, day)
            .expect("valid date")
            .and_hms_opt(0, 0, 0)
            .expect("valid time");
        Local
            .from_local_datetime(&naive)
            .earliest()
            .expect("midnight exists")
            .timestamp()
    }

    #[test]
    fn named_period_without_start_is_a_range() {
        let window = clean_start_end_period(None, None, Some(Period::OneDay), 10).expect("valid");
        assert_eq!(window, PeriodWindow::Range { range: Period::OneDay });
    }

    #[test]
    fn max_or_missing_period_spans_epoch_to_now() {
        let expected = PeriodWindow::Explicit {
            period1: 0,
            period2: 10,
        };
        assert_eq!(
            clean_start_end_period(None, None, Some(Period::Max), 10).expect("valid"),
            expected
        );
        assert_eq!(clean_start_end_period(None, None, None, 10).expect("valid"), expected);
    }

    #[test]
    fn explicit_start_overrides_named_period() {
        let start = DateInput::from_str("2020-01-02").expect("valid date");
        let end = DateInput::from_str("2020-02-03").expect("valid date");

        let window = clean_start_end_period(Some(start), Some(end), Some(Period::OneYear), 10)
            .expect("valid");

        assert_eq!(
            window,
            PeriodWindow::Explicit {
                period1: local_midnight(2020, 1, 2),
                period2: local_midnight(2020, 2, 3),
            }
        );
    }

    #[test]
    fn datetime_input_keeps_time_of_day() {
        let datetime = NaiveDate::from_ymd_opt(2021, 6, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid datetime");
        let epoch = DateInput::from(datetime).to_local_epoch().expect("exists");
        assert_eq!(epoch - local_midnight(2021, 6, 1), 12 * 3600);
    }

    #[test]
    fn wall_clock_time_inside_a_dst_gap_is_rejected() {
        let skipped = NaiveDate::from_ymd_opt(2024, 3, 10)
            .and_then(|date| date.and_hms_opt(2, 30, 0))
            .expect("valid datetime");

        let err = DateInput::from(skipped)
            .to_epoch_in(&chrono_tz::America::New_York)
            .expect_err("02:30 does not exist on that day");
        assert_eq!(
            err,
            ValidationError::NonexistentLocalTime {
                value: String::from("2024-03-10 02:30:00")
            }
        );
    }

    #[test]
    fn ambiguous_wall_clock_time_takes_the_earlier_instant() {
        let repeated = NaiveDate::from_ymd_opt(2024, 11, 3)
            .and_then(|date| date.and_hms_opt(1, 30, 0))
            .expect("valid datetime");

        let epoch = DateInput::from(repeated)
            .to_epoch_in(&chrono_tz::America::New_York)
            .expect("exists twice");
        // 01:30 EDT, before clocks fall back.
        assert_eq!(epoch, 1_730_611_800);
    }

    #[test]
    fn rejects_malformed_dates() {
        for value in ["01-01-2020", "a", "", "2020/01/01", "2020-13-01"] {
            let err = DateInput::from_str(value).expect_err("must fail");
            assert!(matches!(err, ValidationError::InvalidDate { .. }));
        }
    }

    #[test]
    fn window_query_pairs() {
        assert_eq!(
            PeriodWindow::Range { range: Period::FiveDays }.query_pairs(),
            vec![("range", String::from("5d"))]
        );
        assert_eq!(
            PeriodWindow::Explicit {
                period1: 0,
                period2: 10
            }
            .query_pairs(),
            vec![("period1", String::from("0")), ("period2", String::from("10"))]
        );
    }
}
