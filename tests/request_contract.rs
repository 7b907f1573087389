//! Contract tests for chart request construction
//!
//! URL shape, fixed parameters, intraday period caps, window resolution and
//! argument validation, checked across the full period/interval grid.

use std::sync::Arc;

use ypipe_core::{
    DateInput, FixedClock, Interval, IntervalSelection, Period, PeriodWindow, RequestSpec,
    RequestSpecBuilder, Symbol, ValidationError,
};

const BASE: &str = "https://query2.finance.yahoo.com/v8/finance/";

const PERIODS: [&str; 11] = [
    "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];
const INTERVALS: [&str; 13] = [
    "1m", "2m", "5m", "15m", "30m", "90m", "1h", "1d", "5d", "1wk", "1mo", "3mo", "all",
];

fn builder() -> RequestSpecBuilder {
    RequestSpecBuilder::default().with_clock(Arc::new(FixedClock(10)))
}

fn symbols(values: &[&str]) -> Vec<Symbol> {
    values
        .iter()
        .map(|value| Symbol::parse(value).expect("valid symbol"))
        .collect()
}

// =============================================================================
// Contract: URLs
// =============================================================================

#[test]
fn price_urls_match_input_length_order_and_shape() {
    let lists: [&[&str]; 4] = [
        &[],
        &["AAPL"],
        &["^GSPC", "BRK-B", "EURUSD=X"],
        &["msft", "MSFT", "msft"],
    ];

    for list in lists {
        let urls = builder().price_urls(&symbols(list));

        assert_eq!(urls.len(), list.len());
        for (url, symbol) in urls.iter().zip(list) {
            assert_eq!(url, &format!("{BASE}chart/{symbol}"));
        }
    }
}

#[test]
fn custom_base_url_is_used_verbatim() {
    let builder = RequestSpecBuilder::new("http://localhost:8080/v8/finance/");
    let urls = builder.price_urls(&symbols(&["AAPL"]));
    assert_eq!(urls, vec![String::from("http://localhost:8080/v8/finance/chart/AAPL")]);
}

// =============================================================================
// Contract: Parameters
// =============================================================================

#[test]
fn every_valid_pair_carries_the_fixed_parameters() {
    for period in PERIODS {
        for interval in INTERVALS {
            let params = builder()
                .price_params_from_str(Some(period), interval, None, None)
                .unwrap_or_else(|error| panic!("{period}/{interval}: {error}"));

            let expected: Vec<&str> = if interval == "all" {
                Interval::ALL.iter().map(|i| i.as_str()).collect()
            } else {
                vec![interval]
            };
            assert_eq!(params.len(), expected.len());

            for (param, expected_interval) in params.iter().zip(expected) {
                let spec = RequestSpec::chart(format!("{BASE}chart/AAPL"), param);
                assert_eq!(spec.param("includePrePost"), Some("1"));
                assert_eq!(spec.param("events"), Some("div,splits"));
                assert_eq!(spec.param("interval"), Some(expected_interval));
            }
        }
    }
}

#[test]
fn one_minute_interval_caps_the_period_at_five_days() {
    let params = builder()
        .price_params(Some(Period::Max), Interval::OneMinute.into(), None, None)
        .expect("valid");
    assert_eq!(params[0].window, PeriodWindow::Range { range: Period::FiveDays });

    let params = builder()
        .price_params(Some(Period::OneDay), Interval::OneMinute.into(), None, None)
        .expect("valid");
    assert_eq!(params[0].window, PeriodWindow::Range { range: Period::OneDay });
}

#[test]
fn other_intraday_intervals_cap_the_period_at_one_month() {
    for interval in ["2m", "5m", "15m", "30m", "90m", "1h"] {
        let params = builder()
            .price_params_from_str(Some("max"), interval, None, None)
            .expect("valid");
        assert_eq!(
            params[0].window,
            PeriodWindow::Range { range: Period::OneMonth },
            "interval {interval}"
        );
    }
}

#[test]
fn missing_period_defaults_to_max_before_capping() {
    let hourly = builder()
        .price_params(None, Interval::OneHour.into(), None, None)
        .expect("valid");
    assert_eq!(hourly[0].window, PeriodWindow::Range { range: Period::OneMonth });

    let daily = builder()
        .price_params(None, Interval::OneDay.into(), None, None)
        .expect("valid");
    assert_eq!(daily[0].window, PeriodWindow::Explicit { period1: 0, period2: 10 });
}

#[test]
fn all_intervals_are_capped_independently() {
    let params = builder()
        .price_params(Some(Period::Max), IntervalSelection::All, None, None)
        .expect("valid");

    let windows: Vec<(Interval, PeriodWindow)> =
        params.iter().map(|param| (param.interval, param.window)).collect();
    assert_eq!(windows[0], (Interval::OneMinute, PeriodWindow::Range { range: Period::FiveDays }));
    assert_eq!(windows[1], (Interval::TwoMinutes, PeriodWindow::Range { range: Period::OneMonth }));
    assert_eq!(windows[6], (Interval::OneHour, PeriodWindow::Range { range: Period::OneMonth }));
    for (interval, window) in &windows[7..] {
        assert_eq!(
            *window,
            PeriodWindow::Explicit { period1: 0, period2: 10 },
            "interval {interval}"
        );
    }
}

// =============================================================================
// Contract: Window Resolution
// =============================================================================

#[test]
fn named_period_is_sent_as_a_range() {
    let params = builder()
        .price_params_from_str(Some("1d"), "1d", None, None)
        .expect("valid");
    let spec = RequestSpec::chart(format!("{BASE}chart/AAPL"), &params[0]);

    assert_eq!(spec.param("range"), Some("1d"));
    assert_eq!(spec.param("period1"), None);
}

#[test]
fn max_or_missing_period_spans_epoch_to_now() {
    for period in [Some("max"), None] {
        let params = builder()
            .price_params_from_str(period, "1d", None, None)
            .expect("valid");
        let spec = RequestSpec::chart(format!("{BASE}chart/AAPL"), &params[0]);

        assert_eq!(spec.param("period1"), Some("0"));
        assert_eq!(spec.param("period2"), Some("10"));
        assert_eq!(spec.param("range"), None);
    }
}

#[test]
fn explicit_start_overrides_a_named_period() {
    let start: DateInput = "2024-01-02".parse().expect("valid date");
    let expected_start = start.to_local_epoch().expect("local midnight");

    let params = builder()
        .price_params(Some(Period::OneYear), Interval::OneDay.into(), Some(start), None)
        .expect("valid");

    assert_eq!(
        params[0].window,
        PeriodWindow::Explicit {
            period1: expected_start,
            period2: 10
        }
    );
}

// =============================================================================
// Contract: Validation
// =============================================================================

#[test]
fn every_unknown_period_is_rejected() {
    for period in ["", "2d", "1w", "1M", "MAX", "1year", "0d", " 1d"] {
        let error = builder()
            .price_params_from_str(Some(period), "1d", None, None)
            .expect_err("invalid period");
        assert_eq!(
            error,
            ValidationError::InvalidPeriod {
                value: period.to_owned()
            }
        );
    }
}

#[test]
fn every_unknown_interval_is_rejected() {
    for interval in ["", "4h", "60m", "1M", "ALL", "1y", "weekly", "1d "] {
        let error = builder()
            .price_params_from_str(Some("1mo"), interval, None, None)
            .expect_err("invalid interval");
        assert_eq!(
            error,
            ValidationError::InvalidInterval {
                value: interval.to_owned()
            }
        );
    }
}

#[test]
fn malformed_dates_are_rejected() {
    for date in ["2024/01/02", "02-01-2024", "2024-13-01", "yesterday"] {
        let error = builder()
            .price_params_from_str(None, "1d", Some(date), None)
            .expect_err("invalid date");
        assert!(matches!(error, ValidationError::InvalidDate { .. }), "{date}");
    }
}
