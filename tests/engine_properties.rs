use approx::assert_relative_eq;
use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use rbi_dashboard::EngineError;
use rbi_dashboard::data::filter::{DateRange, FilterState, RangePredicate, filter, filtered_indices};
use rbi_dashboard::data::fixtures;
use rbi_dashboard::data::model::{TimeSeries, TimeSeriesRow};
use rbi_dashboard::engine::summary::summarize;
use rbi_dashboard::engine::{DeriveOptions, compute, percent_change, rolling_mean};

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + Days::new(offset)
}

/// A single-column series `x` on consecutive days.
fn series_of(values: &[f64]) -> TimeSeries {
    let rows = values
        .iter()
        .enumerate()
        .map(|(i, v)| TimeSeriesRow::new(day(i as u64)).with("x", *v))
        .collect();
    TimeSeries::new("prop", vec!["x".to_string()], rows).unwrap()
}

fn everything() -> DateRange {
    DateRange::new(day(0), day(10_000))
}

proptest! {
    #[test]
    fn filter_is_a_faithful_ordered_subset(
        values in prop::collection::vec(-100.0f64..100.0, 0..40),
        a in -120.0f64..120.0,
        b in -120.0f64..120.0,
    ) {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        let series = series_of(&values);
        let preds = vec![RangePredicate::new("x", min, max)];
        let subset = filter(&series, &everything(), &preds).unwrap();

        // Every kept row satisfies the predicate.
        for row in subset.rows() {
            let v = row.get("x").unwrap();
            prop_assert!(min <= v && v <= max);
        }
        // Every dropped row violates it.
        let kept = filtered_indices(&series, &everything(), &preds).unwrap();
        for (i, row) in series.rows().iter().enumerate() {
            let v = row.get("x").unwrap();
            prop_assert_eq!(kept.contains(&i), min <= v && v <= max);
        }
        // Order is preserved.
        prop_assert!(kept.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(subset.dates().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn filter_is_idempotent(
        values in prop::collection::vec(-100.0f64..100.0, 0..40),
        min in -100.0f64..0.0,
        max in 0.0f64..100.0,
        start in 0u64..20,
        len in 0u64..30,
    ) {
        let series = series_of(&values);
        let dates = DateRange::new(day(start), day(start + len));
        let preds = vec![RangePredicate::new("x", min, max)];
        let once = filter(&series, &dates, &preds).unwrap();
        let twice = filter(&once, &dates, &preds).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn rolling_mean_has_window_minus_one_leading_gaps(
        values in prop::collection::vec(-100.0f64..100.0, 1..40),
        window in 1usize..10,
    ) {
        let out = rolling_mean(&values, window).unwrap();
        prop_assert_eq!(out.len(), values.len());
        let gaps = out.iter().take_while(|v| v.is_none()).count();
        if values.len() >= window {
            prop_assert_eq!(gaps, window - 1);
            prop_assert!(out[window - 1..].iter().all(Option::is_some));
        } else {
            prop_assert_eq!(gaps, values.len());
        }
    }

    #[test]
    fn single_row_summary_collapses(v in -1e6f64..1e6) {
        let s = summarize(&series_of(&[v]), "x").unwrap();
        prop_assert_eq!(s.min, v);
        prop_assert_eq!(s.max, v);
        prop_assert_eq!(s.mean, v);
        prop_assert_eq!(s.latest_value(), v);
    }

    #[test]
    fn inverted_bounds_are_always_rejected(
        values in prop::collection::vec(-100.0f64..100.0, 0..10),
        min in 0.0f64..100.0,
        gap in 0.001f64..50.0,
    ) {
        let preds = vec![RangePredicate::new("x", min, min - gap)];
        let err = filter(&series_of(&values), &everything(), &preds).unwrap_err();
        prop_assert!(matches!(err, EngineError::InvalidPredicate(_)));
    }
}

// ---------------------------------------------------------------------------
// Worked examples on the sample data
// ---------------------------------------------------------------------------

#[test]
fn cpi_three_month_rolling_mean() {
    let out = rolling_mean(&[5.0, 5.1, 5.2, 5.0, 5.3], 3).unwrap();
    assert_eq!(out[0], None);
    assert_eq!(out[1], None);
    assert_relative_eq!(out[2].unwrap(), 5.1, epsilon = 1e-9);
    assert_relative_eq!(out[3].unwrap(), 5.1, epsilon = 1e-9);
    assert_relative_eq!(out[4].unwrap(), 5.166_666_666, epsilon = 1e-6);
}

#[test]
fn repo_rate_band() {
    let rates = fixtures::policy_rates().unwrap();
    let preds = vec![RangePredicate::new("Repo Rate", 6.5, 7.0)];
    let subset = filter(
        &rates,
        &DateRange::new(day(0), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()),
        &preds,
    )
    .unwrap();
    assert_eq!(
        subset.values("Repo Rate").unwrap(),
        vec![6.5, 6.5, 6.75, 6.75, 7.0, 7.0]
    );
}

#[test]
fn zero_row_range_cannot_be_summarized() {
    let rates = fixtures::policy_rates().unwrap();
    let dates = DateRange::new(
        NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2021, 12, 31).unwrap(),
    );
    let subset = filter(&rates, &dates, &[]).unwrap();
    assert!(matches!(
        summarize(&subset, "Repo Rate"),
        Err(EngineError::EmptyResult { .. })
    ));
    assert!(matches!(
        compute(&rates, &FilterState::new(dates), DeriveOptions::default()),
        Err(EngineError::EmptyResult { .. })
    ));
}

#[test]
fn percent_change_after_zero_is_undefined() {
    assert_eq!(
        percent_change(&[100.0, 0.0, 50.0]),
        vec![None, Some(-100.0), None]
    );
}
