use chrono::NaiveDate;

use super::model::{Announcement, Category, TimeSeries};
use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Inclusive `[min, max]` bound on one numeric field.
#[derive(Debug, Clone, PartialEq)]
pub struct RangePredicate {
    pub field: String,
    pub min: f64,
    pub max: f64,
}

impl RangePredicate {
    pub fn new(field: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            field: field.into(),
            min,
            max,
        }
    }

    /// Reject NaN bounds and `min > max`.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.min.is_nan() || self.max.is_nan() {
            return Err(EngineError::InvalidPredicate(format!(
                "bounds on '{}' must be numbers",
                self.field
            )));
        }
        if self.min > self.max {
            return Err(EngineError::InvalidPredicate(format!(
                "'{}' minimum {} is greater than maximum {}",
                self.field, self.min, self.max
            )));
        }
        Ok(())
    }

    /// NaN never matches.
    pub fn matches(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Inclusive `[start, end]` date bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.start > self.end {
            return Err(EngineError::InvalidPredicate(format!(
                "start date {} is after end date {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The announcements tab's categorical selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategorySelector {
    #[default]
    All,
    Only(Category),
}

impl CategorySelector {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategorySelector::All => true,
            CategorySelector::Only(c) => *c == category,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategorySelector::All => "All",
            CategorySelector::Only(c) => c.label(),
        }
    }
}

// ---------------------------------------------------------------------------
// Slider layout: UI bounds for each filterable field
// ---------------------------------------------------------------------------

/// Outer bounds and step of the widget that edits one predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderSpec {
    pub field: &'static str,
    pub label: &'static str,
    pub lower: f64,
    pub upper: f64,
    pub step: f64,
    /// Initial `(min, max)` selection.
    pub default: (f64, f64),
}

/// Every range slider of the dashboard, grouped in tab order.
#[rustfmt::skip]
pub const SLIDERS: &[SliderSpec] = &[
    SliderSpec { field: "Repo Rate", label: "Repo Rate Range (%)", lower: 0.0, upper: 15.0, step: 0.25, default: (5.0, 8.0) },
    SliderSpec { field: "Reverse Repo Rate", label: "Reverse Repo Rate Range (%)", lower: 0.0, upper: 15.0, step: 0.25, default: (5.0, 8.0) },
    SliderSpec { field: "CPI", label: "CPI Range (%)", lower: 0.0, upper: 15.0, step: 0.1, default: (0.0, 10.0) },
    SliderSpec { field: "WPI", label: "WPI Range (%)", lower: 0.0, upper: 15.0, step: 0.1, default: (0.0, 10.0) },
    SliderSpec { field: "Food Inflation", label: "Food Inflation (%)", lower: 0.0, upper: 15.0, step: 0.1, default: (0.0, 10.0) },
    SliderSpec { field: "Credit Growth (%)", label: "Credit Growth (%)", lower: 0.0, upper: 20.0, step: 0.1, default: (0.0, 10.0) },
    SliderSpec { field: "Liquidity (₹ Cr)", label: "Liquidity (₹ Cr)", lower: 0.0, upper: 1_000_000.0, step: 10_000.0, default: (0.0, 1_000_000.0) },
    SliderSpec { field: "Forex Reserves (USD bn)", label: "Forex Reserves (USD bn)", lower: 0.0, upper: 1000.0, step: 5.0, default: (0.0, 1000.0) },
    SliderSpec { field: "USD/INR", label: "USD/INR Rate", lower: 50.0, upper: 100.0, step: 0.1, default: (70.0, 80.0) },
    SliderSpec { field: "GDP Growth (%)", label: "GDP Growth (%)", lower: 0.0, upper: 15.0, step: 0.1, default: (0.0, 10.0) },
    SliderSpec { field: "IIP (%)", label: "IIP (%)", lower: -10.0, upper: 20.0, step: 0.1, default: (0.0, 10.0) },
];

// ---------------------------------------------------------------------------
// FilterState – every user-controlled input to a recomputation
// ---------------------------------------------------------------------------

/// All filter inputs for one recomputation.
///
/// Passed by value into the engine; compared structurally to decide whether
/// a cached view is still valid.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub dates: DateRange,
    pub ranges: Vec<RangePredicate>,
    pub category: CategorySelector,
}

impl FilterState {
    /// Default selection: the given date window plus each slider's default.
    pub fn new(dates: DateRange) -> Self {
        let ranges = SLIDERS
            .iter()
            .map(|s| RangePredicate::new(s.field, s.default.0, s.default.1))
            .collect();
        Self {
            dates,
            ranges,
            category: CategorySelector::All,
        }
    }

    pub fn range(&self, field: &str) -> Option<&RangePredicate> {
        self.ranges.iter().find(|r| r.field == field)
    }

    pub fn range_mut(&mut self, field: &str) -> Option<&mut RangePredicate> {
        self.ranges.iter_mut().find(|r| r.field == field)
    }

    /// Replace the predicate on `field`, or add one.
    pub fn set_range(&mut self, field: &str, min: f64, max: f64) {
        match self.range_mut(field) {
            Some(r) => {
                r.min = min;
                r.max = max;
            }
            None => self.ranges.push(RangePredicate::new(field, min, max)),
        }
    }

    /// Predicates that apply to `series`: those on columns it actually has.
    pub fn predicates_for(&self, series: &TimeSeries) -> Vec<RangePredicate> {
        self.ranges
            .iter()
            .filter(|r| series.has_column(&r.field))
            .cloned()
            .collect()
    }

    /// Validate every predicate, including ones no dataset will use.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.dates.validate()?;
        self.ranges.iter().try_for_each(RangePredicate::validate)
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of rows that satisfy the date range and every predicate.
///
/// Predicates are validated first, and every predicate field must be a
/// column of `series`.
pub fn filtered_indices(
    series: &TimeSeries,
    dates: &DateRange,
    predicates: &[RangePredicate],
) -> Result<Vec<usize>, EngineError> {
    dates.validate()?;
    for p in predicates {
        p.validate()?;
        if !series.has_column(&p.field) {
            return Err(EngineError::UnknownField {
                dataset: series.name().to_string(),
                field: p.field.clone(),
            });
        }
    }

    Ok(series
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            dates.contains(row.date)
                && predicates
                    .iter()
                    .all(|p| row.get(&p.field).is_some_and(|v| p.matches(v)))
        })
        .map(|(i, _)| i)
        .collect())
}

/// Order-preserving subset of `series`. An empty result is not an error.
pub fn filter(
    series: &TimeSeries,
    dates: &DateRange,
    predicates: &[RangePredicate],
) -> Result<TimeSeries, EngineError> {
    let indices = filtered_indices(series, dates, predicates)?;
    let rows = indices.iter().map(|&i| series.rows()[i].clone()).collect();
    Ok(series.with_rows(rows))
}

/// Announcements inside the date range and matching the category selector.
pub fn filter_announcements(
    items: &[Announcement],
    dates: &DateRange,
    category: CategorySelector,
) -> Result<Vec<Announcement>, EngineError> {
    dates.validate()?;
    Ok(items
        .iter()
        .filter(|a| dates.contains(a.date) && category.matches(a.category))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    fn year_2023() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        )
    }

    #[test]
    fn repo_rate_band_keeps_matching_rows_in_order() {
        let rates = fixtures::policy_rates().unwrap();
        let preds = vec![RangePredicate::new("Repo Rate", 6.5, 7.0)];
        let subset = filter(&rates, &year_2023(), &preds).unwrap();
        assert_eq!(
            subset.values("Repo Rate").unwrap(),
            vec![6.5, 6.5, 6.75, 6.75, 7.0, 7.0]
        );
        let dates = subset.dates();
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn bounds_are_inclusive() {
        let p = RangePredicate::new("x", 1.0, 2.0);
        assert!(p.matches(1.0));
        assert!(p.matches(2.0));
        assert!(!p.matches(2.0001));
        assert!(!p.matches(f64::NAN));
    }

    #[test]
    fn inverted_bounds_are_rejected_before_filtering() {
        let rates = fixtures::policy_rates().unwrap();
        let preds = vec![RangePredicate::new("Repo Rate", 7.0, 6.0)];
        let err = filter(&rates, &year_2023(), &preds).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPredicate(_)));
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let rates = fixtures::policy_rates().unwrap();
        let dates = DateRange::new(
            NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        );
        let err = filter(&rates, &dates, &[]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPredicate(_)));
    }

    #[test]
    fn predicate_on_missing_column_is_unknown_field() {
        let rates = fixtures::policy_rates().unwrap();
        let preds = vec![RangePredicate::new("CPI", 0.0, 10.0)];
        let err = filter(&rates, &year_2023(), &preds).unwrap_err();
        assert!(matches!(err, EngineError::UnknownField { .. }));
    }

    #[test]
    fn date_range_with_no_rows_gives_empty_series() {
        let rates = fixtures::policy_rates().unwrap();
        let dates = DateRange::new(
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
        );
        let subset = filter(&rates, &dates, &[]).unwrap();
        assert!(subset.is_empty());
        assert_eq!(subset.columns(), rates.columns());
    }

    #[test]
    fn predicates_for_skips_other_tabs() {
        let state = FilterState::new(year_2023());
        let preds = state.predicates_for(&fixtures::forex().unwrap());
        let fields: Vec<_> = preds.iter().map(|p| p.field.as_str()).collect();
        assert_eq!(fields, vec!["Forex Reserves (USD bn)", "USD/INR"]);
    }

    #[test]
    fn set_range_updates_in_place() {
        let mut state = FilterState::new(year_2023());
        let before = state.ranges.len();
        state.set_range("CPI", 5.0, 5.2);
        assert_eq!(state.ranges.len(), before);
        assert_eq!(state.range("CPI"), Some(&RangePredicate::new("CPI", 5.0, 5.2)));
    }

    #[test]
    fn announcements_filter_by_category_and_date() {
        let items = fixtures::announcements();
        let only_policy =
            filter_announcements(&items, &year_2023(), CategorySelector::Only(Category::PolicyRate))
                .unwrap();
        assert_eq!(only_policy.len(), 3);
        assert!(only_policy.iter().all(|a| a.category == Category::PolicyRate));

        let all = filter_announcements(&items, &year_2023(), CategorySelector::All).unwrap();
        assert_eq!(all.len(), items.len());
    }
}
