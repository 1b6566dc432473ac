//! Filter-and-derive pipeline.
//!
//! ```text
//!  TimeSeries + FilterState
//!        │
//!        ▼
//!   filter (date + per-field ranges)   → subset
//!        │
//!        ├─► derive (rolling / delta / %)  → DerivedSeries
//!        └─► summary (latest, min, max, mean)
//!        │
//!        ▼
//!   SeriesView  ──►  insights (KPI cards, trend labels)
//! ```
//!
//! Every call recomputes from the immutable source series; nothing here
//! caches or mutates shared state.

pub mod insights;
pub mod summary;
pub mod transform;

use std::collections::BTreeMap;

use crate::data::filter::{FilterState, filter, filter_announcements};
use crate::data::model::{Announcement, Category, TimeSeries};
use crate::error::EngineError;

use self::summary::{SummaryAggregate, summarize};
use self::transform::{DEFAULT_WINDOW, DerivedSeries};

pub use self::summary::latest;
pub use self::transform::{
    delta, derive_delta, derive_percent_change, derive_rolling, percent_change, rolling_mean,
};

/// Tunables of a recomputation that are not user filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeriveOptions {
    pub window: usize,
}

impl Default for DeriveOptions {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
        }
    }
}

/// Everything a tab renders for one numeric dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesView {
    pub subset: TimeSeries,
    pub derived: DerivedSeries,
    pub summaries: BTreeMap<String, SummaryAggregate>,
}

impl SeriesView {
    pub fn summary(&self, field: &str) -> Option<&SummaryAggregate> {
        self.summaries.get(field)
    }
}

/// Filter `series` with the predicates that apply to it, then derive and
/// summarize every column.
///
/// Fails with `EmptyResult` when no row survives the filters.
pub fn compute(
    series: &TimeSeries,
    filters: &FilterState,
    options: DeriveOptions,
) -> Result<SeriesView, EngineError> {
    let predicates = filters.predicates_for(series);
    let subset = filter(series, &filters.dates, &predicates)?;
    log::debug!(
        "{}: {} of {} rows pass {} predicate(s)",
        series.name(),
        subset.len(),
        series.len(),
        predicates.len()
    );

    if subset.is_empty() {
        return Err(EngineError::EmptyResult {
            dataset: series.name().to_string(),
        });
    }

    let derived = DerivedSeries::compute(&subset, options.window)?;
    let summaries = subset
        .columns()
        .iter()
        .map(|field| Ok((field.clone(), summarize(&subset, field)?)))
        .collect::<Result<BTreeMap<_, _>, EngineError>>()?;

    Ok(SeriesView {
        subset,
        derived,
        summaries,
    })
}

/// The announcements tab: filtered feed plus headline counts.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnouncementView {
    pub items: Vec<Announcement>,
    pub total: usize,
    pub policy_rate_updates: usize,
    pub liquidity_measures: usize,
}

/// Apply the date range and category selector. An empty feed is valid.
pub fn compute_announcements(
    items: &[Announcement],
    filters: &FilterState,
) -> Result<AnnouncementView, EngineError> {
    let items = filter_announcements(items, &filters.dates, filters.category)?;
    let count = |c: Category| items.iter().filter(|a| a.category == c).count();
    Ok(AnnouncementView {
        total: items.len(),
        policy_rate_updates: count(Category::PolicyRate),
        liquidity_measures: count(Category::Liquidity),
        items,
    })
}
