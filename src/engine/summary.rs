use crate::data::model::{TimeSeries, TimeSeriesRow};
use crate::error::EngineError;

/// Latest row plus min / max / mean of one field over a filtered subset.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryAggregate {
    pub field: String,
    pub latest: TimeSeriesRow,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl SummaryAggregate {
    /// The summarized field's value in the latest row.
    pub fn latest_value(&self) -> f64 {
        self.latest.get(&self.field).unwrap_or(f64::NAN)
    }
}

/// Last row in input order, or `EmptyResult`.
pub fn latest(subset: &TimeSeries) -> Result<&TimeSeriesRow, EngineError> {
    subset.rows().last().ok_or_else(|| EngineError::EmptyResult {
        dataset: subset.name().to_string(),
    })
}

/// Min, max and mean of `field` over `subset`.
///
/// A [`TimeSeries`] only holds finite values, so the three aggregates are
/// always finite and agree on which rows they cover.
pub fn summarize(subset: &TimeSeries, field: &str) -> Result<SummaryAggregate, EngineError> {
    let values = subset.values(field)?;
    let latest = latest(subset)?.clone();

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;

    Ok(SummaryAggregate {
        field: field.to_string(),
        latest,
        min,
        max,
        mean,
    })
}

/// Round half away from zero to `places` decimals, for display tables.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
