use std::collections::BTreeMap;

use crate::data::model::TimeSeries;
use crate::error::EngineError;

/// Window used by every chart unless configured otherwise.
pub const DEFAULT_WINDOW: usize = 3;

// ---------------------------------------------------------------------------
// Slice-level derivations
// ---------------------------------------------------------------------------

/// Trailing mean over `window` values ending at each position.
///
/// The first `window - 1` entries are `None`.
pub fn rolling_mean(values: &[f64], window: usize) -> Result<Vec<Option<f64>>, EngineError> {
    if window == 0 {
        return Err(EngineError::InvalidWindow(window));
    }
    // Each window is summed afresh so a NaN only poisons the windows it is in.
    let out = (0..values.len())
        .map(|i| {
            (i + 1 >= window).then(|| {
                values[i + 1 - window..=i].iter().sum::<f64>() / window as f64
            })
        })
        .collect();
    Ok(out)
}

/// `None`, then `v[i] - v[i-1]`. Differences that are not finite are `None`.
pub fn delta(values: &[f64]) -> Vec<Option<f64>> {
    std::iter::once(None)
        .chain(values.windows(2).map(|w| Some(w[1] - w[0]).filter(|d| d.is_finite())))
        .take(values.len())
        .collect()
}

/// `None`, then `(v[i] - v[i-1]) / v[i-1] * 100`.
///
/// An entry whose quotient is not finite (a zero or subnormal prior value, or
/// a NaN on either side) is `None`, so callers render it as "n/a".
pub fn percent_change(values: &[f64]) -> Vec<Option<f64>> {
    std::iter::once(None)
        .chain(values.windows(2).map(|w| {
            if w[0] == 0.0 {
                None
            } else {
                Some((w[1] - w[0]) / w[0] * 100.0).filter(|p| p.is_finite())
            }
        }))
        .take(values.len())
        .collect()
}

// ---------------------------------------------------------------------------
// Series-level derivations
// ---------------------------------------------------------------------------

pub fn derive_rolling(
    subset: &TimeSeries,
    field: &str,
    window: usize,
) -> Result<Vec<Option<f64>>, EngineError> {
    rolling_mean(&subset.values(field)?, window)
}

pub fn derive_delta(subset: &TimeSeries, field: &str) -> Result<Vec<Option<f64>>, EngineError> {
    Ok(delta(&subset.values(field)?))
}

pub fn derive_percent_change(
    subset: &TimeSeries,
    field: &str,
) -> Result<Vec<Option<f64>>, EngineError> {
    let values = subset.values(field)?;
    let out = percent_change(&values);
    let undefined = out.iter().skip(1).filter(|v| v.is_none()).count();
    if undefined > 0 {
        log::warn!(
            "{}/{field}: {undefined} percentage change(s) undefined",
            subset.name()
        );
    }
    Ok(out)
}

/// Derived columns for one field, aligned row-for-row with the subset.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedColumns {
    pub rolling_mean: Vec<Option<f64>>,
    pub delta: Vec<Option<f64>>,
    pub pct_change: Vec<Option<f64>>,
}

/// A filtered subset's derived columns, keyed by field name.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSeries {
    pub window: usize,
    pub columns: BTreeMap<String, DerivedColumns>,
}

impl DerivedSeries {
    /// Derive every column of `subset`.
    pub fn compute(subset: &TimeSeries, window: usize) -> Result<Self, EngineError> {
        let mut columns = BTreeMap::new();
        for field in subset.columns() {
            let derived = DerivedColumns {
                rolling_mean: derive_rolling(subset, field, window)?,
                delta: derive_delta(subset, field)?,
                pct_change: derive_percent_change(subset, field)?,
            };
            columns.insert(field.clone(), derived);
        }
        Ok(Self { window, columns })
    }

    pub fn get(&self, field: &str) -> Option<&DerivedColumns> {
        self.columns.get(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn round3(v: Option<f64>) -> Option<f64> {
        v.map(|x| (x * 1000.0).round() / 1000.0)
    }

    #[test]
    fn cpi_rolling_mean_window_three() {
        let cpi = [5.0, 5.1, 5.2, 5.0, 5.3];
        let out: Vec<_> = rolling_mean(&cpi, 3).unwrap().into_iter().map(round3).collect();
        assert_eq!(out, vec![None, None, Some(5.1), Some(5.1), Some(5.167)]);
    }

    #[test]
    fn rolling_window_longer_than_series_is_all_undefined() {
        assert_eq!(rolling_mean(&[1.0, 2.0], 3).unwrap(), vec![None, None]);
    }

    #[test]
    fn rolling_window_of_one_is_identity() {
        let v = [1.5, 2.5, -3.0];
        let out = rolling_mean(&v, 1).unwrap();
        assert_eq!(out, vec![Some(1.5), Some(2.5), Some(-3.0)]);
    }

    #[test]
    fn zero_window_is_rejected() {
        assert_eq!(rolling_mean(&[1.0], 0), Err(EngineError::InvalidWindow(0)));
    }

    #[test]
    fn delta_starts_undefined() {
        let out = delta(&[5.0, 5.1, 5.0]);
        assert_eq!(out[0], None);
        assert_relative_eq!(out[1].unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(out[2].unwrap(), -0.1, epsilon = 1e-12);
    }

    #[test]
    fn derivations_of_empty_input_are_empty() {
        assert!(delta(&[]).is_empty());
        assert!(percent_change(&[]).is_empty());
        assert!(rolling_mean(&[], 3).unwrap().is_empty());
    }

    #[test]
    fn percent_change_after_zero_is_undefined() {
        let out = percent_change(&[100.0, 0.0, 50.0]);
        assert_eq!(out, vec![None, Some(-100.0), None]);
    }

    #[test]
    fn percent_change_is_never_infinite_or_nan() {
        assert_eq!(percent_change(&[1e-320, 1.0]), vec![None, None]);
        assert_eq!(percent_change(&[f64::NAN, 1.0]), vec![None, None]);
        assert_eq!(percent_change(&[1.0, f64::NAN]), vec![None, None]);
    }

    #[test]
    fn delta_of_nan_is_undefined() {
        assert_eq!(delta(&[1.0, f64::NAN, 3.0]), vec![None, None, None]);
        assert_eq!(delta(&[f64::MAX, -f64::MAX]), vec![None, None]);
    }

    #[test]
    fn nan_poisons_only_the_windows_containing_it() {
        let out = rolling_mean(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2).unwrap();
        assert_eq!(out[0], None);
        assert!(out[1].unwrap().is_nan());
        assert!(out[2].unwrap().is_nan());
        assert_eq!(&out[3..], &[Some(3.5), Some(4.5)]);
    }

    #[test]
    fn percent_change_of_gdp() {
        let out = percent_change(&[6.0, 5.9]);
        assert_relative_eq!(out[1].unwrap(), -1.666_666_666, epsilon = 1e-6);
    }
}
