use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// TimeSeriesRow – one observed period
// ---------------------------------------------------------------------------

/// A single observation: the period's date plus one value per metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRow {
    pub date: NaiveDate,
    pub fields: BTreeMap<String, f64>,
}

impl TimeSeriesRow {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style insert, handy for fixtures and tests.
    pub fn with(mut self, field: &str, value: f64) -> Self {
        self.fields.insert(field.to_string(), value);
        self
    }

    pub fn get(&self, field: &str) -> Option<f64> {
        self.fields.get(field).copied()
    }
}

// ---------------------------------------------------------------------------
// TimeSeries – an ordered, validated table of rows
// ---------------------------------------------------------------------------

/// A named table of rows ordered by strictly increasing date.
///
/// Construction goes through [`TimeSeries::new`], which checks date order,
/// that every row carries every column, and that every value is finite, so
/// downstream code can index fields and aggregate without re-validating.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    name: String,
    columns: Vec<String>,
    rows: Vec<TimeSeriesRow>,
}

impl TimeSeries {
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<TimeSeriesRow>,
    ) -> Result<Self, EngineError> {
        let name = name.into();

        for pair in rows.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(EngineError::UnorderedDates {
                    dataset: name,
                    previous: pair[0].date,
                    date: pair[1].date,
                });
            }
        }

        for row in &rows {
            if let Some(missing) = columns.iter().find(|c| !row.fields.contains_key(*c)) {
                return Err(EngineError::MissingField {
                    dataset: name,
                    date: row.date,
                    field: missing.clone(),
                });
            }
            // Every stored value is finite.
            if let Some((field, _)) = row.fields.iter().find(|(_, v)| !v.is_finite()) {
                return Err(EngineError::NonFiniteValue {
                    dataset: name,
                    date: row.date,
                    field: field.clone(),
                });
            }
        }

        Ok(Self {
            name,
            columns,
            rows,
        })
    }

    /// Build a series from a date axis and column vectors of equal length.
    pub fn from_columns(
        name: impl Into<String>,
        dates: &[NaiveDate],
        columns: Vec<(&str, Vec<f64>)>,
    ) -> Result<Self, EngineError> {
        let name = name.into();
        let mut rows: Vec<TimeSeriesRow> = dates.iter().map(|&d| TimeSeriesRow::new(d)).collect();

        for (col, values) in &columns {
            for (i, row) in rows.iter_mut().enumerate() {
                // A short column leaves the field unset; `new` reports it.
                if let Some(&v) = values.get(i) {
                    row.fields.insert(col.to_string(), v);
                }
            }
        }

        let names = columns.iter().map(|(c, _)| c.to_string()).collect();
        Self::new(name, names, rows)
    }

    /// A series with the same name and schema but a different set of rows.
    ///
    /// Callers pass rows taken from `self`, so the invariants already hold.
    pub(crate) fn with_rows(&self, rows: Vec<TimeSeriesRow>) -> Self {
        Self {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[TimeSeriesRow] {
        &self.rows
    }

    pub fn has_column(&self, field: &str) -> bool {
        self.columns.iter().any(|c| c == field)
    }

    /// All values of one column, in row order.
    pub fn values(&self, field: &str) -> Result<Vec<f64>, EngineError> {
        if !self.has_column(field) {
            return Err(EngineError::UnknownField {
                dataset: self.name.clone(),
                field: field.to_string(),
            });
        }
        Ok(self
            .rows
            .iter()
            .map(|r| r.get(field).unwrap_or(f64::NAN))
            .collect())
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the series has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Announcements – the one categorical dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Policy Rate")]
    PolicyRate,
    Liquidity,
    Regulatory,
    Banking,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::PolicyRate,
        Category::Liquidity,
        Category::Regulatory,
        Category::Banking,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::PolicyRate => "Policy Rate",
            Category::Liquidity => "Liquidity",
            Category::Regulatory => "Regulatory",
            Category::Banking => "Banking",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    Increase,
    Decrease,
    Positive,
    Neutral,
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Impact::Increase => "Increase",
            Impact::Decrease => "Decrease",
            Impact::Positive => "Positive",
            Impact::Neutral => "Neutral",
        };
        f.write_str(s)
    }
}

/// A dated policy announcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub date: NaiveDate,
    pub category: Category,
    pub text: String,
    pub impact: Impact,
}
