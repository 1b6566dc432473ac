use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by the filter and derivation pipeline.
///
/// None of these are fatal: each is scoped to a single computation and the
/// caller decides how to present it (usually a "no data" placeholder).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("no rows in '{dataset}' match the active filters")]
    EmptyResult { dataset: String },

    #[error("invalid predicate: {0}")]
    InvalidPredicate(String),

    #[error("unknown field '{field}' in dataset '{dataset}'")]
    UnknownField { dataset: String, field: String },

    #[error("unknown dataset '{0}'")]
    UnknownDataset(String),

    #[error("dates in '{dataset}' must be strictly increasing, found {date} after {previous}")]
    UnorderedDates {
        dataset: String,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("row dated {date} in '{dataset}' has no value for '{field}'")]
    MissingField {
        dataset: String,
        date: NaiveDate,
        field: String,
    },

    #[error("row dated {date} in '{dataset}' has a non-finite value for '{field}'")]
    NonFiniteValue {
        dataset: String,
        date: NaiveDate,
        field: String,
    },

    #[error("rolling window must be at least 1, got {0}")]
    InvalidWindow(usize),
}
