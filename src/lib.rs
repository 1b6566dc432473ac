//! Range filtering and derived-series engine behind the RBI monetary policy
//! dashboard.
//!
//! The library owns everything that is not rendering: the time series model,
//! the built-in sample fixtures, file loaders, the filter/derive pipeline and
//! the per-tab insights. The `rbi-dashboard` binary is a thin egui front end
//! that feeds a [`data::filter::FilterState`] into [`engine::compute`] and
//! draws the result.

pub mod data;
pub mod engine;
pub mod error;
pub mod settings;

pub use error::EngineError;
