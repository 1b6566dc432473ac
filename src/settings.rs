use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::data::filter::DateRange;
use crate::engine::DeriveOptions;
use crate::engine::transform::DEFAULT_WINDOW;

/// File stem looked up in the working directory (`rbi-dashboard.toml`).
pub const SETTINGS_FILE: &str = "rbi-dashboard";

/// Prefix of environment overrides, e.g. `RBI_DASHBOARD_ROLLING_WINDOW=6`.
pub const ENV_PREFIX: &str = "RBI_DASHBOARD";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Settings validation error: {0}")]
    Validation(String),
}

/// Dashboard settings. Every key is optional; missing keys take the defaults
/// below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Trailing window of the rolling-mean columns.
    pub rolling_window: usize,
    /// Initial date filter.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Load tables from this directory instead of the built-in fixtures.
    pub data_dir: Option<PathBuf>,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rolling_window: DEFAULT_WINDOW,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default(),
            data_dir: None,
            window_width: 1280.0,
            window_height: 860.0,
        }
    }
}

impl Settings {
    /// Load `rbi-dashboard.toml` (if present) and `RBI_DASHBOARD_*` variables.
    pub fn load() -> Result<Self, SettingsError> {
        let builder = ::config::Config::builder()
            .add_source(::config::File::with_name(SETTINGS_FILE).required(false))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        let settings: Settings = builder.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from an explicit file, still honouring environment overrides.
    pub fn load_from(path: &std::path::Path) -> Result<Self, SettingsError> {
        let builder = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        let settings: Settings = builder.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.rolling_window == 0 {
            return Err(SettingsError::Validation(
                "rolling_window must be at least 1".to_string(),
            ));
        }
        if self.start_date > self.end_date {
            return Err(SettingsError::Validation(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            )));
        }
        Ok(())
    }

    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    pub fn derive_options(&self) -> DeriveOptions {
        DeriveOptions {
            window: self.rolling_window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_sample_year() {
        let s = Settings::default();
        assert_eq!(s.rolling_window, 3);
        assert_eq!(s.date_range().start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert!(s.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "rolling_window = 6").unwrap();
        writeln!(f, "start_date = \"2023-04-01\"").unwrap();
        drop(f);

        let s = Settings::load_from(&path).unwrap();
        assert_eq!(s.rolling_window, 6);
        assert_eq!(s.start_date, NaiveDate::from_ymd_opt(2023, 4, 1).unwrap());
        assert_eq!(s.end_date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(s.data_dir, None);
    }

    #[test]
    fn zero_window_fails_validation() {
        let s = Settings {
            rolling_window: 0,
            ..Settings::default()
        };
        assert!(matches!(s.validate(), Err(SettingsError::Validation(_))));
    }

    #[test]
    fn inverted_dates_fail_validation() {
        let s = Settings {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            ..Settings::default()
        };
        assert!(s.validate().is_err());
    }
}
