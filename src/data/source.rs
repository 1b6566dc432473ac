use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};

use super::fixtures;
use super::loader;
use super::model::{Announcement, TimeSeries};
use crate::error::EngineError;

// ---------------------------------------------------------------------------
// DatasetId – the five numeric tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatasetId {
    PolicyRates,
    Inflation,
    Liquidity,
    Forex,
    Economy,
}

impl DatasetId {
    pub const ALL: [DatasetId; 5] = [
        DatasetId::PolicyRates,
        DatasetId::Inflation,
        DatasetId::Liquidity,
        DatasetId::Forex,
        DatasetId::Economy,
    ];

    /// Stable identifier, also used as the file stem by [`DirectorySource`].
    pub fn key(&self) -> &'static str {
        match self {
            DatasetId::PolicyRates => "policy_rates",
            DatasetId::Inflation => "inflation",
            DatasetId::Liquidity => "liquidity",
            DatasetId::Forex => "forex",
            DatasetId::Economy => "economy",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DatasetId::PolicyRates => "Policy Rate Overview",
            DatasetId::Inflation => "Inflation Dashboard",
            DatasetId::Liquidity => "Liquidity & Credit",
            DatasetId::Forex => "Forex & RBI Reserves",
            DatasetId::Economy => "Economic Indicators",
        }
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DatasetId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatasetId::ALL
            .into_iter()
            .find(|id| id.key() == s)
            .ok_or_else(|| EngineError::UnknownDataset(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// DataSource capability
// ---------------------------------------------------------------------------

/// Where the dashboard's tables come from.
///
/// The engine only ever sees [`TimeSeries`] values, so swapping the built-in
/// fixtures for files (or a live feed) does not touch the transformation code.
pub trait DataSource {
    /// Human-readable origin, shown in the status bar.
    fn name(&self) -> String;

    /// Version of the data behind this source.
    fn version(&self) -> String;

    fn series(&self, id: DatasetId) -> Result<TimeSeries>;

    fn announcements(&self) -> Result<Vec<Announcement>>;
}

/// The compiled-in sample data.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSource;

impl DataSource for FixtureSource {
    fn name(&self) -> String {
        "built-in sample data".to_string()
    }

    fn version(&self) -> String {
        fixtures::FIXTURE_VERSION.to_string()
    }

    fn series(&self, id: DatasetId) -> Result<TimeSeries> {
        let series = match id {
            DatasetId::PolicyRates => fixtures::policy_rates(),
            DatasetId::Inflation => fixtures::inflation(),
            DatasetId::Liquidity => fixtures::liquidity(),
            DatasetId::Forex => fixtures::forex(),
            DatasetId::Economy => fixtures::economy(),
        };
        Ok(series?)
    }

    fn announcements(&self) -> Result<Vec<Announcement>> {
        Ok(fixtures::announcements())
    }
}

/// A directory of exported tables: `<key>.parquet|csv|json` per dataset and
/// `announcements.json|csv`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    const SERIES_EXTENSIONS: [&'static str; 4] = ["parquet", "pq", "csv", "json"];
    const ANNOUNCEMENT_EXTENSIONS: [&'static str; 2] = ["json", "csv"];

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn find(&self, stem: &str, extensions: &[&str]) -> Result<PathBuf> {
        for ext in extensions {
            let candidate = self.root.join(format!("{stem}.{ext}"));
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        bail!(
            "no {stem}.{{{}}} in {}",
            extensions.join(","),
            self.root.display()
        )
    }
}

impl DataSource for DirectorySource {
    fn name(&self) -> String {
        self.root.display().to_string()
    }

    fn version(&self) -> String {
        // Best effort: a VERSION file next to the tables, otherwise unversioned.
        std::fs::read_to_string(self.root.join("VERSION"))
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|_| "unversioned".to_string())
    }

    fn series(&self, id: DatasetId) -> Result<TimeSeries> {
        let path = self.find(id.key(), &Self::SERIES_EXTENSIONS)?;
        loader::load_series(&path, id.key())
            .with_context(|| format!("loading {id} from {}", path.display()))
    }

    fn announcements(&self) -> Result<Vec<Announcement>> {
        let path = self.find("announcements", &Self::ANNOUNCEMENT_EXTENSIONS)?;
        loader::load_announcements(&path)
            .with_context(|| format!("loading announcements from {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// Catalog – an immutable snapshot of one source
// ---------------------------------------------------------------------------

/// Every table of a [`DataSource`], read once and never mutated.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub source_name: String,
    pub version: String,
    series: BTreeMap<DatasetId, TimeSeries>,
    announcements: Vec<Announcement>,
}

impl Catalog {
    pub fn load(source: &dyn DataSource) -> Result<Self> {
        let mut series = BTreeMap::new();
        for id in DatasetId::ALL {
            let table = source.series(id)?;
            log::debug!("{id}: {} rows, columns {:?}", table.len(), table.columns());
            series.insert(id, table);
        }
        let announcements = source.announcements()?;

        let catalog = Self {
            source_name: source.name(),
            version: source.version(),
            series,
            announcements,
        };
        log::info!(
            "Loaded catalog from {} (version {})",
            catalog.source_name,
            catalog.version
        );
        Ok(catalog)
    }

    pub fn series(&self, id: DatasetId) -> Result<&TimeSeries, EngineError> {
        self.series
            .get(&id)
            .ok_or_else(|| EngineError::UnknownDataset(id.key().to_string()))
    }

    pub fn announcements(&self) -> &[Announcement] {
        &self.announcements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_keys_round_trip_through_from_str() {
        for id in DatasetId::ALL {
            assert_eq!(id.key().parse::<DatasetId>().unwrap(), id);
        }
        assert_eq!(
            "gold".parse::<DatasetId>(),
            Err(EngineError::UnknownDataset("gold".into()))
        );
    }

    #[test]
    fn fixture_catalog_has_every_dataset() {
        let catalog = Catalog::load(&FixtureSource).unwrap();
        assert_eq!(catalog.version, fixtures::FIXTURE_VERSION);
        for id in DatasetId::ALL {
            assert_eq!(catalog.series(id).unwrap().name(), id.key());
        }
        assert_eq!(catalog.announcements().len(), 8);
    }

    #[test]
    fn directory_source_reports_missing_tables() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path());
        let err = source.series(DatasetId::Forex).unwrap_err();
        assert!(format!("{err:#}").contains("forex"));
        assert_eq!(source.version(), "unversioned");
    }
}
