use std::collections::BTreeMap;

use rbi_dashboard::EngineError;
use rbi_dashboard::data::filter::FilterState;
use rbi_dashboard::data::source::{Catalog, DataSource, DatasetId, DirectorySource, FixtureSource};
use rbi_dashboard::engine::{self, AnnouncementView, DeriveOptions, SeriesView};
use rbi_dashboard::settings::Settings;

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dataset(DatasetId),
    Announcements,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Dataset(DatasetId::PolicyRates),
        Tab::Dataset(DatasetId::Inflation),
        Tab::Dataset(DatasetId::Liquidity),
        Tab::Dataset(DatasetId::Forex),
        Tab::Dataset(DatasetId::Economy),
        Tab::Announcements,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dataset(id) => id.title(),
            Tab::Announcements => "RBI Announcements",
        }
    }
}

// ---------------------------------------------------------------------------
// Computed views
// ---------------------------------------------------------------------------

/// Output of one recomputation across every tab.
pub struct Views {
    pub series: BTreeMap<DatasetId, Result<SeriesView, EngineError>>,
    pub announcements: Result<AnnouncementView, EngineError>,
}

impl Views {
    fn compute(catalog: &Catalog, filters: &FilterState, options: DeriveOptions) -> Self {
        let series = DatasetId::ALL
            .into_iter()
            .map(|id| {
                let view = catalog
                    .series(id)
                    .and_then(|s| engine::compute(s, filters, options));
                if let Err(e) = &view {
                    log::debug!("{id}: {e}");
                }
                (id, view)
            })
            .collect();
        let announcements = engine::compute_announcements(catalog.announcements(), filters);
        Views {
            series,
            announcements,
        }
    }

    pub fn series(&self, id: DatasetId) -> Option<&Result<SeriesView, EngineError>> {
        self.series.get(&id)
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded tables (None if loading failed).
    pub catalog: Option<Catalog>,

    /// Current filter selection, edited by the side panel.
    pub filters: FilterState,

    /// Rolling window and other derivation settings.
    pub options: DeriveOptions,

    pub active_tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Date window restored by "Reset filters".
    initial_filters: FilterState,

    /// Views for the filter state they were computed from.
    cache: Option<(FilterState, DeriveOptions, Views)>,

    /// Number of recomputations so far.
    pub recomputations: usize,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        let filters = FilterState::new(settings.date_range());
        let mut state = Self {
            catalog: None,
            filters: filters.clone(),
            options: settings.derive_options(),
            active_tab: Tab::ALL[0],
            status_message: None,
            initial_filters: filters,
            cache: None,
            recomputations: 0,
        };

        match &settings.data_dir {
            Some(dir) => state.load_source(&DirectorySource::new(dir)),
            None => state.load_source(&FixtureSource),
        }
        state
    }

    /// Replace the catalog with a snapshot of `source`. On failure the
    /// previous catalog stays active.
    pub fn load_source(&mut self, source: &dyn DataSource) {
        match Catalog::load(source) {
            Ok(catalog) => self.set_catalog(catalog),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", source.name());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = Some(catalog);
        self.cache = None;
        self.status_message = None;
    }

    pub fn reset_filters(&mut self) {
        self.filters = self.initial_filters.clone();
    }

    /// Recompute every view if the filters or options changed since the
    /// last call.
    pub fn refresh(&mut self) {
        let Some(catalog) = &self.catalog else {
            return;
        };
        let fresh = matches!(
            &self.cache,
            Some((filters, options, _)) if *filters == self.filters && *options == self.options
        );
        if fresh {
            return;
        }

        if let Err(e) = self.filters.validate() {
            log::warn!("Filters rejected: {e}");
        }
        let views = Views::compute(catalog, &self.filters, self.options);
        self.recomputations += 1;
        log::debug!("Recomputed views (#{})", self.recomputations);
        self.cache = Some((self.filters.clone(), self.options, views));
    }

    pub fn views(&self) -> Option<&Views> {
        self.cache.as_ref().map(|(_, _, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(&Settings::default())
    }

    #[test]
    fn starts_on_fixture_catalog() {
        let s = state();
        assert!(s.catalog.is_some());
        assert!(s.status_message.is_none());
        assert_eq!(s.active_tab, Tab::Dataset(DatasetId::PolicyRates));
    }

    #[test]
    fn unchanged_filters_reuse_cached_views() {
        let mut s = state();
        s.refresh();
        s.refresh();
        assert_eq!(s.recomputations, 1);

        s.filters.set_range("CPI", 5.0, 5.3);
        s.refresh();
        assert_eq!(s.recomputations, 2);

        s.options.window = 4;
        s.refresh();
        assert_eq!(s.recomputations, 3);
    }

    #[test]
    fn empty_tab_does_not_affect_others() {
        let mut s = state();
        s.filters.set_range("USD/INR", 90.0, 95.0);
        s.refresh();
        let views = s.views().unwrap();
        assert!(matches!(
            views.series(DatasetId::Forex),
            Some(Err(EngineError::EmptyResult { .. }))
        ));
        assert!(matches!(views.series(DatasetId::Inflation), Some(Ok(_))));
    }

    #[test]
    fn failed_load_keeps_previous_catalog() {
        let mut s = state();
        let dir = tempfile::tempdir().unwrap();
        s.load_source(&DirectorySource::new(dir.path()));
        assert!(s.catalog.is_some());
        assert!(s.status_message.as_deref().unwrap_or("").starts_with("Error"));
    }

    #[test]
    fn reset_restores_initial_selection() {
        let mut s = state();
        let initial = s.filters.clone();
        s.filters.set_range("Repo Rate", 6.0, 6.0);
        s.reset_filters();
        assert_eq!(s.filters, initial);
    }
}
