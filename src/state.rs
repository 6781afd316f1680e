use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::color::ColorMap;
use crate::config::Args;
use crate::data::cache::LoadCache;
use crate::data::dashboard::Dashboard;
use crate::data::export::{export_to_dir, ExportError};
use crate::data::filter::{DataBounds, DateSelection, FilterState, FilteredView};
use crate::data::model::ListingTable;
use crate::data::preprocess::preprocess;

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Conditions that stop the dashboard short of drawing charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The file could not be loaded; the table is empty.
    LoadFailure(String),
    /// The file loaded but holds no listings.
    NoListings,
    /// The filters exclude every listing.
    NoMatches,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::LoadFailure(msg) => write!(f, "Failed to load data: {msg}"),
            Warning::NoListings => write!(f, "The data file contains no listings."),
            Warning::NoMatches => {
                write!(f, "No listings match the selected filters. Adjust the filters.")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
pub struct AppState {
    pub data_path: PathBuf,
    pub export_dir: PathBuf,
    pub rent_bins: usize,

    cache: LoadCache,

    /// Preprocessed table (empty until a load succeeds).
    pub table: ListingTable,

    /// What the filter controls offer.
    pub bounds: DataBounds,

    /// Current filter selections.
    pub filters: FilterState,

    /// Indices of listings passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Metrics, charts and insight for the visible listings.
    pub dashboard: Option<Dashboard>,

    /// Category colours shared by filters and charts.
    pub color_map: ColorMap,

    pub warning: Option<Warning>,

    /// Outcome of the last user action (export, reload).
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(args: &Args) -> Self {
        Self {
            data_path: args.data.clone(),
            export_dir: args.export_dir.clone(),
            rent_bins: args.bins,
            cache: LoadCache::new(),
            table: ListingTable::empty(),
            bounds: DataBounds::default(),
            filters: FilterState::from_bounds(&DataBounds::default()),
            visible_indices: Vec::new(),
            dashboard: None,
            color_map: ColorMap::default(),
            warning: None,
            status_message: None,
        }
    }

    /// Load (through the cache), preprocess and reset filters to "everything".
    pub fn load(&mut self) {
        let outcome = self.cache.load_or_empty(&self.data_path);
        self.table = preprocess(outcome.table.as_ref().clone());
        self.bounds = DataBounds::from_table(&self.table);
        self.filters = FilterState::from_bounds(&self.bounds);
        self.color_map = ColorMap::new(&self.bounds.categories);

        self.warning = match outcome.failure {
            Some(e) => Some(Warning::LoadFailure(e.to_string())),
            None if self.table.is_empty() => Some(Warning::NoListings),
            None => None,
        };

        if self.warning.is_none() {
            log::info!(
                "Loaded {} listings in {} categories from {}",
                self.table.len(),
                self.bounds.categories.len(),
                self.data_path.display()
            );
            self.refresh();
        } else {
            self.visible_indices.clear();
            self.dashboard = None;
        }
    }

    /// Drop the cached file and load it again.
    pub fn reload(&mut self) {
        self.cache.invalidate(&self.data_path);
        self.load();
        self.status_message = Some(match &self.warning {
            Some(Warning::LoadFailure(msg)) => format!("Reload failed: {msg}"),
            _ => format!("Reloaded {}", self.data_path.display()),
        });
    }

    /// Re-filter and recompute the dashboard after a filter change.
    pub fn refresh(&mut self) {
        if matches!(self.warning, Some(Warning::LoadFailure(_) | Warning::NoListings)) {
            return;
        }

        let view = FilteredView::new(&self.table, &self.filters);
        self.visible_indices = view.indices().to_vec();

        match view.non_empty() {
            Ok(view) => {
                self.dashboard = Some(Dashboard::compute(&view, self.rent_bins));
                self.warning = None;
            }
            Err(e) => {
                log::warn!("{e}");
                self.dashboard = None;
                self.warning = Some(Warning::NoMatches);
            }
        }
    }

    /// The current filtered view.
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView::new(&self.table, &self.filters)
    }

    // -- Filter edits --

    /// Toggle one category in the selection.
    pub fn toggle_category(&mut self, category: &str) {
        if !self.filters.categories.remove(category) {
            self.filters.categories.insert(category.to_string());
        }
        self.refresh();
    }

    pub fn select_all_categories(&mut self) {
        self.filters.categories = self.bounds.categories.iter().cloned().collect();
        self.refresh();
    }

    pub fn select_no_categories(&mut self) {
        self.filters.categories.clear();
        self.refresh();
    }

    pub fn set_floor_range(&mut self, lo: i64, hi: i64) {
        self.filters.floor = ordered(lo, hi);
        self.refresh();
    }

    pub fn set_deposit_range(&mut self, lo: i64, hi: i64) {
        self.filters.deposit = ordered(lo, hi);
        self.refresh();
    }

    pub fn set_dates(&mut self, dates: DateSelection) {
        self.filters.dates = match dates {
            DateSelection::Range(start, end) if end < start => DateSelection::Range(end, start),
            other => other,
        };
        self.refresh();
    }

    // -- Export --

    /// Write the visible listings to the export directory.
    pub fn export(&mut self, today: NaiveDate) -> Result<PathBuf, ExportError> {
        let result = export_to_dir(&self.view(), &self.export_dir, today);
        self.status_message = Some(match &result {
            Ok(path) => format!("Exported {} listings to {}", self.visible_indices.len(), path.display()),
            Err(e) => {
                log::error!("Export failed: {e}");
                format!("Export failed: {e}")
            }
        });
        result
    }
}

fn ordered(a: i64, b: i64) -> (i64, i64) {
    (a.min(b), a.max(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::SAMPLE_JSON;

    fn state_with_sample() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("raw_data.json");
        std::fs::write(&data, SAMPLE_JSON).unwrap();

        let args = Args {
            data,
            export_dir: dir.path().join("out"),
            ..Args::default()
        };
        let mut state = AppState::new(&args);
        state.load();
        (dir, state)
    }

    #[test]
    fn load_selects_everything() {
        let (_dir, state) = state_with_sample();
        assert_eq!(state.warning, None);
        assert_eq!(state.table.len(), 6);
        assert_eq!(state.visible_indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(state.dashboard.as_ref().unwrap().summary.count, 5);
    }

    #[test]
    fn missing_file_is_a_load_failure() {
        let args = Args {
            data: PathBuf::from("no/such/raw_data.json"),
            ..Args::default()
        };
        let mut state = AppState::new(&args);
        state.load();
        assert!(matches!(state.warning, Some(Warning::LoadFailure(_))));
        assert!(state.table.is_empty());
        assert!(state.dashboard.is_none());

        // Filter edits stay on the failure path.
        state.select_all_categories();
        assert!(matches!(state.warning, Some(Warning::LoadFailure(_))));
    }

    #[test]
    fn reload_reports_its_outcome() {
        let (dir, mut state) = state_with_sample();
        state.reload();
        assert!(state.status_message.as_deref().unwrap().starts_with("Reloaded"));

        std::fs::write(dir.path().join("raw_data.json"), "{broken").unwrap();
        state.reload();
        assert!(matches!(state.warning, Some(Warning::LoadFailure(_))));
        assert!(state.status_message.as_deref().unwrap().starts_with("Reload failed"));
    }

    #[test]
    fn deselecting_all_categories_hits_no_data_and_recovers() {
        let (_dir, mut state) = state_with_sample();
        state.select_no_categories();
        assert_eq!(state.warning, Some(Warning::NoMatches));
        assert!(state.dashboard.is_none());
        assert!(state.visible_indices.is_empty());

        state.toggle_category("카페");
        assert_eq!(state.warning, None);
        assert_eq!(state.visible_indices, vec![0, 1]);
    }

    #[test]
    fn ranges_are_normalised() {
        let (_dir, mut state) = state_with_sample();
        state.set_floor_range(3, 2);
        assert_eq!(state.filters.floor, (2, 3));
        assert_eq!(state.visible_indices, vec![1, 3]);

        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        state.set_dates(DateSelection::Range(d(3), d(1)));
        assert_eq!(state.filters.dates, DateSelection::Range(d(1), d(3)));
    }

    #[test]
    fn export_writes_visible_rows() {
        let (dir, mut state) = state_with_sample();
        state.set_deposit_range(2000, 5000);
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let path = state.export(today).unwrap();

        assert!(path.starts_with(dir.path().join("out")));
        let reloaded = crate::data::loader::load_csv(&path).unwrap();
        assert_eq!(reloaded.len(), state.visible_indices.len());
        assert!(state.status_message.unwrap().starts_with("Exported 3"));
    }
}
