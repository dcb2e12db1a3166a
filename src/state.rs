use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::aggregate::{Aggregates, DashboardView};
use crate::data::cache::DatasetCache;
use crate::data::filter::{filtered_indices, init_filter_state, DateRange, FilterState};
use crate::data::model::{MatchRecord, MatchTable, Season};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Outcome of the most recent load attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    NotLoaded,
    Loaded(PathBuf),
    /// Loading failed; the message is shown and nothing else is rendered.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    SeasonOverview,
    TeamAnalysis,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    cache: DatasetCache,

    /// Loaded table (None until a file loads successfully).
    pub dataset: Option<Arc<MatchTable>>,

    pub load_status: LoadStatus,

    /// Season / team / date selections.
    pub filters: FilterState,

    /// Indices of matches passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Chart series for the visible matches, or the empty signal.
    pub view: DashboardView,

    /// Stable team colours for the loaded table.
    pub team_colors: Option<ColorMap>,

    pub active_tab: Tab,

    /// Transient status line (export results).
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cache: DatasetCache::new(),
            dataset: None,
            load_status: LoadStatus::NotLoaded,
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            view: DashboardView::Empty,
            team_colors: None,
            active_tab: Tab::SeasonOverview,
            status_message: None,
        }
    }

    /// Load (or fetch from cache) the table at `path` and reset the filters.
    pub fn load(&mut self, path: &Path) {
        match self.cache.get_or_load(path) {
            Ok(table) => {
                log::debug!(
                    "dataset cache: {} entries, {} hit(s), {} miss(es)",
                    self.cache.len(),
                    self.cache.hits(),
                    self.cache.misses()
                );
                self.set_dataset(table, path);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.dataset = None;
                self.visible_indices.clear();
                self.view = DashboardView::Empty;
                self.team_colors = None;
                self.load_status =
                    LoadStatus::Failed(format!("Could not load {}: {e}", path.display()));
            }
        }
    }

    /// Ingest a loaded table, initialise filters and colours.
    pub fn set_dataset(&mut self, table: Arc<MatchTable>, path: &Path) {
        self.filters = init_filter_state(&table, self.config.recent_seasons);
        self.team_colors = Some(ColorMap::new(&table.teams));
        self.dataset = Some(table);
        self.load_status = LoadStatus::Loaded(path.to_path_buf());
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible_indices` and the chart series after a filter change.
    pub fn refilter(&mut self) {
        let Some(table) = &self.dataset else {
            return;
        };
        self.visible_indices = filtered_indices(table, &self.filters);
        let visible: Vec<&MatchRecord> = self
            .visible_indices
            .iter()
            .map(|&i| &table.matches[i])
            .collect();
        self.view = DashboardView::build(&visible, self.config.top_n);
        log::debug!(
            "{} of {} matches visible",
            self.visible_indices.len(),
            table.len()
        );
    }

    pub fn toggle_season(&mut self, season: &Season) {
        if !self.filters.seasons.remove(season) {
            self.filters.seasons.insert(season.clone());
        }
        self.refilter();
    }

    pub fn toggle_team(&mut self, team: &str) {
        if !self.filters.teams.remove(team) {
            self.filters.teams.insert(team.to_string());
        }
        self.refilter();
    }

    pub fn select_all_seasons(&mut self) {
        if let Some(table) = &self.dataset {
            self.filters.seasons = table.seasons.iter().cloned().collect();
            self.refilter();
        }
    }

    /// An empty season set means "all seasons".
    pub fn clear_seasons(&mut self) {
        self.filters.seasons.clear();
        self.refilter();
    }

    pub fn clear_teams(&mut self) {
        self.filters.teams.clear();
        self.refilter();
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.filters.date_range = Some(DateRange::new(start, end));
        self.refilter();
    }

    /// Back to the selections made at load time.
    pub fn reset_filters(&mut self) {
        if let Some(table) = &self.dataset {
            self.filters = init_filter_state(table, self.config.recent_seasons);
            self.refilter();
        }
    }

    /// Write the current chart series as pretty JSON.
    pub fn export_summary(&self, path: &Path) -> Result<()> {
        #[derive(Serialize)]
        struct SummaryExport<'a> {
            source: Option<String>,
            seasons: Vec<String>,
            teams: Vec<&'a str>,
            date_range: Option<(NaiveDate, NaiveDate)>,
            aggregates: Option<&'a Aggregates>,
        }

        let export = SummaryExport {
            source: match &self.load_status {
                LoadStatus::Loaded(p) => Some(p.display().to_string()),
                _ => None,
            },
            seasons: self.filters.seasons.iter().map(|s| s.to_string()).collect(),
            teams: self.filters.teams.iter().map(String::as_str).collect(),
            date_range: self.filters.date_range.map(|r| (r.start, r.end)),
            aggregates: self.view.aggregates(),
        };

        let json = serde_json::to_string_pretty(&export).context("serializing summary")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing summary to {}", path.display()))?;
        log::info!("Exported summary to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
season,date,team1,team2,winner,venue,win_by_runs,win_by_wickets
2019,2019-04-01,Mumbai,Chennai,Mumbai,Wankhede,20,0
2020,2020-09-19,Mumbai,Chennai,Chennai,Abu Dhabi,0,5
2021,2021-04-09,Mumbai,Bangalore,,Chennai,0,0
";

    fn loaded(recent_seasons: usize) -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.csv");
        std::fs::write(&path, CSV).unwrap();
        let mut state = AppState::new(DashboardConfig {
            data_path: path.clone(),
            recent_seasons,
            ..Default::default()
        });
        state.load(&path);
        (dir, state)
    }

    #[test]
    fn load_populates_view() {
        let (_dir, state) = loaded(5);
        assert!(matches!(state.load_status, LoadStatus::Loaded(_)));
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        let summary = state.view.summary();
        assert_eq!(summary.total_matches, 3);
        assert_eq!(summary.no_result, 1);
        assert_eq!(summary.unique_venues, 3);
        assert_eq!(summary.top_team_label(), "Chennai");
    }

    #[test]
    fn recent_seasons_are_preselected() {
        let (_dir, state) = loaded(2);
        assert_eq!(state.visible_indices, vec![1, 2]);
    }

    #[test]
    fn filters_that_match_nothing_signal_empty() {
        let (_dir, mut state) = loaded(5);
        state.toggle_team("Delhi");
        assert!(state.visible_indices.is_empty());
        assert!(state.view.is_empty());
        assert_eq!(state.view.summary().top_team_label(), "N/A");

        state.clear_teams();
        assert_eq!(state.visible_indices.len(), 3);
    }

    #[test]
    fn date_range_updates_view() {
        let (_dir, mut state) = loaded(5);
        state.set_date_range(
            NaiveDate::from_ymd_opt(2020, 9, 19).unwrap(),
            NaiveDate::from_ymd_opt(2019, 4, 1).unwrap(),
        );
        assert_eq!(state.visible_indices, vec![0, 1]);
        state.reset_filters();
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn failed_load_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(DashboardConfig::default());
        state.load(&dir.path().join("missing.csv"));
        assert!(matches!(state.load_status, LoadStatus::Failed(ref m) if m.contains("not found")));
        assert!(state.dataset.is_none());
    }

    #[test]
    fn export_writes_json() {
        let (dir, state) = loaded(5);
        let out = dir.path().join("summary.json");
        state.export_summary(&out).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["aggregates"]["summary"]["total_matches"], 3);
        assert_eq!(value["aggregates"]["top_winners"].as_array().unwrap().len(), 2);
    }
}
