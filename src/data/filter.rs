use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{MatchRecord, MatchTable, Season};

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// Inclusive date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        DateRange {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Unknown dates never fall inside a range.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        date.is_some_and(|d| self.start <= d && d <= self.end)
    }
}

/// User selections driving the filter.
///
/// Empty `seasons` / `teams` sets mean "no constraint"; `date_range: None`
/// means no date constraint at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub seasons: BTreeSet<Season>,
    pub teams: BTreeSet<String>,
    pub date_range: Option<DateRange>,
}

/// A single row-level predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion<'a> {
    Seasons(&'a BTreeSet<Season>),
    Teams(&'a BTreeSet<String>),
    Dates(Option<DateRange>),
}

impl Criterion<'_> {
    pub fn matches(&self, m: &MatchRecord) -> bool {
        match self {
            Criterion::Seasons(selected) => {
                selected.is_empty() || m.season.as_ref().is_some_and(|s| selected.contains(s))
            }
            Criterion::Teams(selected) => {
                selected.is_empty() || selected.iter().any(|t| m.involves(t))
            }
            Criterion::Dates(range) => range.map_or(true, |r| r.contains(m.date)),
        }
    }
}

impl FilterState {
    /// The three criteria, in no meaningful order.
    pub fn criteria(&self) -> [Criterion<'_>; 3] {
        [
            Criterion::Seasons(&self.seasons),
            Criterion::Teams(&self.teams),
            Criterion::Dates(self.date_range),
        ]
    }

    pub fn matches(&self, m: &MatchRecord) -> bool {
        self.criteria().iter().all(|c| c.matches(m))
    }
}

/// Initial selections for a freshly loaded table: the `recent_seasons` most
/// recent seasons, no team constraint, and the full known date span.
pub fn init_filter_state(table: &MatchTable, recent_seasons: usize) -> FilterState {
    let skip = table.seasons.len().saturating_sub(recent_seasons);
    FilterState {
        seasons: table.seasons.iter().skip(skip).cloned().collect(),
        teams: BTreeSet::new(),
        date_range: table.date_bounds.map(|(lo, hi)| DateRange::new(lo, hi)),
    }
}

/// Return indices of matches that pass all active filters.
pub fn filtered_indices(table: &MatchTable, filters: &FilterState) -> Vec<usize> {
    apply_criteria(table, &filters.criteria())
}

/// Apply criteria one after another, each narrowing the previous survivors.
pub fn apply_criteria(table: &MatchTable, criteria: &[Criterion<'_>]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..table.len()).collect();
    for criterion in criteria {
        indices.retain(|&i| criterion.matches(&table.matches[i]));
    }
    indices
}
