//! Chart-ready summaries of a filtered match set.
//!
//! Every function here is pure over its input slice. Callers go through
//! [`DashboardView::build`], which never runs the aggregations on an empty set.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use super::model::{MatchRecord, ResultType, Season};

/// Label reported when no team has a win in the filtered set.
pub const NOT_APPLICABLE: &str = "N/A";

static EMPTY_SUMMARY: SummaryMetrics = SummaryMetrics::EMPTY;

/// Default leaderboard length.
pub const DEFAULT_TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryMetrics {
    pub total_matches: usize,
    pub no_result: usize,
    pub unique_venues: usize,
    pub top_team: Option<String>,
    pub top_team_wins: usize,
}

impl SummaryMetrics {
    pub const EMPTY: SummaryMetrics = SummaryMetrics {
        total_matches: 0,
        no_result: 0,
        unique_venues: 0,
        top_team: None,
        top_team_wins: 0,
    };

    /// Top team name, or `"N/A"` when nobody won.
    pub fn top_team_label(&self) -> &str {
        self.top_team.as_deref().unwrap_or(NOT_APPLICABLE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonCount {
    pub season: Option<Season>,
    pub matches: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamWins {
    pub team: String,
    pub wins: usize,
}

/// Dense team × season win grid; `counts[row][col]` is the wins of
/// `teams[row]` in `seasons[col]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinMatrix {
    pub teams: Vec<String>,
    pub seasons: Vec<Option<Season>>,
    pub counts: Vec<Vec<usize>>,
}

impl WinMatrix {
    pub fn get(&self, team: &str, season: Option<&Season>) -> Option<usize> {
        let row = self.teams.iter().position(|t| t == team)?;
        let col = self.seasons.iter().position(|s| s.as_ref() == season)?;
        Some(self.counts[row][col])
    }

    pub fn max(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty() || self.seasons.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginPoint {
    pub win_by_runs: u32,
    pub win_by_wickets: u32,
    pub result_type: ResultType,
    pub team1: String,
    pub team2: String,
    pub winner: String,
    pub season: Option<Season>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultTypeCount {
    pub result_type: ResultType,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Wins per team, excluding no-result matches, sorted by wins descending then
/// name ascending.
fn win_counts(matches: &[&MatchRecord]) -> Vec<TeamWins> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for m in matches.iter().filter(|m| m.has_winner()) {
        *counts.entry(m.winner.as_str()).or_insert(0) += 1;
    }
    let mut wins: Vec<TeamWins> = counts
        .into_iter()
        .map(|(team, wins)| TeamWins {
            team: team.to_string(),
            wins,
        })
        .collect();
    wins.sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.team.cmp(&b.team)));
    wins
}

pub fn summary_metrics(matches: &[&MatchRecord]) -> SummaryMetrics {
    let venues: BTreeSet<&str> = matches.iter().filter_map(|m| m.venue.as_deref()).collect();
    let top = win_counts(matches).into_iter().next();

    SummaryMetrics {
        total_matches: matches.len(),
        no_result: matches.iter().filter(|m| !m.has_winner()).count(),
        unique_venues: venues.len(),
        top_team_wins: top.as_ref().map_or(0, |t| t.wins),
        top_team: top.map(|t| t.team),
    }
}

/// Match count per season, ascending, unknown season last.
pub fn season_trend(matches: &[&MatchRecord]) -> Vec<SeasonCount> {
    let mut known: BTreeMap<&Season, usize> = BTreeMap::new();
    let mut unknown = 0usize;
    for m in matches {
        match &m.season {
            Some(s) => *known.entry(s).or_insert(0) += 1,
            None => unknown += 1,
        }
    }

    let mut trend: Vec<SeasonCount> = known
        .into_iter()
        .map(|(season, matches)| SeasonCount {
            season: Some(season.clone()),
            matches,
        })
        .collect();
    if unknown > 0 {
        trend.push(SeasonCount {
            season: None,
            matches: unknown,
        });
    }
    trend
}

pub fn top_winners(matches: &[&MatchRecord], n: usize) -> Vec<TeamWins> {
    let mut wins = win_counts(matches);
    wins.truncate(n);
    wins
}

/// Wins by (team, season), zero-filled over every winner × every season
/// present in the filtered set.
pub fn win_matrix(matches: &[&MatchRecord]) -> WinMatrix {
    let teams: BTreeSet<&str> = matches
        .iter()
        .filter(|m| m.has_winner())
        .map(|m| m.winner.as_str())
        .collect();
    let seasons: Vec<Option<Season>> = season_trend(matches)
        .into_iter()
        .map(|s| s.season)
        .collect();

    let teams: Vec<String> = teams.into_iter().map(str::to_string).collect();
    let mut counts = vec![vec![0usize; seasons.len()]; teams.len()];

    for m in matches.iter().filter(|m| m.has_winner()) {
        let row = teams.binary_search(&m.winner);
        let col = seasons.iter().position(|s| *s == m.season);
        if let (Ok(row), Some(col)) = (row, col) {
            counts[row][col] += 1;
        }
    }

    WinMatrix {
        teams,
        seasons,
        counts,
    }
}

pub fn margin_points(matches: &[&MatchRecord]) -> Vec<MarginPoint> {
    matches
        .iter()
        .filter(|m| m.has_winner())
        .map(|m| MarginPoint {
            win_by_runs: m.win_by_runs,
            win_by_wickets: m.win_by_wickets,
            result_type: m.result_type,
            team1: m.team1.clone(),
            team2: m.team2.clone(),
            winner: m.winner.clone(),
            season: m.season.clone(),
        })
        .collect()
}

/// Match count per result type, largest first.
pub fn result_distribution(matches: &[&MatchRecord]) -> Vec<ResultTypeCount> {
    let mut counts: BTreeMap<ResultType, usize> = BTreeMap::new();
    for m in matches {
        *counts.entry(m.result_type).or_insert(0) += 1;
    }
    let mut dist: Vec<ResultTypeCount> = counts
        .into_iter()
        .map(|(result_type, count)| ResultTypeCount { result_type, count })
        .collect();
    dist.sort_by(|a, b| b.count.cmp(&a.count).then(a.result_type.cmp(&b.result_type)));
    dist
}

// ---------------------------------------------------------------------------
// Dashboard view – the empty / populated switch
// ---------------------------------------------------------------------------

/// All chart series for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub summary: SummaryMetrics,
    pub season_trend: Vec<SeasonCount>,
    pub top_winners: Vec<TeamWins>,
    pub win_matrix: WinMatrix,
    pub margins: Vec<MarginPoint>,
    pub result_distribution: Vec<ResultTypeCount>,
}

impl Aggregates {
    pub fn compute(matches: &[&MatchRecord], top_n: usize) -> Self {
        Aggregates {
            summary: summary_metrics(matches),
            season_trend: season_trend(matches),
            top_winners: top_winners(matches, top_n),
            win_matrix: win_matrix(matches),
            margins: margin_points(matches),
            result_distribution: result_distribution(matches),
        }
    }
}

/// What the presentation layer should show for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    /// The filters matched nothing; show a warning and no charts.
    Empty,
    Ready(Box<Aggregates>),
}

impl DashboardView {
    /// Aggregate `matches`, short-circuiting on an empty selection.
    pub fn build(matches: &[&MatchRecord], top_n: usize) -> Self {
        if matches.is_empty() {
            DashboardView::Empty
        } else {
            DashboardView::Ready(Box::new(Aggregates::compute(matches, top_n)))
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DashboardView::Empty)
    }

    pub fn summary(&self) -> &SummaryMetrics {
        match self {
            DashboardView::Empty => &EMPTY_SUMMARY,
            DashboardView::Ready(agg) => &agg.summary,
        }
    }

    pub fn aggregates(&self) -> Option<&Aggregates> {
        match self {
            DashboardView::Empty => None,
            DashboardView::Ready(agg) => Some(agg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::NO_RESULT;

    fn rec(season: Option<i32>, winner: &str, runs: u32, wickets: u32) -> MatchRecord {
        MatchRecord {
            match_id: 0,
            date: None,
            season: season.map(Season::Year),
            team1: "Mumbai".into(),
            team2: "Chennai".into(),
            winner: winner.into(),
            venue: None,
            win_by_runs: runs,
            win_by_wickets: wickets,
            result_type: ResultType::derive(winner, runs, wickets),
        }
    }

    fn refs(records: &[MatchRecord]) -> Vec<&MatchRecord> {
        records.iter().collect()
    }

    #[test]
    fn leaderboard_orders_by_wins() {
        let records = vec![
            rec(Some(2020), "Mumbai", 20, 0),
            rec(Some(2020), "Mumbai", 0, 0),
            rec(Some(2020), "Chennai", 0, 5),
        ];
        let top = top_winners(&refs(&records), DEFAULT_TOP_N);
        let pairs: Vec<(&str, usize)> = top.iter().map(|t| (t.team.as_str(), t.wins)).collect();
        assert_eq!(pairs, vec![("Mumbai", 2), ("Chennai", 1)]);
    }

    #[test]
    fn leaderboard_ties_break_by_name_and_truncate() {
        let records: Vec<MatchRecord> = ["K", "B", "M", "A", NO_RESULT]
            .iter()
            .map(|w| rec(Some(2020), w, 1, 0))
            .collect();
        let top = top_winners(&refs(&records), 3);
        let names: Vec<&str> = top.iter().map(|t| t.team.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "K"]);
    }

    #[test]
    fn summary_counts_and_tie_break() {
        let mut records = vec![
            rec(Some(2020), "Rajasthan", 5, 0),
            rec(Some(2020), "Delhi", 0, 2),
            rec(Some(2021), NO_RESULT, 0, 0),
        ];
        records[0].venue = Some("Jaipur".into());
        records[1].venue = Some("Delhi".into());
        records[2].venue = Some("Jaipur".into());

        let s = summary_metrics(&refs(&records));
        assert_eq!(s.total_matches, 3);
        assert_eq!(s.no_result, 1);
        assert_eq!(s.unique_venues, 2);
        assert_eq!(s.top_team_label(), "Delhi");
        assert_eq!(s.top_team_wins, 1);
    }

    #[test]
    fn summary_without_winners_reports_na() {
        let records = vec![rec(Some(2020), NO_RESULT, 0, 0)];
        let s = summary_metrics(&refs(&records));
        assert_eq!(s.top_team_label(), NOT_APPLICABLE);
        assert_eq!(s.top_team_wins, 0);
        assert_eq!(s.no_result, 1);
    }

    #[test]
    fn empty_selection_short_circuits() {
        let view = DashboardView::build(&[], DEFAULT_TOP_N);
        assert!(view.is_empty());
        assert!(view.aggregates().is_none());
        let s = view.summary();
        assert_eq!(s.total_matches, 0);
        assert_eq!(s.top_team_label(), "N/A");
        assert_eq!(s.top_team_wins, 0);
    }

    #[test]
    fn season_trend_puts_unknown_last() {
        let records = vec![
            rec(None, "A", 1, 0),
            rec(Some(2021), "A", 1, 0),
            rec(Some(2019), "B", 1, 0),
            rec(Some(2021), NO_RESULT, 0, 0),
        ];
        let trend = season_trend(&refs(&records));
        assert_eq!(
            trend,
            vec![
                SeasonCount {
                    season: Some(Season::Year(2019)),
                    matches: 1,
                },
                SeasonCount {
                    season: Some(Season::Year(2021)),
                    matches: 2,
                },
                SeasonCount {
                    season: None,
                    matches: 1,
                },
            ]
        );
    }

    #[test]
    fn win_matrix_is_dense() {
        let records = vec![
            rec(Some(2019), "A", 1, 0),
            rec(Some(2019), "A", 0, 1),
            rec(Some(2020), "B", 1, 0),
            rec(Some(2021), NO_RESULT, 0, 0),
        ];
        let m = win_matrix(&refs(&records));
        assert_eq!(m.teams, vec!["A", "B"]);
        assert_eq!(m.seasons.len(), 3);
        for row in &m.counts {
            assert_eq!(row.len(), m.seasons.len());
        }
        assert_eq!(m.get("A", Some(&Season::Year(2019))), Some(2));
        assert_eq!(m.get("A", Some(&Season::Year(2020))), Some(0));
        assert_eq!(m.get("B", Some(&Season::Year(2021))), Some(0));
        assert_eq!(m.max(), 2);
    }

    #[test]
    fn margins_skip_no_result() {
        let records = vec![rec(Some(2019), "A", 12, 0), rec(Some(2019), NO_RESULT, 0, 0)];
        let points = margin_points(&refs(&records));
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].win_by_runs, 12);
        assert_eq!(points[0].result_type, ResultType::WonByRuns);
        assert_eq!(points[0].winner, "A");
    }

    #[test]
    fn result_distribution_counts_every_type_present() {
        let records = vec![
            rec(Some(2019), "A", 12, 0),
            rec(Some(2019), "B", 0, 4),
            rec(Some(2019), "C", 0, 6),
            rec(Some(2019), NO_RESULT, 0, 0),
        ];
        let dist = result_distribution(&refs(&records));
        assert_eq!(
            dist,
            vec![
                ResultTypeCount {
                    result_type: ResultType::WonByWickets,
                    count: 2,
                },
                ResultTypeCount {
                    result_type: ResultType::NoResult,
                    count: 1,
                },
                ResultTypeCount {
                    result_type: ResultType::WonByRuns,
                    count: 1,
                },
            ]
        );
        let total: usize = dist.iter().map(|d| d.count).sum();
        assert_eq!(total, records.len());
    }

    #[test]
    fn aggregation_is_repeatable() {
        let records = vec![rec(Some(2019), "A", 12, 0), rec(Some(2020), "B", 0, 4)];
        let a = Aggregates::compute(&refs(&records), DEFAULT_TOP_N);
        let b = Aggregates::compute(&refs(&records), DEFAULT_TOP_N);
        assert_eq!(a, b);
    }
}
