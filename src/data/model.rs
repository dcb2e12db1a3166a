use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Canonical winner value for a match without a result.
pub const NO_RESULT: &str = "No Result";

// ---------------------------------------------------------------------------
// RawValue – a single cell as read from the source file
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

/// Tokens treated as missing in every input format.
const NULL_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

impl RawValue {
    /// Classify a textual cell (CSV/TSV) into a typed value.
    pub fn from_text(s: &str) -> Self {
        let s = s.trim();
        if NULL_TOKENS.contains(&s) {
            return RawValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return RawValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return RawValue::Float(f);
        }
        RawValue::Text(s.to_string())
    }

    pub fn is_null(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Float(f) => f.is_nan(),
            RawValue::Text(s) => NULL_TOKENS.contains(&s.trim()),
            _ => false,
        }
    }

    /// Text form of a non-null value.
    pub fn as_text(&self) -> Option<String> {
        if self.is_null() {
            return None;
        }
        match self {
            RawValue::Text(s) => Some(s.trim().to_string()),
            other => Some(other.to_string()),
        }
    }

    /// Try to interpret the value as an `f64`, parsing numeric text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Float(v) if !v.is_nan() => Some(*v),
            RawValue::Integer(i) => Some(*i as f64),
            RawValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| !v.is_nan()),
            _ => None,
        }
    }

    /// Integral value, accepting floats with no fractional part and numeric text.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RawValue::Integer(i) => Some(*i),
            RawValue::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            RawValue::Text(s) => match RawValue::from_text(s) {
                RawValue::Text(_) => None,
                parsed => parsed.as_i64(),
            },
            _ => None,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(s) => write!(f, "{s}"),
            RawValue::Integer(i) => write!(f, "{i}"),
            RawValue::Float(v) => write!(f, "{v}"),
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Null => write!(f, "<null>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Season
// ---------------------------------------------------------------------------

/// A season key: usually a year, occasionally a label such as `2007/08`.
///
/// Years order before labels, so a mixed column still sorts deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Season {
    Year(i32),
    Label(String),
}

impl Season {
    pub fn from_raw(value: &RawValue) -> Option<Season> {
        if let Some(year) = value.as_i64() {
            return i32::try_from(year).ok().map(Season::Year);
        }
        value.as_text().map(Season::Label)
    }

    pub fn from_date(date: NaiveDate) -> Season {
        Season::Year(date.year())
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Year(y) => write!(f, "{y}"),
            Season::Label(s) => write!(f, "{s}"),
        }
    }
}

/// Display label for an optional season (null seasons form their own bucket).
pub fn season_label(season: Option<&Season>) -> String {
    season.map_or_else(|| "Unknown".to_string(), |s| s.to_string())
}

// ---------------------------------------------------------------------------
// ResultType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ResultType {
    #[serde(rename = "No Result")]
    NoResult,
    #[serde(rename = "Won by Runs")]
    WonByRuns,
    #[serde(rename = "Won by Wickets")]
    WonByWickets,
    Other,
}

impl ResultType {
    pub const ALL: [ResultType; 4] = [
        ResultType::NoResult,
        ResultType::WonByRuns,
        ResultType::WonByWickets,
        ResultType::Other,
    ];

    /// Classify a match outcome. Runs take precedence over wickets.
    pub fn derive(winner: &str, win_by_runs: u32, win_by_wickets: u32) -> ResultType {
        if winner == NO_RESULT {
            ResultType::NoResult
        } else if win_by_runs > 0 {
            ResultType::WonByRuns
        } else if win_by_wickets > 0 {
            ResultType::WonByWickets
        } else {
            ResultType::Other
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResultType::NoResult => NO_RESULT,
            ResultType::WonByRuns => "Won by Runs",
            ResultType::WonByWickets => "Won by Wickets",
            ResultType::Other => "Other",
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// MatchRecord – one normalized row
// ---------------------------------------------------------------------------

/// A single played fixture with its derived fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub match_id: i64,
    pub date: Option<NaiveDate>,
    pub season: Option<Season>,
    pub team1: String,
    pub team2: String,
    /// Winning team, or [`NO_RESULT`].
    pub winner: String,
    pub venue: Option<String>,
    pub win_by_runs: u32,
    pub win_by_wickets: u32,
    pub result_type: ResultType,
}

impl MatchRecord {
    /// Whether the match produced a winner.
    pub fn has_winner(&self) -> bool {
        self.result_type != ResultType::NoResult
    }

    pub fn involves(&self, team: &str) -> bool {
        self.team1 == team || self.team2 == team
    }
}

// ---------------------------------------------------------------------------
// MatchTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full normalized table with pre-computed indices for the filter widgets.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchTable {
    pub matches: Vec<MatchRecord>,
    /// Distinct non-null seasons, ascending.
    pub seasons: Vec<Season>,
    /// Distinct team names appearing as `team1` or `team2`, ascending.
    pub teams: Vec<String>,
    /// Earliest and latest known match date.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
    /// Whether the source file carried a `venue` column.
    pub has_venue: bool,
}

impl MatchTable {
    /// Build the column indices from normalized records.
    pub fn from_matches(matches: Vec<MatchRecord>, has_venue: bool) -> Self {
        let mut seasons = BTreeSet::new();
        let mut teams = BTreeSet::new();
        let mut date_bounds: Option<(NaiveDate, NaiveDate)> = None;

        for m in &matches {
            if let Some(season) = &m.season {
                seasons.insert(season.clone());
            }
            teams.insert(m.team1.clone());
            teams.insert(m.team2.clone());
            if let Some(d) = m.date {
                date_bounds = Some(match date_bounds {
                    Some((lo, hi)) => (lo.min(d), hi.max(d)),
                    None => (d, d),
                });
            }
        }

        MatchTable {
            matches,
            seasons: seasons.into_iter().collect(),
            teams: teams.into_iter().collect(),
            date_bounds,
            has_venue,
        }
    }

    /// Number of matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
