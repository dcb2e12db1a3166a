use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type,
    Int8Type, TimeUnit, TimestampMicrosecondType, TimestampMillisecondType,
    TimestampNanosecondType, TimestampSecondType,
};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{MatchRecord, MatchTable, RawValue, ResultType, Season, NO_RESULT};

/// Columns every source must provide (plus `date` or `season`).
const REQUIRED_COLUMNS: [&str; 5] = ["team1", "team2", "winner", "win_by_runs", "win_by_wickets"];

/// Label used when a team cell is empty.
const UNKNOWN_TEAM: &str = "Unknown";

/// Accepted textual date layouts, tried in order. Two-digit years come last.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d/%m/%y",
    "%d-%m-%y",
    "%d.%m.%y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// `%Y` also accepts one or two digits; anything earlier is a misparse.
const MIN_YEAR: i32 = 1000;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to produce a match table from a source file.
///
/// A file that parses but holds no rows is *not* an error.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("malformed data: {0}")]
    Malformed(String),
}

impl DataLoadError {
    /// Map an I/O failure on `path`, singling out a missing file.
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            DataLoadError::NotFound(path.to_path_buf())
        } else {
            DataLoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Raw table – untyped rows straight from the file
// ---------------------------------------------------------------------------

/// Rows as read from the source, keyed by column name.
#[derive(Debug, Default)]
pub struct RawTable {
    /// Column names in source order.
    pub columns: Vec<String>,
    pub rows: Vec<BTreeMap<String, RawValue>>,
}

impl RawTable {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

/// Supported input layouts, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Tsv,
    Json,
    Parquet,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self, DataLoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" | "txt" => Ok(SourceFormat::Csv),
            "tsv" | "tab" => Ok(SourceFormat::Tsv),
            "json" => Ok(SourceFormat::Json),
            "parquet" | "pq" => Ok(SourceFormat::Parquet),
            other => Err(DataLoadError::UnsupportedFormat(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and normalize a match table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.tsv` – header row, one match per line
/// * `.json`         – `[{ "team1": "...", "team2": "...", ... }, ...]`
/// * `.parquet`      – flat columns with the same names
pub fn load_file(path: &Path) -> Result<MatchTable, DataLoadError> {
    let format = SourceFormat::from_path(path)?;

    let raw = match format {
        SourceFormat::Csv => read_delimited(open(path)?, b',')?,
        SourceFormat::Tsv => read_delimited(open(path)?, b'\t')?,
        SourceFormat::Json => {
            let mut text = String::new();
            open(path)?
                .read_to_string(&mut text)
                .map_err(|e| DataLoadError::io(path, e))?;
            read_json(&text)?
        }
        SourceFormat::Parquet => read_parquet(open(path)?)?,
    };

    let table = normalize(raw)?;
    log::info!(
        "Loaded {} matches ({} seasons, {} teams) from {}",
        table.len(),
        table.seasons.len(),
        table.teams.len(),
        path.display()
    );
    Ok(table)
}

fn open(path: &Path) -> Result<File, DataLoadError> {
    File::open(path).map_err(|e| DataLoadError::io(path, e))
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

/// Read delimited text with a header row. Every cell is classified with
/// [`RawValue::from_text`]; short rows are padded with nulls.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<RawTable, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > columns.len() {
            return Err(DataLoadError::Malformed(format!(
                "row {row_no} has {} fields but the header has {}",
                record.len(),
                columns.len()
            )));
        }
        let row = columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let value = record.get(i).map_or(RawValue::Null, RawValue::from_text);
                (col.clone(), value)
            })
            .collect();
        rows.push(row);
    }

    Ok(RawTable { columns, rows })
}

// ---------------------------------------------------------------------------
// JSON records
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "season": 2017, "date": "2017-04-05", "team1": "SRH", "team2": "RCB",
///     "winner": "SRH", "win_by_runs": 35, "win_by_wickets": 0 },
///   ...
/// ]
/// ```
pub fn read_json(text: &str) -> Result<RawTable, DataLoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root
        .as_array()
        .ok_or_else(|| DataLoadError::Malformed("expected top-level JSON array".into()))?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataLoadError::Malformed(format!("row {i} is not a JSON object")))?;

        let mut row = BTreeMap::new();
        for (key, val) in obj {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
            row.insert(key.clone(), json_to_raw(val));
        }
        rows.push(row);
    }

    Ok(RawTable { columns, rows })
}

fn json_to_raw(val: &JsonValue) -> RawValue {
    match val {
        JsonValue::String(s) => RawValue::from_text(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                RawValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                RawValue::Float(f)
            } else {
                RawValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => RawValue::Bool(*b),
        JsonValue::Null => RawValue::Null,
        other => RawValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Read a Parquet file with flat match columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); `date` may be a string, `Date32` or
/// timestamp column.
pub fn read_parquet(file: File) -> Result<RawTable, DataLoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let mut values = BTreeMap::new();
            for (col_idx, field) in schema.fields().iter().enumerate() {
                let value = extract_raw_value(batch.column(col_idx), row);
                values.insert(field.name().clone(), value);
            }
            rows.push(values);
        }
    }

    Ok(RawTable { columns, rows })
}

/// Extract a single cell from an Arrow column at a given row.
///
/// Cells that cannot be rendered become [`RawValue::Null`] rather than
/// failing the load.
fn extract_raw_value(col: &Arc<dyn Array>, row: usize) -> RawValue {
    if col.is_null(row) {
        return RawValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => RawValue::from_text(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => RawValue::from_text(col.as_string::<i64>().value(row)),
        DataType::Int8 => RawValue::Integer(col.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => RawValue::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => RawValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => RawValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => RawValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => RawValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => RawValue::Bool(col.as_boolean().value(row)),
        DataType::Date32 => {
            let days = col.as_primitive::<Date32Type>().value(row);
            date_value(
                days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
                    .and_then(NaiveDate::from_num_days_from_ce_opt),
            )
        }
        DataType::Date64 => {
            let millis = col.as_primitive::<Date64Type>().value(row);
            date_value(DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive()))
        }
        // Zoned timestamps hold UTC instants; naive ones hold wall-clock time.
        // Either way the stored value maps straight to a calendar day.
        DataType::Timestamp(unit, _) => {
            let utc = match unit {
                TimeUnit::Second => DateTime::from_timestamp(
                    col.as_primitive::<TimestampSecondType>().value(row),
                    0,
                ),
                TimeUnit::Millisecond => DateTime::from_timestamp_millis(
                    col.as_primitive::<TimestampMillisecondType>().value(row),
                ),
                TimeUnit::Microsecond => DateTime::from_timestamp_micros(
                    col.as_primitive::<TimestampMicrosecondType>().value(row),
                ),
                TimeUnit::Nanosecond => Some(DateTime::from_timestamp_nanos(
                    col.as_primitive::<TimestampNanosecondType>().value(row),
                )),
            };
            date_value(utc.map(|dt| dt.date_naive()))
        }
        _ => match arrow::util::display::array_value_to_string(col, row) {
            Ok(text) => RawValue::from_text(&text),
            Err(e) => {
                log::debug!("unreadable {} cell at row {row}: {e}", col.data_type());
                RawValue::Null
            }
        },
    }
}

fn date_value(date: Option<NaiveDate>) -> RawValue {
    date.map_or(RawValue::Null, |d| RawValue::Text(d.format("%Y-%m-%d").to_string()))
}

/// Days between 0001-01-01 and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

// ---------------------------------------------------------------------------
// Normalization – raw rows → MatchTable
// ---------------------------------------------------------------------------

/// Turn raw rows into canonical match records.
///
/// * unparseable dates become `None` (the row is kept)
/// * missing `winner` becomes [`NO_RESULT`]
/// * missing margins become 0
/// * `season` falls back to the date's year when the column is absent
/// * `match_id` is backfilled 1..N when the column is absent
pub fn normalize(raw: RawTable) -> Result<MatchTable, DataLoadError> {
    for col in REQUIRED_COLUMNS {
        if !raw.has_column(col) {
            return Err(DataLoadError::MissingColumn(col.to_string()));
        }
    }
    let has_date = raw.has_column("date");
    let has_season = raw.has_column("season");
    if !has_date && !has_season {
        return Err(DataLoadError::MissingColumn("date or season".to_string()));
    }
    let has_venue = raw.has_column("venue");
    let has_match_id = raw.has_column("match_id");

    let mut source_ids = Vec::with_capacity(raw.rows.len());
    let mut matches = Vec::with_capacity(raw.rows.len());
    let mut bad_dates = 0usize;

    for (row_no, row) in raw.rows.iter().enumerate() {
        let cell = |name: &str| row.get(name).unwrap_or(&RawValue::Null);

        let date_cell = cell("date");
        let date = if date_cell.is_null() {
            None
        } else {
            let parsed = parse_date(date_cell);
            if parsed.is_none() {
                bad_dates += 1;
                log::debug!("row {row_no}: unparseable date {date_cell}");
            }
            parsed
        };

        let season = if has_season {
            Season::from_raw(cell("season"))
        } else {
            date.map(Season::from_date)
        };

        let team = |name: &str| {
            cell(name).as_text().unwrap_or_else(|| {
                log::warn!("row {row_no}: empty {name}");
                UNKNOWN_TEAM.to_string()
            })
        };
        let team1 = team("team1");
        let team2 = team("team2");

        let winner = cell("winner")
            .as_text()
            .unwrap_or_else(|| NO_RESULT.to_string());
        let win_by_runs = margin(cell("win_by_runs"));
        let win_by_wickets = margin(cell("win_by_wickets"));
        let result_type = ResultType::derive(&winner, win_by_runs, win_by_wickets);

        source_ids.push(cell("match_id").as_i64());
        matches.push(MatchRecord {
            match_id: 0,
            date,
            season,
            team1,
            team2,
            winner,
            venue: if has_venue { cell("venue").as_text() } else { None },
            win_by_runs,
            win_by_wickets,
            result_type,
        });
    }

    if bad_dates > 0 {
        log::warn!("{bad_dates} row(s) had unparseable dates and were kept with no date");
    }

    let ids = if has_match_id {
        dedupe_ids(&source_ids)
    } else {
        (1..=matches.len() as i64).collect()
    };
    for (m, id) in matches.iter_mut().zip(ids) {
        m.match_id = id;
    }

    Ok(MatchTable::from_matches(matches, has_venue))
}

/// Keep source ids where present and unique; rows with a missing or repeated
/// id get fresh ids above the largest source id, in row order.
fn dedupe_ids(source_ids: &[Option<i64>]) -> Vec<i64> {
    let mut next = source_ids.iter().flatten().max().map_or(1, |m| m + 1);
    let mut seen = HashSet::with_capacity(source_ids.len());
    let mut reassigned = 0usize;

    let ids = source_ids
        .iter()
        .map(|id| match id {
            Some(id) if seen.insert(*id) => *id,
            _ => {
                while seen.contains(&next) {
                    next += 1;
                }
                seen.insert(next);
                reassigned += 1;
                next
            }
        })
        .collect();

    if reassigned > 0 {
        log::warn!("{reassigned} row(s) had a missing or duplicate match_id and were renumbered");
    }
    ids
}

/// Win margin as a non-negative integer; anything unusable counts as 0.
fn margin(value: &RawValue) -> u32 {
    value
        .as_f64()
        .filter(|v| v.is_finite() && *v > 0.0)
        .map_or(0, |v| v.min(u32::MAX as f64) as u32)
}

/// Parse a date cell, returning `None` for anything unrecognised.
pub fn parse_date(value: &RawValue) -> Option<NaiveDate> {
    let RawValue::Text(s) = value else {
        return None;
    };
    let s = s.trim();
    let plausible = |d: &NaiveDate| d.year() >= MIN_YEAR;
    DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .find(plausible)
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .filter_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
                .find(plausible)
        })
        .or_else(|| {
            // Offset-qualified, e.g. "2017-04-05T00:00:00Z"
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.naive_utc().date())
                .filter(plausible)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use arrow::array::{
        ArrayRef, Date32Array, Date64Array, Int64Array, StringArray, TimestampMicrosecondArray,
        TimestampMillisecondArray, TimestampSecondArray,
    };
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    fn from_csv(text: &str) -> Result<MatchTable, DataLoadError> {
        normalize(read_delimited(text.as_bytes(), b',')?)
    }

    #[test]
    fn missing_winner_becomes_no_result_and_ids_are_backfilled() {
        let table = from_csv(
            "season,date,team1,team2,winner,win_by_runs,win_by_wickets\n\
             2020,2020-09-19,MI,CSK,CSK,0,5\n\
             2020,2020-09-20,DC,KXIP,,0,0\n\
             2021,2021-04-09,MI,RCB,RCB,0,2\n",
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.matches[1].winner, NO_RESULT);
        assert_eq!(table.matches[1].result_type, ResultType::NoResult);
        let ids: Vec<i64> = table.matches.iter().map(|m| m.match_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(table.seasons, vec![Season::Year(2020), Season::Year(2021)]);
    }

    #[test]
    fn result_types_are_derived_at_load() {
        let table = from_csv(
            "date,team1,team2,winner,win_by_runs,win_by_wickets\n\
             2019-04-01,X,Q,X,15,0\n\
             2019-04-02,Y,Q,Y,0,4\n\
             2019-04-03,Z,Q,Z,0,0\n",
        )
        .unwrap();
        let types: Vec<ResultType> = table.matches.iter().map(|m| m.result_type).collect();
        assert_eq!(
            types,
            vec![ResultType::WonByRuns, ResultType::WonByWickets, ResultType::Other]
        );
    }

    #[test]
    fn bad_dates_are_kept_as_null() {
        let table = from_csv(
            "date,team1,team2,winner,win_by_runs,win_by_wickets\n\
             not-a-date,MI,CSK,MI,10,0\n\
             05/04/2017,SRH,RCB,SRH,35,\n",
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.matches[0].date, None);
        assert_eq!(table.matches[0].season, None);
        assert_eq!(table.matches[1].date, NaiveDate::from_ymd_opt(2017, 4, 5));
        assert_eq!(table.matches[1].season, Some(Season::Year(2017)));
        assert_eq!(table.matches[1].win_by_wickets, 0);
    }

    #[test]
    fn source_ids_are_kept_and_duplicates_renumbered() {
        let table = from_csv(
            "match_id,season,team1,team2,winner,win_by_runs,win_by_wickets\n\
             10,2018,A,B,A,1,0\n\
             10,2018,A,B,B,0,1\n\
             ,2018,A,B,A,2,0\n\
             11,2018,A,B,A,3,0\n",
        )
        .unwrap();
        let ids: Vec<i64> = table.matches.iter().map(|m| m.match_id).collect();
        assert_eq!(ids, vec![10, 12, 13, 11]);
        let unique: HashSet<i64> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn venue_column_is_optional() {
        let table = from_csv(
            "season,team1,team2,winner,win_by_runs,win_by_wickets\n2018,A,B,A,1,0\n",
        )
        .unwrap();
        assert!(!table.has_venue);
        assert_eq!(table.matches[0].venue, None);
        assert_eq!(table.date_bounds, None);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let err = from_csv("season,team1,team2,winner,win_by_runs\n2018,A,B,A,1\n").unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn(c) if c == "win_by_wickets"));

        let err = from_csv("team1,team2,winner,win_by_runs,win_by_wickets\nA,B,A,1,0\n")
            .unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn(_)));
    }

    #[test]
    fn header_only_file_is_empty_not_an_error() {
        let table = from_csv("date,team1,team2,winner,win_by_runs,win_by_wickets\n").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::NotFound(_)));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("matches.xlsx")).unwrap_err();
        assert!(matches!(err, DataLoadError::UnsupportedFormat(e) if e == "xlsx"));
    }

    #[test]
    fn loading_twice_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.csv");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "date,team1,team2,winner,venue,win_by_runs,win_by_wickets").unwrap();
        writeln!(f, "2017-04-05,SRH,RCB,SRH,Hyderabad,35,0").unwrap();
        writeln!(f, "2017-04-06,MI,RPS,RPS,Pune,0,7").unwrap();
        drop(f);

        let a = load_file(&path).unwrap();
        let b = load_file(&path).unwrap();
        assert_eq!(a, b);
        assert!(a.has_venue);
    }

    #[test]
    fn json_records_load() {
        let raw = read_json(
            r#"[
                {"season": 2017, "date": "2017-04-05", "team1": "SRH", "team2": "RCB",
                 "winner": "SRH", "win_by_runs": 35, "win_by_wickets": 0},
                {"season": 2017, "date": null, "team1": "MI", "team2": "RPS",
                 "winner": null, "win_by_runs": 0.0, "win_by_wickets": 0}
            ]"#,
        )
        .unwrap();
        let table = normalize(raw).unwrap();
        assert_eq!(table.matches[0].result_type, ResultType::WonByRuns);
        assert_eq!(table.matches[1].winner, NO_RESULT);
        assert_eq!(table.matches[1].date, None);
    }

    #[test]
    fn tsv_uses_tab_delimiter() {
        let raw = read_delimited(
            "season\tteam1\tteam2\twinner\twin_by_runs\twin_by_wickets\n2016\tGL\tKXIP\tGL\t0\t5\n"
                .as_bytes(),
            b'\t',
        )
        .unwrap();
        let table = normalize(raw).unwrap();
        assert_eq!(table.matches[0].result_type, ResultType::WonByWickets);
    }

    #[test]
    fn date_formats() {
        let d = NaiveDate::from_ymd_opt(2008, 4, 18);
        for text in ["2008-04-18", "18/04/2008", "2008-04-18 19:30:00", "18 April 2008"] {
            assert_eq!(parse_date(&RawValue::Text(text.into())), d, "{text}");
        }
        assert_eq!(parse_date(&RawValue::Integer(20080418)), None);
    }

    #[test]
    fn two_digit_years_are_day_first() {
        let d = NaiveDate::from_ymd_opt(2018, 4, 7);
        for text in ["07/04/18", "07-04-18", "07.04.18"] {
            assert_eq!(parse_date(&RawValue::Text(text.into())), d, "{text}");
        }
        assert_eq!(parse_date(&RawValue::Text("0007-04-18".into())), None);

        let table = from_csv(
            "date,team1,team2,winner,win_by_runs,win_by_wickets\n\
             07/04/18,MI,CSK,CSK,0,1\n\
             2018-04-08,DD,KXIP,KXIP,0,6\n",
        )
        .unwrap();
        assert_eq!(table.seasons, vec![Season::Year(2018)]);
        assert_eq!(
            table.date_bounds,
            Some((
                NaiveDate::from_ymd_opt(2018, 4, 7).unwrap(),
                NaiveDate::from_ymd_opt(2018, 4, 8).unwrap()
            ))
        );
    }

    #[test]
    fn offset_timestamps_parse_as_utc_day() {
        let d = NaiveDate::from_ymd_opt(2017, 4, 5);
        for text in [
            "2017-04-05T19:30:00Z",
            "2017-04-05T19:30:00+00:00",
            "2017-04-06T01:00:00+05:30",
        ] {
            assert_eq!(parse_date(&RawValue::Text(text.into())), d, "{text}");
        }
    }

    #[test]
    fn extra_fields_are_malformed() {
        let err = from_csv(
            "season,team1,team2,winner,win_by_runs,win_by_wickets\n\
             2018,A,B,A,1,0,surplus\n",
        )
        .unwrap_err();
        assert!(matches!(err, DataLoadError::Malformed(_)));
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        let err = read_json(r#"{"team1": "MI"}"#).unwrap_err();
        assert!(matches!(err, DataLoadError::Malformed(_)));

        let err = read_json(r#"[{"team1": "MI"}, 42]"#).unwrap_err();
        assert!(matches!(err, DataLoadError::Malformed(m) if m.contains("row 1")));

        assert!(matches!(read_json("[1,"), Err(DataLoadError::Json(_))));
    }

    /// One-row match file whose `date` column is `date`.
    fn write_parquet(dir: &Path, name: &str, date: ArrayRef) -> PathBuf {
        let batch = RecordBatch::try_from_iter(vec![
            ("date", date),
            ("team1", Arc::new(StringArray::from(vec!["SRH"])) as ArrayRef),
            ("team2", Arc::new(StringArray::from(vec!["RCB"])) as ArrayRef),
            ("winner", Arc::new(StringArray::from(vec!["SRH"])) as ArrayRef),
            ("win_by_runs", Arc::new(Int64Array::from(vec![35])) as ArrayRef),
            ("win_by_wickets", Arc::new(Int64Array::from(vec![0])) as ArrayRef),
        ])
        .unwrap();

        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    #[test]
    fn parquet_date_columns() {
        let dir = tempfile::tempdir().unwrap();
        // 2017-04-05 00:00:00 UTC
        let midnight: i64 = 1_491_350_400;
        let evening = midnight + 19 * 3600 + 1800;

        let columns = vec![
            (
                "date32.parquet",
                Arc::new(Date32Array::from(vec![17_261])) as ArrayRef,
            ),
            (
                "date64.parquet",
                Arc::new(Date64Array::from(vec![midnight * 1000])) as ArrayRef,
            ),
            (
                "naive.parquet",
                Arc::new(TimestampMillisecondArray::from(vec![evening * 1000])) as ArrayRef,
            ),
            (
                "utc.parquet",
                Arc::new(TimestampSecondArray::from(vec![evening]).with_timezone("UTC"))
                    as ArrayRef,
            ),
            (
                "offset.parquet",
                Arc::new(
                    TimestampMicrosecondArray::from(vec![(midnight + 3600) * 1_000_000])
                        .with_timezone("+05:30"),
                ) as ArrayRef,
            ),
            (
                "text.parquet",
                Arc::new(StringArray::from(vec!["05/04/2017"])) as ArrayRef,
            ),
        ];

        for (name, date) in columns {
            let table = load_file(&write_parquet(dir.path(), name, date)).unwrap();
            let m = &table.matches[0];
            assert_eq!(m.date, NaiveDate::from_ymd_opt(2017, 4, 5), "{name}");
            assert_eq!(m.season, Some(Season::Year(2017)), "{name}");
            assert_eq!(m.result_type, ResultType::WonByRuns, "{name}");
        }
    }

    #[test]
    fn parquet_null_dates_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let date: ArrayRef = Arc::new(Date32Array::from(vec![None::<i32>]));
        let table = load_file(&write_parquet(dir.path(), "nulls.parquet", date)).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.matches[0].date, None);
        assert_eq!(table.matches[0].season, None);
    }

    #[test]
    fn margins_clamp_negative_and_garbage() {
        assert_eq!(margin(&RawValue::Integer(-3)), 0);
        assert_eq!(margin(&RawValue::Text("abc".into())), 0);
        assert_eq!(margin(&RawValue::Float(20.0)), 20);
        assert_eq!(margin(&RawValue::Null), 0);
    }
}
