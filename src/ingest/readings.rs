/// Station file reader: the reading provider for the segmentation engine.
///
/// Parses the weather station's CSV exports (one row per observation),
/// delegates workbooks to `workbook`,
/// consolidates daily files from a directory, and hands the engine a series
/// that is sorted ascending by timestamp with duplicate timestamps removed.
///
/// Rows are dropped, never coerced, when:
/// - the timestamp matches none of the accepted formats
/// - the humidity cell is empty or has no digits left after cleaning
///
/// Accepted timestamp formats:
///   2025-03-10T14:00:00-05:00   (RFC 3339, kept as local wall-clock time)
///   2025-03-10 14:00:00 / 2025-03-10 14:00 / 2025-03-10T14:00:00
///   10/03/2025 14:00:00 / 10/03/2025 14:00   (day first, dashboard format)

use chrono::{DateTime, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::{IngestError, workbook};
use crate::model::Reading;

const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

const TIMESTAMP_HEADERS: [&str; 4] = ["fecha", "timestamp", "datetime", "date"];
const HUMIDITY_HEADERS: [&str; 4] = [
    "humedad relativa (%)",
    "humidity",
    "relative_humidity",
    "relh",
];

// ---------------------------------------------------------------------------
// Load report
// ---------------------------------------------------------------------------

/// Readings produced by a load, with row accounting for the summary line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub readings: Vec<Reading>,
    /// Data rows seen (header excluded, blank lines skipped)
    pub rows_read: usize,
    /// Rows rejected for an unparseable timestamp or humidity
    pub rows_dropped: usize,
}

impl LoadReport {
    /// Counts one data row, keeping it only if both cells parsed.
    pub(crate) fn record(
        &mut self,
        row_no: usize,
        timestamp: Option<NaiveDateTime>,
        humidity: Option<f64>,
        raw: &str,
    ) {
        self.rows_read += 1;
        match (timestamp, humidity) {
            (Some(timestamp), Some(humidity)) => {
                self.readings.push(Reading::new(timestamp, humidity));
            }
            _ => {
                log::warn!("dropping row {}: unparseable timestamp or humidity: {}", row_no, raw);
                self.rows_dropped += 1;
            }
        }
    }

    fn merge(&mut self, other: LoadReport) {
        self.readings.extend(other.readings);
        self.rows_read += other.rows_read;
        self.rows_dropped += other.rows_dropped;
    }
}

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

/// Parses a timestamp cell in any accepted format.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Cleans a humidity cell down to digits and `.` before parsing, so
/// `"93 %"` and `"93.5%"` both read as numbers.
pub fn parse_humidity(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

fn split_row(line: &str, delimiter: char) -> Vec<&str> {
    line.split(delimiter)
        .map(|f| f.trim().trim_matches('"').trim())
        .collect()
}

fn find_column(headers: &[&str], candidates: &[&str], prefix: Option<&str>) -> Option<usize> {
    let normalized: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    normalized
        .iter()
        .position(|h| candidates.contains(&h.as_str()))
        .or_else(|| prefix.and_then(|p| normalized.iter().position(|h| h.starts_with(p))))
}

/// Positions of the timestamp and humidity columns in a header row.
pub(crate) fn reading_columns(headers: &[&str]) -> Result<(usize, usize), IngestError> {
    let ts_col = find_column(headers, &TIMESTAMP_HEADERS, None)
        .ok_or_else(|| IngestError::MissingColumn("Fecha".to_string()))?;
    let hum_col = find_column(headers, &HUMIDITY_HEADERS, Some("humedad"))
        .ok_or_else(|| IngestError::MissingColumn("Humedad Relativa (%)".to_string()))?;
    Ok((ts_col, hum_col))
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Parses a station CSV export. The header row is required.
///
/// Semicolon-delimited files (regional spreadsheet exports) are detected from
/// the header; in those, a decimal comma in the humidity cell is accepted.
/// The returned readings are in file order; see `prepare_series`.
pub fn parse_readings_csv(text: &str) -> Result<LoadReport, IngestError> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let header = lines
        .next()
        .ok_or_else(|| IngestError::EmptyInput("no header row".to_string()))?;

    let delimiter = if header.contains(';') && !header.contains(',') { ';' } else { ',' };
    let headers = split_row(header.trim_start_matches('\u{feff}'), delimiter);

    let (ts_col, hum_col) = reading_columns(&headers)?;

    let mut report = LoadReport::default();
    for (line_no, line) in lines.enumerate() {
        let fields = split_row(line, delimiter);

        let timestamp = fields.get(ts_col).and_then(|f| parse_timestamp(f));
        let humidity = fields.get(hum_col).and_then(|f| {
            if delimiter == ';' {
                parse_humidity(&f.replace(',', "."))
            } else {
                parse_humidity(f)
            }
        });

        // +2: 1-based, plus the header row
        report.record(line_no + 2, timestamp, humidity, line);
    }

    Ok(report)
}

// ---------------------------------------------------------------------------
// Series preparation
// ---------------------------------------------------------------------------

/// Sorts readings ascending by timestamp (stable) and drops repeated
/// timestamps, keeping the first occurrence.
pub fn prepare_series(mut readings: Vec<Reading>) -> Vec<Reading> {
    readings.sort_by_key(|r| r.timestamp);
    readings.dedup_by_key(|r| r.timestamp);
    readings
}

// ---------------------------------------------------------------------------
// File loading
// ---------------------------------------------------------------------------

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

fn read_file(path: &Path) -> Result<LoadReport, IngestError> {
    let report = if has_extension(path, &WORKBOOK_EXTENSIONS) {
        workbook::read_workbook(path)?
    } else {
        let text = fs::read_to_string(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_readings_csv(&text)?
    };
    log::debug!(
        "{}: {} readings, {} rows dropped",
        path.display(),
        report.readings.len(),
        report.rows_dropped
    );
    Ok(report)
}

/// Station files directly inside `dir`, sorted by name (daily files sort by
/// date). Spreadsheet lock files (`~$...`) are skipped.
fn data_files_in(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let io_err = |source: std::io::Error| IngestError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_lock_file = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("~$"));
        let is_data = has_extension(&path, &["csv"]) || has_extension(&path, &WORKBOOK_EXTENSIONS);
        if path.is_file() && is_data && !is_lock_file {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Loads and consolidates every file and directory in `paths` into one
/// prepared series. Directories contribute each `*.csv` and workbook
/// (`*.xlsx`, `*.xls`, `*.ods`) they contain.
///
/// Fails with `EmptyInput` if nothing usable was read.
pub fn load_paths(paths: &[PathBuf]) -> Result<LoadReport, IngestError> {
    let mut combined = LoadReport::default();

    for path in paths {
        if path.is_dir() {
            let files = data_files_in(path)?;
            log::info!("consolidating {} daily files from {}", files.len(), path.display());
            for file in files {
                combined.merge(read_file(&file)?);
            }
        } else {
            combined.merge(read_file(path)?);
        }
    }

    let before = combined.readings.len();
    combined.readings = prepare_series(combined.readings);
    let duplicates = before - combined.readings.len();
    if duplicates > 0 {
        log::info!("removed {} readings with duplicate timestamps", duplicates);
    }

    if combined.readings.is_empty() {
        let names: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        return Err(IngestError::EmptyInput(names.join(", ")));
    }

    log::info!(
        "loaded {} readings ({} rows read, {} dropped)",
        combined.readings.len(),
        combined.rows_read,
        combined.rows_dropped
    );
    Ok(combined)
}

/// Loads a single CSV export or workbook.
pub fn load_readings(path: impl AsRef<Path>) -> Result<LoadReport, IngestError> {
    load_paths(&[path.as_ref().to_path_buf()])
}

/// Consolidates the daily files of a directory into one series.
pub fn consolidate_directory(dir: impl AsRef<Path>) -> Result<LoadReport, IngestError> {
    load_paths(&[dir.as_ref().to_path_buf()])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
