/// Workbook reader for station files saved as spreadsheets.
///
/// Only the first sheet is read. Its first non-blank row is the header and
/// is matched by the same column names as the CSV exports. Date cells come
/// through as native spreadsheet datetimes; text cells fall back to the
/// CSV timestamp and humidity parsers.

use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::NaiveDateTime;
use std::path::Path;

use crate::ingest::IngestError;
use crate::ingest::readings::{LoadReport, parse_humidity, parse_timestamp, reading_columns};

fn cell_timestamp(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime(),
        Data::DateTimeIso(s) | Data::String(s) => parse_timestamp(s),
        _ => None,
    }
}

fn cell_humidity(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        // Regional sheets store "91,5" as text
        Data::String(s) => parse_humidity(&s.replace(',', ".")),
        _ => None,
    }
}

fn is_blank(row: &[Data]) -> bool {
    row.iter().all(|c| match c {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    })
}

/// Parses the cells of a station sheet. Readings are in sheet order.
pub fn parse_readings_range(range: &Range<Data>) -> Result<LoadReport, IngestError> {
    let mut rows = range.rows().enumerate().filter(|(_, row)| !is_blank(row));
    let (_, header) = rows
        .next()
        .ok_or_else(|| IngestError::EmptyInput("no header row".to_string()))?;

    let header: Vec<String> = header.iter().map(|c| c.to_string().trim().to_string()).collect();
    let header: Vec<&str> = header.iter().map(String::as_str).collect();
    let (ts_col, hum_col) = reading_columns(&header)?;

    let mut report = LoadReport::default();
    for (row_idx, row) in rows {
        let timestamp = row.get(ts_col).and_then(cell_timestamp);
        let humidity = row.get(hum_col).and_then(cell_humidity);
        let raw = row.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(",");
        report.record(row_idx + 1, timestamp, humidity, &raw);
    }

    Ok(report)
}

/// Opens a workbook and parses its first sheet.
pub fn read_workbook(path: &Path) -> Result<LoadReport, IngestError> {
    let workbook_err = |source: calamine::Error| IngestError::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_err)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::EmptyInput(format!("{} has no sheets", path.display())))?
        .map_err(workbook_err)?;

    parse_readings_range(&range)
}
