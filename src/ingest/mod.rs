/// Reading ingestion for the humidity monitoring service.
///
/// Submodules:
/// - `readings` - station CSV parsing, daily-file consolidation, and series
///   preparation (sort + dedup) ahead of segmentation.
/// - `workbook` - first-sheet reader for `.xlsx`/`.xls`/`.ods` station files.
/// - `fixtures` (test only) - representative station export payloads.

use std::path::PathBuf;
use thiserror::Error;

pub mod readings;
pub mod workbook;

#[cfg(test)]
pub(crate) mod fixtures;

pub use readings::{
    LoadReport, consolidate_directory, load_paths, load_readings, parse_readings_csv,
    prepare_series,
};

/// Errors that can arise while loading station readings.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A file or directory could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A workbook could not be opened or its first sheet could not be read.
    #[error("failed to read workbook {}: {source}", .path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// The header row lacks a required column.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Nothing usable was read from the input.
    #[error("no readings available: {0}")]
    EmptyInput(String),
}
