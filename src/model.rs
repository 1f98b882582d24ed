/// Core data types for the humidity monitoring service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O, only types and the small predicates that belong to
/// them (band membership, run length).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Station constants
// ---------------------------------------------------------------------------

/// Lower edge of the elevated-humidity band, in percent.
pub const DEFAULT_BAND_LOW: f64 = 90.0;

/// Upper edge of the elevated-humidity band, in percent.
pub const DEFAULT_BAND_HIGH: f64 = 95.0;

/// Shortest in-band stretch that counts as a run.
pub const DEFAULT_MINIMUM_RUN_LENGTH: usize = 4;

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// A single relative-humidity observation from the weather station.
///
/// Timestamps are station wall-clock time; the station export carries no
/// offset, so readings are kept naive rather than guessing a zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    pub humidity: f64, // percent, 0–100
}

impl Reading {
    pub fn new(timestamp: NaiveDateTime, humidity: f64) -> Self {
        Self { timestamp, humidity }
    }
}

// ---------------------------------------------------------------------------
// Band
// ---------------------------------------------------------------------------

/// Closed humidity interval `[low, high]` treated as "elevated".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Inclusive on both edges: 90.0 and 95.0 are in band.
    pub fn contains(&self, humidity: f64) -> bool {
        self.low <= humidity && humidity <= self.high
    }
}

impl Default for Band {
    fn default() -> Self {
        Self::new(DEFAULT_BAND_LOW, DEFAULT_BAND_HIGH)
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%–{}%", self.low, self.high)
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Classification of a segment, in ascending order of concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Normal,
    Caution,
    Alert,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Normal => write!(f, "Normal"),
            Severity::Caution => write!(f, "Caution"),
            Severity::Alert => write!(f, "Alert"),
        }
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// A maximal in-band stretch that met the minimum run length.
///
/// `end_index` is exclusive. Ids are assigned in scan order starting at 0,
/// counting only qualifying stretches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub id: usize,
    pub start_index: usize,
    pub end_index: usize,
}

impl Run {
    pub fn length(&self) -> usize {
        self.end_index - self.start_index
    }
}

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// A contiguous, classified chunk of the input series.
///
/// Segments returned together partition the series. `value_labels` holds one
/// entry per reading; `hour_labels` is populated only for non-`Normal`
/// segments and is empty otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub start_index: usize,
    pub end_index: usize,
    pub severity: Severity,
    pub readings: Vec<Reading>,
    pub value_labels: Vec<String>,
    pub hour_labels: Vec<String>,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    pub fn is_flagged(&self) -> bool {
        self.severity != Severity::Normal
    }
}
