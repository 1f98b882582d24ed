/// Segment construction: turns an ordered reading series into the classified
/// segments handed to the chart layer.
///
/// # Process
///
/// 1. **Run detection** - `runs::detect_runs` finds the qualifying in-band
///    runs (band + minimum length).
/// 2. **Classification** - each run is looked up in the severity table.
/// 3. **Merging** - runs that classify as `Normal` are absorbed, together
///    with every reading outside a run, into maximal `Normal` segments.
/// 4. **Labeling** - every segment gets rounded humidity labels; flagged
///    segments also get 1-based elapsed-hour labels.
///
/// The output partitions `[0, series.len())` in order. The series must
/// already be sorted by timestamp; it is never re-sorted or mutated here.

use chrono::Duration;

use crate::analysis::runs::detect_runs;
use crate::analysis::severity::{DEFAULT_SEVERITY_RULES, SeverityRule, classify_length};
use crate::model::{
    Band, DEFAULT_MINIMUM_RUN_LENGTH, Reading, Segment, Severity,
};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Segmentation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationConfig {
    /// Humidity interval considered elevated (inclusive)
    pub band: Band,

    /// Shortest in-band stretch that counts as a run
    pub minimum_run_length: usize,

    /// Ordered length → severity table
    pub severity_rules: Vec<SeverityRule>,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            band: Band::default(),
            minimum_run_length: DEFAULT_MINIMUM_RUN_LENGTH,
            severity_rules: DEFAULT_SEVERITY_RULES.to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// 1-based elapsed-hour label per reading, relative to the first reading:
/// `floor((t - t0) / 1h) + 1`, suffixed with `h`.
pub fn label_elapsed_hours(readings: &[Reading]) -> Vec<String> {
    let Some(first) = readings.first() else {
        return Vec::new();
    };
    let hour = Duration::hours(1).num_seconds();

    readings
        .iter()
        .map(|r| {
            let elapsed = (r.timestamp - first.timestamp).num_seconds();
            format!("{}h", elapsed.div_euclid(hour) + 1)
        })
        .collect()
}

/// Humidity rounded to one decimal, e.g. `91.04` → `"91.0"`.
///
/// Exact halves go to the even digit (`92.25` → `"92.2"`), matching how the
/// station dashboard has always labelled points.
pub fn label_humidity_values(readings: &[Reading]) -> Vec<String> {
    readings
        .iter()
        .map(|r| format!("{:.1}", (r.humidity * 10.0).round_ties_even() / 10.0))
        .collect()
}

// ---------------------------------------------------------------------------
// Segment building
// ---------------------------------------------------------------------------

/// Builds segments with an explicit band and minimum run length, using the
/// default severity table.
pub fn build_segments(series: &[Reading], band: &Band, minimum_run_length: usize) -> Vec<Segment> {
    let config = SegmentationConfig {
        band: *band,
        minimum_run_length,
        ..SegmentationConfig::default()
    };
    build_segments_with(series, &config)
}

/// Builds segments under a full `SegmentationConfig`.
pub fn build_segments_with(series: &[Reading], config: &SegmentationConfig) -> Vec<Segment> {
    let runs = detect_runs(series, &config.band, config.minimum_run_length);
    let mut segments = Vec::new();
    let mut cursor = 0;

    for run in &runs {
        let severity = classify_length(run.length(), &config.severity_rules);
        if severity == Severity::Normal {
            // absorbed into the surrounding Normal stretch
            continue;
        }
        if cursor < run.start_index {
            segments.push(make_segment(series, cursor, run.start_index, Severity::Normal));
        }
        segments.push(make_segment(series, run.start_index, run.end_index, severity));
        cursor = run.end_index;
    }

    if cursor < series.len() {
        segments.push(make_segment(series, cursor, series.len(), Severity::Normal));
    }

    log::debug!(
        "segmented {} readings: {} runs, {} segments ({} flagged)",
        series.len(),
        runs.len(),
        segments.len(),
        segments.iter().filter(|s| s.is_flagged()).count()
    );

    segments
}

fn make_segment(series: &[Reading], start: usize, end: usize, severity: Severity) -> Segment {
    let readings = series[start..end].to_vec();
    let value_labels = label_humidity_values(&readings);
    let hour_labels = if severity == Severity::Normal {
        Vec::new()
    } else {
        label_elapsed_hours(&readings)
    };

    Segment {
        start_index: start,
        end_index: end,
        severity,
        readings,
        value_labels,
        hour_labels,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
