/// Run detection over an ordered humidity series.
///
/// The series is reduced once, left to right, into run-length-encoded
/// stretches of `(in_band, start, length)`. Runs are the in-band stretches
/// that meet the minimum length; everything else carries no run id.

use crate::model::{Band, Reading, Run};

// ---------------------------------------------------------------------------
// Run-length encoding
// ---------------------------------------------------------------------------

/// One maximal stretch of readings sharing the same band membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stretch {
    pub in_band: bool,
    pub start: usize,
    pub length: usize,
}

impl Stretch {
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Encodes the band predicate of every reading as consecutive stretches.
///
/// Stretches alternate in `in_band` and cover `[0, series.len())` exactly.
pub fn run_length_encode(series: &[Reading], band: &Band) -> Vec<Stretch> {
    let mut stretches: Vec<Stretch> = Vec::new();

    for (i, reading) in series.iter().enumerate() {
        let in_band = band.contains(reading.humidity);
        match stretches.last_mut() {
            Some(current) if current.in_band == in_band => current.length += 1,
            _ => stretches.push(Stretch { in_band, start: i, length: 1 }),
        }
    }

    stretches
}

// ---------------------------------------------------------------------------
// Run detection
// ---------------------------------------------------------------------------

/// Returns the qualifying in-band runs of `series`, in scan order.
///
/// A stretch shorter than `minimum_run_length` is discarded and does not
/// consume an id. Runs separated by a single out-of-band reading stay
/// distinct, and runs touching either end of the series are kept.
pub fn detect_runs(series: &[Reading], band: &Band, minimum_run_length: usize) -> Vec<Run> {
    run_length_encode(series, band)
        .into_iter()
        .filter(|s| s.in_band && s.length >= minimum_run_length)
        .enumerate()
        .map(|(id, s)| Run {
            id,
            start_index: s.start,
            end_index: s.end(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
