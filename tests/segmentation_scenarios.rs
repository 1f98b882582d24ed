/// Integration tests for the segmentation engine's public API.
///
/// These exercise `build_segments` end to end on hourly series:
/// 1. Reference scenarios (short caution run, all-normal series, tail alert)
/// 2. Threshold boundaries for run length
/// 3. Structural properties over many generated series (partition,
///    minimum length, band containment, idempotence)
///
/// Run with: cargo test --test segmentation_scenarios

use chrono::{Duration, NaiveDate, NaiveDateTime};
use humon_service::analysis::{build_segments, detect_runs, label_elapsed_hours};
use humon_service::model::{Band, Reading, Segment, Severity};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 10)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid start time")
}

fn hourly(values: &[f64]) -> Vec<Reading> {
    values
        .iter()
        .enumerate()
        .map(|(i, &h)| Reading::new(start() + Duration::hours(i as i64), h))
        .collect()
}

fn summary(segments: &[Segment]) -> Vec<(usize, usize, Severity)> {
    segments
        .iter()
        .map(|s| (s.start_index, s.end_index, s.severity))
        .collect()
}

/// Deterministic pseudo-random humidity series (LCG), biased so that long
/// in-band stretches are common.
fn generated_series(seed: u64, len: usize) -> Vec<Reading> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut in_band = false;
    let mut values = Vec::with_capacity(len);
    for _ in 0..len {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let roll = (state >> 33) % 100;
        if roll < 20 {
            in_band = !in_band;
        }
        let jitter = ((state >> 17) % 50) as f64 / 10.0; // 0.0..5.0
        values.push(if in_band { 90.0 + jitter } else { 70.0 + jitter * 3.0 });
    }
    hourly(&values)
}

fn assert_partition(segments: &[Segment], len: usize) {
    let mut expected_start = 0;
    for segment in segments {
        assert_eq!(segment.start_index, expected_start, "gap or overlap at {}", expected_start);
        assert!(segment.end_index > segment.start_index, "segments must be non-empty");
        assert_eq!(segment.readings.len(), segment.len());
        expected_start = segment.end_index;
    }
    assert_eq!(expected_start, len, "segments must cover the whole series");
}

// ---------------------------------------------------------------------------
// 1. Reference scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_scenario_short_caution_run_between_normal_stretches() {
    let series = hourly(&[88.0, 91.0, 92.0, 93.0, 94.0, 93.0, 89.0, 85.0, 91.0, 92.0]);
    let band = Band::new(90.0, 95.0);

    let runs = detect_runs(&series, &band, 4);
    assert_eq!(runs.len(), 1, "the trailing 2-long stretch must be discarded");
    assert_eq!((runs[0].start_index, runs[0].end_index), (1, 6));

    let segments = build_segments(&series, &band, 4);
    assert_eq!(
        summary(&segments),
        vec![
            (0, 1, Severity::Normal),
            (1, 6, Severity::Caution),
            (6, 10, Severity::Normal),
        ]
    );
    assert_eq!(segments[1].hour_labels, vec!["1h", "2h", "3h", "4h", "5h"]);
    assert_eq!(segments[1].value_labels, vec!["91.0", "92.0", "93.0", "94.0", "93.0"]);
    assert!(segments[2].hour_labels.is_empty());
}

#[test]
fn test_scenario_all_out_of_band_is_one_normal_segment() {
    let values: Vec<f64> = (0..100).map(|i| 60.0 + (i % 25) as f64).collect();
    let series = hourly(&values);
    let segments = build_segments(&series, &Band::default(), 4);

    assert_eq!(summary(&segments), vec![(0, 100, Severity::Normal)]);
}

#[test]
fn test_scenario_alert_run_at_tail_is_detected() {
    let mut values = vec![70.0, 75.0, 80.0];
    values.extend([92.0; 9]);
    let series = hourly(&values);
    let segments = build_segments(&series, &Band::default(), 4);

    assert_eq!(
        summary(&segments),
        vec![(0, 3, Severity::Normal), (3, 12, Severity::Alert)]
    );
    assert_eq!(segments[1].hour_labels.last().map(String::as_str), Some("9h"));
}

#[test]
fn test_empty_series_yields_no_segments() {
    assert!(build_segments(&[], &Band::default(), 4).is_empty());
}

// ---------------------------------------------------------------------------
// 2. Threshold boundaries
// ---------------------------------------------------------------------------

#[test]
fn test_run_length_boundaries() {
    let cases = [
        (3, Severity::Normal),
        (4, Severity::Normal),
        (5, Severity::Caution),
        (8, Severity::Caution),
        (9, Severity::Alert),
    ];
    for (length, expected) in cases {
        let mut values = vec![50.0];
        values.extend(std::iter::repeat_n(93.0, length));
        values.push(50.0);
        let series = hourly(&values);

        let segments = build_segments(&series, &Band::default(), 4);
        let worst = segments.iter().map(|s| s.severity).max();
        assert_eq!(worst, Some(expected), "run of {} readings", length);
        if expected == Severity::Normal {
            assert_eq!(segments.len(), 1, "length {} must merge into one Normal segment", length);
        }
    }
}

#[test]
fn test_elapsed_hour_at_three_hours_is_fourth_label() {
    let readings = vec![
        Reading::new(start(), 91.0),
        Reading::new(start() + Duration::minutes(90), 91.0),
        Reading::new(start() + Duration::hours(3), 91.0),
    ];
    assert_eq!(label_elapsed_hours(&readings), vec!["1h", "2h", "4h"]);
}

// ---------------------------------------------------------------------------
// 3. Structural properties
// ---------------------------------------------------------------------------

#[test]
fn test_segments_partition_generated_series() {
    for seed in 0..200 {
        let series = generated_series(seed, (seed as usize * 7) % 150);
        let segments = build_segments(&series, &Band::default(), 4);
        assert_partition(&segments, series.len());
    }
}

#[test]
fn test_flagged_segments_are_long_and_in_band() {
    let band = Band::default();
    for seed in 0..200 {
        let series = generated_series(seed, 120);
        for segment in build_segments(&series, &band, 4).iter().filter(|s| s.is_flagged()) {
            assert!(segment.len() >= 5, "seed {}: flagged segment of {}", seed, segment.len());
            assert!(
                segment.readings.iter().all(|r| band.contains(r.humidity)),
                "seed {}: flagged segment leaves the band",
                seed
            );
            assert_eq!(segment.hour_labels.len(), segment.len());
        }
    }
}

#[test]
fn test_no_two_normal_segments_are_adjacent() {
    for seed in 0..200 {
        let series = generated_series(seed, 120);
        let segments = build_segments(&series, &Band::default(), 4);
        for pair in segments.windows(2) {
            assert!(
                pair[0].is_flagged() || pair[1].is_flagged(),
                "seed {}: Normal stretches must be merged",
                seed
            );
        }
    }
}

#[test]
fn test_build_segments_is_idempotent() {
    let series = generated_series(42, 300);
    let first = build_segments(&series, &Band::default(), 4);
    let second = build_segments(&series, &Band::default(), 4);
    assert_eq!(first, second);
}

#[test]
fn test_concurrent_callers_get_identical_results() {
    let series = generated_series(7, 500);
    let expected = build_segments(&series, &Band::default(), 4);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| build_segments(&series, &Band::default(), 4)))
            .collect();
        for handle in handles {
            let result = handle.join().expect("segmentation thread panicked");
            assert_eq!(result, expected);
        }
    });
}
