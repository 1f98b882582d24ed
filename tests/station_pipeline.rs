/// Integration tests for the full station pipeline:
/// CSV files on disk → consolidation → calendar filter → segments → chart.
///
/// Run with: cargo test --test station_pipeline

use chrono::{Duration, NaiveDate};
use humon_service::chart::{NO_DATA_TITLE, build_chart};
use humon_service::config;
use humon_service::endpoint::{EndpointState, route};
use humon_service::filter::{self, CalendarFilter};
use humon_service::ingest::{self, IngestError};
use humon_service::model::Severity;
use std::fs;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Writes one CSV per day, hourly rows, humidity from `values` in order.
/// Day-first dates, like the dashboard's daily files.
fn write_daily_files(dir: &Path, first_day: NaiveDate, values: &[f64]) {
    let start = first_day.and_hms_opt(0, 0, 0).expect("midnight");
    let mut by_day: Vec<(String, String)> = Vec::new();

    for (i, value) in values.iter().enumerate() {
        let ts = start + Duration::hours(i as i64);
        let file = format!("{}.csv", ts.format("%Y-%m-%d"));
        let row = format!("{},{} %\n", ts.format("%d/%m/%Y %H:%M"), value);
        match by_day.last_mut() {
            Some((name, body)) if *name == file => body.push_str(&row),
            _ => by_day.push((file, format!("Fecha,Humedad Relativa (%)\n{}", row))),
        }
    }

    for (name, body) in by_day {
        fs::write(dir.join(name), body).expect("write daily file");
    }
}

fn march_10() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_daily_files_consolidate_into_one_sorted_series() {
    let dir = tempfile::tempdir().expect("tempdir");
    let values: Vec<f64> = (0..48).map(|i| 70.0 + (i % 10) as f64).collect();
    write_daily_files(dir.path(), march_10(), &values);

    let report = ingest::consolidate_directory(dir.path()).expect("directory should load");

    assert_eq!(report.readings.len(), 48);
    assert_eq!(report.rows_dropped, 0);
    assert!(report.readings.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[test]
fn test_run_spanning_midnight_is_one_segment() {
    // 20:00 on day 1 through 05:00 on day 2 in band: a 10-hour run split
    // across two daily files must still be a single Alert segment.
    let dir = tempfile::tempdir().expect("tempdir");
    let mut values = vec![80.0; 20];
    values.extend([92.0; 10]);
    values.extend([80.0; 6]);
    write_daily_files(dir.path(), march_10(), &values);

    let report = ingest::consolidate_directory(dir.path()).expect("directory should load");
    let chart = build_chart(&report.readings, &Default::default());

    let severities: Vec<Severity> = chart.traces.iter().map(|t| t.severity).collect();
    assert_eq!(severities, vec![Severity::Normal, Severity::Alert, Severity::Normal]);
    assert_eq!(chart.traces[1].hour_labels.len(), 10);
    assert_eq!(chart.traces[1].hour_labels[9], "10h");
}

#[test]
fn test_week_filter_then_segment() {
    // Two weeks of data; only the second week contains a caution run.
    let dir = tempfile::tempdir().expect("tempdir");
    let mut values = vec![75.0; 24 * 7];
    values.extend([75.0; 10]);
    values.extend([93.0; 6]);
    values.extend([75.0; 10]);
    write_daily_files(dir.path(), march_10(), &values);

    let series = ingest::consolidate_directory(dir.path())
        .expect("directory should load")
        .readings;

    let week_11 = CalendarFilter { weeks: vec![11], ..Default::default() };
    let chart = build_chart(&filter::apply(&series, &week_11), &Default::default());
    assert!(chart.traces.iter().all(|t| t.severity == Severity::Normal));

    // Default window is the latest week (12).
    let chart = build_chart(&filter::apply(&series, &CalendarFilter::default()), &Default::default());
    assert!(chart.traces.iter().any(|t| t.severity == Severity::Caution));
}

#[test]
fn test_filter_without_matches_reports_no_data() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_daily_files(dir.path(), march_10(), &[91.0; 6]);
    let series = ingest::consolidate_directory(dir.path()).expect("load").readings;

    let filter = CalendarFilter { years: vec![2019], ..Default::default() };
    let chart = build_chart(&filter::apply(&series, &filter), &Default::default());
    assert_eq!(chart.title, NO_DATA_TITLE);
    assert!(chart.traces.is_empty());
}

#[test]
fn test_mixed_file_and_directory_inputs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let daily = dir.path().join("daily");
    fs::create_dir(&daily).expect("mkdir");
    write_daily_files(&daily, march_10(), &[80.0; 4]);

    let extra = dir.path().join("extra.csv");
    fs::write(&extra, "Fecha,Humedad Relativa (%)\n2025-03-10 04:00:00,81\n2025-03-10 00:00:00,99\n")
        .expect("write extra");

    let paths: Vec<PathBuf> = vec![daily, extra];
    let report = ingest::load_paths(&paths).expect("inputs should load");

    assert_eq!(report.readings.len(), 5, "duplicate 00:00 reading should be dropped");
    assert_eq!(report.readings[0].humidity, 80.0, "first occurrence wins");
}

#[test]
fn test_empty_directory_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = ingest::consolidate_directory(dir.path()).unwrap_err();
    assert!(matches!(err, IngestError::EmptyInput(_)), "got {:?}", err);
}

#[test]
fn test_custom_config_changes_classification() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("humon.toml");
    fs::write(
        &config_path,
        "[band]\nlow = 85.0\nhigh = 95.0\n\n[[severity]]\nmin_length = 4\nseverity = \"Alert\"\n",
    )
    .expect("write config");
    let config = config::load_config(&config_path).expect("config should load");

    let data = dir.path().join("data");
    fs::create_dir(&data).expect("mkdir");
    write_daily_files(&data, march_10(), &[70.0, 86.0, 87.0, 88.0, 89.0, 70.0]);
    let series = ingest::consolidate_directory(&data).expect("load").readings;

    let chart = build_chart(&series, &config);
    let severities: Vec<Severity> = chart.traces.iter().map(|t| t.severity).collect();
    assert_eq!(severities, vec![Severity::Normal, Severity::Alert, Severity::Normal]);
}

#[test]
fn test_endpoint_serves_segments_for_loaded_series() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut values = vec![80.0; 3];
    values.extend([93.0; 9]);
    write_daily_files(dir.path(), march_10(), &values);
    let series = ingest::consolidate_directory(dir.path()).expect("load").readings;

    let state = EndpointState { series, config: Default::default() };
    let (status, body) = route("/segments?year=2025&week=11", &state);

    assert_eq!(status, 200);
    assert_eq!(body["traces"][1]["severity"], "Alert");
    assert_eq!(body["traces"][1]["color"], "rgba(255, 0, 0, 0.9)");
}
