//! Humidity Monitoring Service - CLI
//!
//! Loads weather station readings, applies the calendar filter, segments
//! the series into Normal / Caution / Alert stretches and either prints a
//! summary, prints the chart payload as JSON, or serves it over HTTP.
//!
//! Usage:
//!   cargo run --release -- --data estacion.csv
//!   cargo run --release -- --data datos_diarios/ --year 2025 --week 11
//!   cargo run --release -- --data estacion.csv --json
//!   cargo run --release -- --data estacion.csv --endpoint 10000
//!
//! Options:
//!   --data PATH       CSV/.xlsx file or directory of daily files (repeatable)
//!   --config FILE     Segmentation settings (TOML)
//!   --year Y          Calendar year filter (repeatable, or comma list)
//!   --month M         Month filter, 1-12 (repeatable, or comma list)
//!   --week W          ISO week filter, 1-53 (repeatable, or comma list)
//!   --json            Print the chart payload instead of the summary
//!   --endpoint PORT   Serve the loaded series over HTTP (filters come from
//!                     the /segments query string, not --year/--month/--week)
//!
//! Environment:
//!   HUMON_DATA   - default data path when --data is not given
//!   HUMON_CONFIG - default configuration file
//!   RUST_LOG     - log filter (default: info)

use humon_service::analysis::build_segments_with;
use humon_service::chart::build_chart;
use humon_service::config;
use humon_service::endpoint::{self, EndpointState};
use humon_service::filter::{self, CalendarFilter};
use humon_service::ingest;
use humon_service::logging;
use humon_service::model::Severity;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Parsed command-line options
#[derive(Debug, Default)]
struct CliArgs {
    data: Vec<PathBuf>,
    config: Option<PathBuf>,
    filter: CalendarFilter,
    json: bool,
    endpoint_port: Option<u16>,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {} --data PATH [--data PATH]... [--config FILE] [--year Y] [--month M] [--week W] [--json] [--endpoint PORT]",
        program
    )
}

fn push_values<T: FromStr>(flag: &str, raw: &str, out: &mut Vec<T>) -> Result<(), String> {
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let value = part
            .parse()
            .map_err(|_| format!("{} expects a number, got '{}'", flag, part))?;
        out.push(value);
    }
    Ok(())
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut parsed = CliArgs::default();

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--json" => {
                parsed.json = true;
                i += 1;
                continue;
            }
            "--data" | "--config" | "--year" | "--month" | "--week" | "--endpoint" => {}
            _ => return Err(format!("Unknown argument: {}", flag)),
        }

        let value = args
            .get(i + 1)
            .ok_or_else(|| format!("{} requires a value", flag))?;
        match flag {
            "--data" => parsed.data.push(PathBuf::from(value)),
            "--config" => parsed.config = Some(PathBuf::from(value)),
            "--year" => push_values(flag, value, &mut parsed.filter.years)?,
            "--month" => push_values(flag, value, &mut parsed.filter.months)?,
            "--week" => push_values(flag, value, &mut parsed.filter.weeks)?,
            "--endpoint" => {
                let port = value
                    .parse()
                    .map_err(|_| format!("--endpoint requires a port number, got '{}'", value))?;
                parsed.endpoint_port = Some(port);
            }
            _ => return Err(format!("Unknown argument: {}", flag)),
        }
        i += 2;
    }

    // HTTP clients pick the calendar window per request via /segments
    if parsed.endpoint_port.is_some() && !parsed.filter.is_empty() {
        return Err(
            "--year/--month/--week cannot be combined with --endpoint; pass them as /segments query parameters"
                .to_string(),
        );
    }

    Ok(parsed)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logging::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("humon_service");
    let mut cli = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("{}", usage(program));
        std::process::exit(1);
    });

    if cli.data.is_empty() {
        match env::var("HUMON_DATA") {
            Ok(path) if !path.trim().is_empty() => cli.data.push(PathBuf::from(path.trim())),
            _ => {
                eprintln!("Error: no data source given (use --data or set HUMON_DATA)");
                eprintln!("{}", usage(program));
                std::process::exit(1);
            }
        }
    }

    // Load segmentation settings
    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::load_from_env()?,
    };

    // Load readings
    let report = ingest::load_paths(&cli.data)?;
    let series = report.readings;

    if let Some(port) = cli.endpoint_port {
        println!("💧 Humidity Monitoring Service");
        println!("==============================\n");
        println!("✓ Loaded {} readings ({} rows dropped)\n", series.len(), report.rows_dropped);
        endpoint::start_endpoint_server(port, EndpointState { series, config })?;
        return Ok(());
    }

    let selected = filter::apply(&series, &cli.filter);

    if cli.json {
        let chart = build_chart(&selected, &config);
        println!("{}", serde_json::to_string_pretty(&chart)?);
        return Ok(());
    }

    println!("💧 Humidity Indicator");
    println!("=====================\n");
    println!("✓ Loaded {} readings ({} rows read, {} dropped)", series.len(), report.rows_read, report.rows_dropped);
    println!("  Band: {}, minimum run: {} readings", config.band, config.minimum_run_length);
    println!("  Selected: {} readings\n", selected.len());

    if selected.is_empty() {
        println!("ℹ️  No data for the selected range.");
        return Ok(());
    }

    let segments = build_segments_with(&selected, &config);
    println!("{:<10} {:<20} {:<20} {:>8}", "Severity", "From", "To", "Readings");
    println!("{}", "-".repeat(61));
    for segment in &segments {
        let (Some(first), Some(last)) = (segment.readings.first(), segment.readings.last()) else {
            continue;
        };
        println!(
            "{:<10} {:<20} {:<20} {:>8}",
            segment.severity.to_string(),
            first.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            last.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            segment.len()
        );
    }

    let count = |severity: Severity| segments.iter().filter(|s| s.severity == severity).count();
    println!("\n{}", "=".repeat(50));
    println!("Summary:");
    println!("  Normal segments:  {}", count(Severity::Normal));
    println!("  Caution segments: {}", count(Severity::Caution));
    println!("  Alert segments:   {}", count(Severity::Alert));
    println!("{}", "=".repeat(50));

    Ok(())
}
