/// HTTP endpoint for querying humidity segments
///
/// Provides a simple JSON API for the plotting front end over a read-only
/// snapshot of the loaded series. Every request recomputes segments from
/// that snapshot.
///
/// Endpoints:
/// - GET /segments?year=2025&month=3&week=11 - Chart payload for the filter
/// - GET /options - Years, months and weeks present in the data
/// - GET /health - Service health check
///
/// Query parameters may repeat (`week=10&week=11`) or carry comma lists
/// (`week=10,11`). No parameters selects the latest week of the latest year.

use crate::analysis::SegmentationConfig;
use crate::chart::build_chart;
use crate::filter::{self, CalendarFilter};
use crate::model::Reading;
use std::str::FromStr;

const ENDPOINTS: [&str; 3] = ["/health", "/options", "/segments?year=&month=&week="];

// ---------------------------------------------------------------------------
// Server state
// ---------------------------------------------------------------------------

/// Snapshot served by the endpoint.
pub struct EndpointState {
    pub series: Vec<Reading>,
    pub config: SegmentationConfig,
}

// ---------------------------------------------------------------------------
// Query parsing
// ---------------------------------------------------------------------------

fn parse_list<T: FromStr>(key: &str, raw: &str, out: &mut Vec<T>) -> Result<(), String> {
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let value = part
            .parse()
            .map_err(|_| format!("invalid value for {}: {}", key, part))?;
        out.push(value);
    }
    Ok(())
}

/// Parses the query string of a `/segments` request into a filter.
pub fn parse_filter_query(query: &str) -> Result<CalendarFilter, String> {
    let mut filter = CalendarFilter::default();

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
        let value = urlencoding::decode(raw)
            .map_err(|e| format!("invalid encoding for {}: {}", key, e))?;

        match key {
            "year" => parse_list(key, &value, &mut filter.years)?,
            "month" => parse_list(key, &value, &mut filter.months)?,
            "week" => parse_list(key, &value, &mut filter.weeks)?,
            _ => return Err(format!("unknown query parameter: {}", key)),
        }
    }

    if let Some(m) = filter.months.iter().find(|m| !(1..=12).contains(*m)) {
        return Err(format!("month out of range: {}", m));
    }
    if let Some(w) = filter.weeks.iter().find(|w| !(1..=53).contains(*w)) {
        return Err(format!("week out of range: {}", w));
    }

    Ok(filter)
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Routes a request URL to a status code and JSON body.
pub fn route(url: &str, state: &EndpointState) -> (u16, serde_json::Value) {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));

    match path {
        "/health" => handle_health(state),
        "/options" => (200, serde_json::json!(filter::filter_options(&state.series))),
        "/segments" => handle_segments(query, state),
        _ => (
            404,
            serde_json::json!({
                "error": "Not found",
                "available_endpoints": ENDPOINTS
            }),
        ),
    }
}

/// Handle /health endpoint
fn handle_health(state: &EndpointState) -> (u16, serde_json::Value) {
    (
        200,
        serde_json::json!({
            "status": "ok",
            "service": "humon_service",
            "version": env!("CARGO_PKG_VERSION"),
            "readings": state.series.len()
        }),
    )
}

/// Handle /segments endpoint
fn handle_segments(query: &str, state: &EndpointState) -> (u16, serde_json::Value) {
    let filter = match parse_filter_query(query) {
        Ok(filter) => filter,
        Err(e) => {
            return (400, serde_json::json!({ "error": e, "query": query }));
        }
    };

    let selected = filter::apply(&state.series, &filter);
    let chart = build_chart(&selected, &state.config);

    match serde_json::to_value(&chart) {
        Ok(body) => (200, body),
        Err(e) => (500, serde_json::json!({ "error": e.to_string() })),
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server on the specified port
pub fn start_endpoint_server(port: u16, state: EndpointState) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    println!("📡 HTTP endpoint listening on http://0.0.0.0:{}", port);
    println!("   GET /segments?year=&month=&week= - Segmented chart data");
    println!("   GET /options - Available filter values");
    println!("   GET /health - Service health check\n");

    for request in server.incoming_requests() {
        let (status, body) = route(request.url(), &state);
        log::debug!("{} {} -> {}", request.method(), request.url(), status);

        let response = match create_response(status, &body) {
            Ok(response) => response,
            Err(e) => {
                log::error!("failed to build response: {}", e);
                continue;
            }
        };
        if let Err(e) = request.respond(response) {
            log::warn!("failed to send response: {}", e);
        }
    }

    Ok(())
}

/// Create HTTP response with JSON body
fn create_response(
    status_code: u16,
    json: &serde_json::Value,
) -> Result<tiny_http::Response<std::io::Cursor<Vec<u8>>>, String> {
    let body = serde_json::to_string_pretty(json).map_err(|e| e.to_string())?;
    let header = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|_| "invalid content-type header".to_string())?;

    Ok(tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(header))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
