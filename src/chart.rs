/// Chart payload for the humidity indicator.
///
/// Converts segments into serializable traces that a plotting front end can
/// draw as-is: one trace per segment, colored by severity, with rounded
/// humidity labels on every point and elapsed-hour labels on flagged points.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::analysis::{SegmentationConfig, build_segments_with};
use crate::model::{Reading, Segment, Severity};

pub const CHART_TITLE: &str = "Humidity Indicator";
pub const NO_DATA_TITLE: &str = "No data for the selected range";
pub const X_AXIS_TITLE: &str = "Date and Time";
pub const Y_AXIS_TITLE: &str = "Relative Humidity (%)";
pub const CHART_HEIGHT: u32 = 500;

/// Line color for each severity.
pub fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Normal => "rgba(0, 0, 255, 0.6)",
        Severity::Caution => "rgba(255, 255, 0, 0.9)",
        Severity::Alert => "rgba(255, 0, 0, 0.9)",
    }
}

fn color_name(severity: Severity) -> &'static str {
    match severity {
        Severity::Normal => "blue",
        Severity::Caution => "yellow",
        Severity::Alert => "red",
    }
}

/// One drawable segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentTrace {
    pub severity: Severity,
    pub color: &'static str,
    pub name: String,
    pub timestamps: Vec<NaiveDateTime>,
    pub humidity: Vec<f64>,
    pub value_labels: Vec<String>,
    pub hour_labels: Vec<String>,
}

impl From<&Segment> for SegmentTrace {
    fn from(segment: &Segment) -> Self {
        SegmentTrace {
            severity: segment.severity,
            color: severity_color(segment.severity),
            name: segment.severity.to_string(),
            timestamps: segment.readings.iter().map(|r| r.timestamp).collect(),
            humidity: segment.readings.iter().map(|r| r.humidity).collect(),
            value_labels: segment.value_labels.clone(),
            hour_labels: segment.hour_labels.clone(),
        }
    }
}

/// Complete figure description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub height: u32,
    pub legend: Vec<String>,
    pub traces: Vec<SegmentTrace>,
}

impl ChartPayload {
    pub fn has_data(&self) -> bool {
        !self.traces.is_empty()
    }
}

/// Explanatory lines for the legend, derived from the configured table.
pub fn legend_lines(config: &SegmentationConfig) -> Vec<String> {
    let band = config.band;
    let mut lines: Vec<String> = config
        .severity_rules
        .iter()
        .filter(|rule| rule.severity != Severity::Normal)
        .map(|rule| {
            let span = match rule.max_length {
                Some(max) if max == rule.min_length => max.to_string(),
                Some(max) => format!("{} to {}", rule.min_length, max),
                None => format!("{} or more", rule.min_length),
            };
            format!(
                "{} consecutive readings between {}% and {}% → {} line",
                span,
                band.low,
                band.high,
                color_name(rule.severity)
            )
        })
        .collect();
    lines.push(format!("Humidity below {}% → blue line", band.low));
    lines
}

/// Segments `series` and packages the result for drawing.
///
/// An empty series produces a payload titled "No data for the selected
/// range" with no traces.
pub fn build_chart(series: &[Reading], config: &SegmentationConfig) -> ChartPayload {
    let (title, traces) = if series.is_empty() {
        (NO_DATA_TITLE, Vec::new())
    } else {
        let segments = build_segments_with(series, config);
        (CHART_TITLE, segments.iter().map(SegmentTrace::from).collect())
    };

    ChartPayload {
        title: title.to_string(),
        x_axis_title: X_AXIS_TITLE.to_string(),
        y_axis_title: Y_AXIS_TITLE.to_string(),
        height: CHART_HEIGHT,
        legend: legend_lines(config),
        traces,
    }
}
