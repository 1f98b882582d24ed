/// Calendar filtering applied to a prepared series before segmentation.
///
/// Filters by year, month and ISO week number. Each list is a set of
/// accepted values; an empty list places no constraint. With no filter at
/// all, the default view is the latest ISO week of the latest year in the
/// data. The segmentation engine itself never looks at calendar fields.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::Reading;

/// Accepted years, months (1–12) and ISO weeks (1–53).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFilter {
    #[serde(default)]
    pub years: Vec<i32>,
    #[serde(default)]
    pub months: Vec<u32>,
    #[serde(default)]
    pub weeks: Vec<u32>,
}

impl CalendarFilter {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty() && self.months.is_empty() && self.weeks.is_empty()
    }

    pub fn matches(&self, reading: &Reading) -> bool {
        let date = reading.timestamp.date();
        (self.years.is_empty() || self.years.contains(&date.year()))
            && (self.months.is_empty() || self.months.contains(&date.month()))
            && (self.weeks.is_empty() || self.weeks.contains(&date.iso_week().week()))
    }
}

/// Sorted distinct calendar values present in a series, for building
/// filter choices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub months: Vec<u32>,
    pub weeks: Vec<u32>,
}

pub fn filter_options(series: &[Reading]) -> FilterOptions {
    let mut years = BTreeSet::new();
    let mut months = BTreeSet::new();
    let mut weeks = BTreeSet::new();

    for reading in series {
        let date = reading.timestamp.date();
        years.insert(date.year());
        months.insert(date.month());
        weeks.insert(date.iso_week().week());
    }

    FilterOptions {
        years: years.into_iter().collect(),
        months: months.into_iter().collect(),
        weeks: weeks.into_iter().collect(),
    }
}

/// Latest ISO week of the latest calendar year present in `series`.
///
/// Year here is the calendar year of the reading (not the ISO week-year),
/// matching how the year filter is applied. `None` for an empty series.
pub fn default_window(series: &[Reading]) -> Option<CalendarFilter> {
    let latest_year = series.iter().map(|r| r.timestamp.date().year()).max()?;
    let latest_week = series
        .iter()
        .map(|r| r.timestamp.date())
        .filter(|d| d.year() == latest_year)
        .map(|d| d.iso_week().week())
        .max()?;

    Some(CalendarFilter {
        years: vec![latest_year],
        months: Vec::new(),
        weeks: vec![latest_week],
    })
}

/// Readings matching `filter`, in original order. An empty filter selects
/// the default window.
pub fn apply(series: &[Reading], filter: &CalendarFilter) -> Vec<Reading> {
    let effective = if filter.is_empty() {
        match default_window(series) {
            Some(window) => window,
            None => return Vec::new(),
        }
    } else {
        filter.clone()
    };

    let selected: Vec<Reading> = series.iter().filter(|r| effective.matches(r)).copied().collect();
    log::debug!(
        "calendar filter {:?} selected {} of {} readings",
        effective,
        selected.len(),
        series.len()
    );
    selected
}
