//! Date range filter state and query parameter encoding

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// ISO date format used by date inputs and the API
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Current filter selection.
///
/// Empty fields are never sent as query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw query/input strings
    pub fn from_raw(start: Option<&str>, end: Option<&str>) -> Self {
        Self {
            start_date: start.and_then(parse_date),
            end_date: end.and_then(parse_date),
        }
    }

    pub fn with_start(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn with_end(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Set start date from a raw input value (empty clears)
    pub fn set_start(&mut self, raw: &str) {
        self.start_date = parse_date(raw);
    }

    /// Set end date from a raw input value (empty clears)
    pub fn set_end(&mut self, raw: &str) {
        self.end_date = parse_date(raw);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }

    /// Whether `date` falls inside the (inclusive) range
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date.is_none_or(|start| date >= start)
            && self.end_date.is_none_or(|end| date <= end)
    }

    /// Input value for the start date control
    pub fn start_value(&self) -> String {
        self.start_date.map(format_date).unwrap_or_default()
    }

    /// Input value for the end date control
    pub fn end_value(&self) -> String {
        self.end_date.map(format_date).unwrap_or_default()
    }

    /// Non-empty query parameters, in a stable order
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(start) = self.start_date {
            pairs.push(("start_date", format_date(start)));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date", format_date(end)));
        }
        pairs
    }

    /// Encoded query string without the leading `?` (empty when no filters)
    pub fn query_string(&self) -> String {
        self.query_pairs()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!("Ignoring invalid date filter {:?}: {}", raw, e);
            None
        }
    }
}
