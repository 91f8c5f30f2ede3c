//! Metric card and table payloads

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Endpoint paths, relative to the API base URL
pub mod endpoints {
    pub const CONFIG: &str = "/api/config";
    pub const METRICS: &str = "/api/metrics";
    pub const TABLE: &str = "/api/table";
    pub const CHARTS: &str = "/api/charts";
}

// ============================================================================
// METRICS
// ============================================================================

/// KPI card value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            id: None,
            label: label.into(),
            value: Some(value),
            formatted: None,
        }
    }

    pub fn with_formatted(mut self, formatted: impl Into<String>) -> Self {
        self.formatted = Some(formatted.into());
        self
    }

    /// Pre-formatted string if the API sent one, raw value otherwise
    pub fn display_value(&self) -> String {
        match (&self.formatted, self.value) {
            (Some(formatted), _) => formatted.clone(),
            (None, Some(value)) => value.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// `/api/metrics` payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsResponse {
    #[serde(default)]
    pub metrics: Vec<Metric>,
}

// ============================================================================
// TABLE
// ============================================================================

/// One table row, keyed by column name (server key order preserved)
pub type Row = Map<String, Value>;

/// `/api/table` payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub rows: Vec<Row>,
}

pub type TableResponse = Table;

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column set, taken from the keys of the first row
    pub fn columns(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Display text for one cell; missing and null cells are blank
    pub fn cell(row: &Row, column: &str) -> String {
        match row.get(column) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_prefers_formatted() {
        let metric = Metric::new("Revenue", 1234.5).with_formatted("$1,234.50");
        assert_eq!(metric.display_value(), "$1,234.50");

        let raw = Metric::new("Orders", 42.0);
        assert_eq!(raw.display_value(), "42");
    }

    #[test]
    fn test_metrics_response_parsing() {
        let json = r#"{"metrics":[{"id":"total","label":"Total","value":10.5,"formatted":"10.50"},{"label":"Bare","value":null}]}"#;
        let resp: MetricsResponse = serde_json::from_str(json).unwrap();

        assert_eq!(resp.metrics.len(), 2);
        assert_eq!(resp.metrics[0].display_value(), "10.50");
        assert_eq!(resp.metrics[1].display_value(), "");
    }

    #[test]
    fn test_table_columns_follow_first_row() {
        let json = r#"{"rows":[{"date":"2024-01-02","region":"EU","revenue":12.5},{"date":"2024-01-01","region":null}]}"#;
        let table: Table = serde_json::from_str(json).unwrap();

        assert_eq!(table.columns(), vec!["date", "region", "revenue"]);
        assert_eq!(Table::cell(&table.rows[0], "revenue"), "12.5");
        assert_eq!(Table::cell(&table.rows[1], "region"), "");
        assert_eq!(Table::cell(&table.rows[1], "revenue"), "");
    }

    #[test]
    fn test_empty_table_has_no_columns() {
        let table: Table = serde_json::from_str("{}").unwrap();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }
}
