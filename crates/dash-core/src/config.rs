//! Static dashboard configuration supplied by the host page

use crate::{ChartKind, ConfigError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Id of the date range filter control
pub const DATE_RANGE_FILTER: &str = "date_range";

/// Chart declaration: one mount point is created per entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub id: String,
    #[serde(default)]
    pub label: String,
    /// Used only when a response declares no type
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ChartKind>,
}

impl ChartConfig {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: ChartKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Label, or the id when no label was configured
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() { &self.id } else { &self.label }
    }
}

/// Filter control declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl FilterConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            options: Map::new(),
        }
    }

    pub fn date_range() -> Self {
        Self::new(DATE_RANGE_FILTER)
    }
}

/// Dashboard configuration passed to the orchestrator at construction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub charts: Vec<ChartConfig>,
    #[serde(default)]
    pub filters: Vec<FilterConfig>,
}

impl DashboardConfig {
    pub fn new(charts: Vec<ChartConfig>) -> Self {
        Self {
            title: None,
            charts,
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filters.push(filter);
        self
    }

    /// Parse and validate a JSON config document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Chart ids must be non-empty and unique (they key the mount points)
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::with_capacity(self.charts.len());
        for (index, chart) in self.charts.iter().enumerate() {
            if chart.id.trim().is_empty() {
                return Err(ConfigError::EmptyChartId { index });
            }
            if !seen.insert(chart.id.as_str()) {
                return Err(ConfigError::DuplicateChart(chart.id.clone()));
            }
        }
        Ok(())
    }

    pub fn has_filter(&self, id: &str) -> bool {
        self.filters.iter().any(|f| f.id == id)
    }

    /// Whether date inputs are wired to refreshes
    pub fn date_filter_enabled(&self) -> bool {
        self.has_filter(DATE_RANGE_FILTER)
    }

    pub fn chart(&self, id: &str) -> Option<&ChartConfig> {
        self.charts.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "title": "Sales",
            "charts": [
                {"id": "revenue", "label": "Revenue", "type": "line"},
                {"id": "signups"}
            ],
            "filters": [{"id": "date_range", "label": "Dates", "default_days": 30}]
        }"#;
        let config = DashboardConfig::from_json(json).unwrap();

        assert_eq!(config.charts.len(), 2);
        assert_eq!(config.charts[0].kind, Some(ChartKind::Line));
        assert_eq!(config.charts[1].display_label(), "signups");
        assert!(config.date_filter_enabled());
        assert_eq!(config.filters[0].options.get("default_days"), Some(&Value::from(30)));
    }

    #[test]
    fn test_missing_sections_default() {
        let config = DashboardConfig::from_json("{}").unwrap();
        assert!(config.charts.is_empty());
        assert!(!config.date_filter_enabled());
    }

    #[test]
    fn test_duplicate_chart_rejected() {
        let config = DashboardConfig::new(vec![
            ChartConfig::new("a", "A"),
            ChartConfig::new("a", "Again"),
        ]);
        assert_eq!(config.validate(), Err(ConfigError::DuplicateChart("a".into())));
    }

    #[test]
    fn test_empty_chart_id_rejected() {
        let err = DashboardConfig::from_json(r#"{"charts":[{"id":"  "}]}"#).unwrap_err();
        assert_eq!(err, ConfigError::EmptyChartId { index: 0 });
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            DashboardConfig::from_json("{charts"),
            Err(ConfigError::Parse(_))
        ));
    }
}
