//! Server-side dashboard configuration (YAML)
//!
//! Superset of the client config: adds the data source, the date column and
//! the column/aggregation behind every metric and chart.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use dash_core::{ChartConfig, ChartKind, ConfigError, DashboardConfig, FilterConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config bundled with the server, matching the generated sample dataset
const SAMPLE_CONFIG: &str = include_str!("../config/dashboard.yml");

#[derive(Debug, Error)]
pub enum ServerConfigError {
    #[error("Dashboard config not found at: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read dashboard config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dashboard config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Invalid(#[from] ConfigError),

    #[error("Duplicate metric id '{0}'")]
    DuplicateMetric(String),

    #[error("Ratio metric '{0}' needs both 'numerator' and 'denominator'")]
    IncompleteRatio(String),
}

// ============================================================================
// AGGREGATIONS
// ============================================================================

/// KPI aggregation over the filtered rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricAggregation {
    #[default]
    Sum,
    Mean,
    Count,
    Nunique,
    Ratio,
}

/// Per-group aggregation for chart series. Unknown names fall back to sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartAggregation {
    Mean,
    #[default]
    #[serde(other)]
    Sum,
}

// ============================================================================
// DEFINITIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDef {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub aggregation: MetricAggregation,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub numerator: Option<String>,
    #[serde(default)]
    pub denominator: Option<String>,
    /// `,d`, `$,.2f` or a `{}` template
    #[serde(default)]
    pub format: Option<String>,
}

impl MetricDef {
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDef {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub x: String,
    pub y: String,
    #[serde(default)]
    pub aggregation: ChartAggregation,
}

impl ChartDef {
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    /// Declared type as sent on the wire (`bar` when absent)
    pub fn kind_name(&self) -> &str {
        self.kind.as_deref().unwrap_or(ChartKind::Bar.as_str())
    }

    fn client(&self) -> ChartConfig {
        let chart = ChartConfig::new(self.id.clone(), self.display_label());
        match self.kind.as_deref() {
            Some(kind) => chart.with_kind(ChartKind::from_declared(Some(kind))),
            None => chart,
        }
    }
}

// ============================================================================
// SERVER CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub title: Option<String>,
    /// CSV path, resolved relative to the working directory
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default)]
    pub date_column: Option<String>,
    pub metrics: Vec<MetricDef>,
    pub charts: Vec<ChartDef>,
    #[serde(default)]
    pub filters: Vec<FilterConfig>,
}

impl ServerConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ServerConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ServerConfigError> {
        if !path.exists() {
            return Err(ServerConfigError::NotFound(path.to_path_buf()));
        }
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Bundled config describing the generated sales dataset
    pub fn sample() -> Result<Self, ServerConfigError> {
        Self::from_yaml(SAMPLE_CONFIG)
    }

    pub fn validate(&self) -> Result<(), ServerConfigError> {
        self.client_config().validate()?;

        let mut seen = HashSet::with_capacity(self.metrics.len());
        for metric in &self.metrics {
            if !seen.insert(metric.id.as_str()) {
                return Err(ServerConfigError::DuplicateMetric(metric.id.clone()));
            }
            if metric.aggregation == MetricAggregation::Ratio
                && (metric.numerator.is_none() || metric.denominator.is_none())
            {
                return Err(ServerConfigError::IncompleteRatio(metric.id.clone()));
            }
        }
        Ok(())
    }

    /// Client-safe subset: no data source, no column mappings
    pub fn client_config(&self) -> DashboardConfig {
        DashboardConfig {
            title: self.title.clone(),
            charts: self.charts.iter().map(ChartDef::client).collect(),
            filters: self.filters.clone(),
        }
    }

    pub fn chart(&self, id: &str) -> Option<&ChartDef> {
        self.charts.iter().find(|c| c.id == id)
    }
}
