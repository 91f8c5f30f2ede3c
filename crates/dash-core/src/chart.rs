//! Chart data model: points, chart kinds and chart payloads

use crate::ChartConfig;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// POINTS
// ============================================================================

/// Category label on the x axis (string or number on the wire)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    Text(String),
    Number(f64),
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for Category {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Single chart data point.
///
/// Sequence position matters: line charts place points by index, not by `x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: Category,
    pub y: f64,
}

impl Point {
    pub fn new(x: impl Into<Category>, y: f64) -> Self {
        Self { x: x.into(), y }
    }
}

// ============================================================================
// CHART KIND
// ============================================================================

/// Supported chart kinds. Anything unrecognized renders as a bar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    #[default]
    #[serde(other)]
    Bar,
}

impl ChartKind {
    /// Resolve a declared kind string, falling back to bar.
    ///
    /// Matching is exact: `"LINE"` or `" line "` are not line charts.
    pub fn from_declared(kind: Option<&str>) -> Self {
        match kind {
            Some("line") => Self::Line,
            Some("bar") => Self::Bar,
            Some(other) => {
                tracing::warn!("Unknown chart type {:?}, rendering as bar", other);
                Self::Bar
            }
            None => Self::Bar,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
        }
    }
}

// ============================================================================
// CHART RESPONSE (wire format)
// ============================================================================

/// `/api/charts/{id}` payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Missing or malformed `points` decode as an empty list
    #[serde(default, deserialize_with = "lenient_points")]
    pub points: Vec<Point>,
}

impl ChartResponse {
    pub fn new(kind: ChartKind, points: Vec<Point>) -> Self {
        Self {
            id: None,
            label: None,
            kind: Some(kind.as_str().to_string()),
            points,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

fn lenient_points<'de, D>(deserializer: D) -> Result<Vec<Point>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = raw else {
        return Ok(Vec::new());
    };

    let total = items.len();
    let points: Vec<Point> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if points.len() != total {
        tracing::warn!("Dropped {} malformed chart points", total - points.len());
    }

    Ok(points)
}

// ============================================================================
// CHART SPEC
// ============================================================================

/// A chart ready for geometry building. Rebuilt wholesale from every response.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub id: String,
    pub label: String,
    pub kind: ChartKind,
    pub points: Vec<Point>,
}

impl ChartSpec {
    pub fn new(id: impl Into<String>, kind: ChartKind, points: Vec<Point>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            kind,
            points,
        }
    }

    /// Build from a response to the request made for `chart`.
    ///
    /// The response's own `id`/`label`/`type` win over the configured ones;
    /// the configured kind hint only applies when the response declares none.
    pub fn from_response(chart: &ChartConfig, response: ChartResponse) -> Self {
        let kind = match (response.kind.as_deref(), chart.kind) {
            (None, Some(hint)) => hint,
            (declared, _) => ChartKind::from_declared(declared),
        };

        Self {
            id: response.id.unwrap_or_else(|| chart.id.clone()),
            label: response.label.unwrap_or_else(|| chart.display_label().to_string()),
            kind,
            points: response.points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
