//! # dash-client
//!
//! Dashboard API client and refresh orchestration.
//!
//! A refresh cycle fetches metrics and table together, then walks the chart
//! queue one request at a time, rendering each chart as its data lands.

pub mod handle;
pub mod http;
pub mod orchestrator;
pub mod queue;

pub use handle::*;
pub use http::*;
pub use orchestrator::*;
pub use queue::*;

use dash_core::{ApiResult, ChartResponse, FilterState, MetricsResponse, TableResponse, endpoints};

/// Default API base URL (same origin as the page)
pub const DEFAULT_API_BASE: &str = "";

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// HTTP API client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Full URL for `path`, with filter query parameters when any are set
    pub fn url(&self, path: &str, filters: &FilterState) -> String {
        let query = filters.query_string();
        if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        }
    }
}

/// Path of a chart endpoint (id is percent-encoded)
pub fn chart_path(id: &str) -> String {
    format!("{}/{}", endpoints::CHARTS, urlencoding::encode(id))
}

// ============================================================================
// API TRAIT
// ============================================================================

/// Data source for a refresh cycle
#[allow(async_fn_in_trait)]
pub trait DashboardApi {
    async fn metrics(&self, filters: &FilterState) -> ApiResult<MetricsResponse>;

    async fn table(&self, filters: &FilterState) -> ApiResult<TableResponse>;

    async fn chart(&self, id: &str, filters: &FilterState) -> ApiResult<ChartResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_without_filters() {
        let config = ApiConfig::default();
        assert_eq!(config.url(endpoints::METRICS, &FilterState::new()), "/api/metrics");
    }

    #[test]
    fn test_url_with_filters() {
        let config = ApiConfig::new("http://localhost:8509/");
        let filters = FilterState::from_raw(Some("2024-01-01"), None);

        assert_eq!(
            config.url(endpoints::TABLE, &filters),
            "http://localhost:8509/api/table?start_date=2024-01-01"
        );
    }

    #[test]
    fn test_chart_path_is_encoded() {
        assert_eq!(chart_path("revenue"), "/api/charts/revenue");
        assert_eq!(chart_path("revenue by/region"), "/api/charts/revenue%20by%2Fregion");
    }
}
