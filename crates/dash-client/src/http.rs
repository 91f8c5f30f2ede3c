//! HTTP implementation of the dashboard API (browser fetch via gloo-net)

use crate::{chart_path, ApiConfig, DashboardApi};
use dash_core::{
    endpoints, ApiError, ApiResult, ChartResponse, DashboardConfig, FilterState, MetricsResponse,
    TableResponse,
};
use gloo_net::http::Request;
use serde::de::DeserializeOwned;

/// Dashboard API client over HTTP GET
#[derive(Debug, Clone, Default)]
pub struct HttpApiClient {
    config: ApiConfig,
}

impl HttpApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fetch the client-facing dashboard config from the API
    pub async fn fetch_config(&self) -> ApiResult<DashboardConfig> {
        let config: DashboardConfig = self.get_json(endpoints::CONFIG, &FilterState::default()).await?;
        config
            .validate()
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(config)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, filters: &FilterState) -> ApiResult<T> {
        let url = self.config.url(path, filters);
        tracing::debug!("GET {}", url);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !response.ok() {
            return Err(ApiError::status(response.status(), url));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl DashboardApi for HttpApiClient {
    async fn metrics(&self, filters: &FilterState) -> ApiResult<MetricsResponse> {
        self.get_json(endpoints::METRICS, filters).await
    }

    async fn table(&self, filters: &FilterState) -> ApiResult<TableResponse> {
        self.get_json(endpoints::TABLE, filters).await
    }

    async fn chart(&self, id: &str, filters: &FilterState) -> ApiResult<ChartResponse> {
        self.get_json(&chart_path(id), filters).await
    }
}
