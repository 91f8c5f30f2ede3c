//! HTTP routes: `/api/config`, `/api/metrics`, `/api/table`, `/api/charts/:id`

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Path as UrlPath, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use dash_core::{endpoints, DashboardConfig, FilterState, MetricsResponse, Table};
use serde::Deserialize;
use serde_json::json;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::data::Dataset;

/// Shared, read-only server state
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
    data: Arc<Dataset>,
}

impl AppState {
    pub fn new(config: ServerConfig, data: Dataset) -> Self {
        Self {
            config: Arc::new(config),
            data: Arc::new(data),
        }
    }
}

/// `start_date` / `end_date` query parameters
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateQuery {
    fn filters(&self) -> FilterState {
        FilterState::from_raw(self.start_date.as_deref(), self.end_date.as_deref())
    }
}

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::CONFIG, get(config_handler))
        .route(endpoints::METRICS, get(metrics_handler))
        .route(endpoints::TABLE, get(table_handler))
        .route("/api/charts/:id", get(chart_handler))
        .with_state(state)
}

/// API routes plus the built frontend (when a static dir is given)
pub fn app(state: AppState, static_dir: Option<&Path>) -> Router {
    let router = api_router(state);
    let router = match static_dir {
        Some(dir) => {
            tracing::info!("Serving static files from {}", dir.display());
            router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true))
        }
        None => router,
    };

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn config_handler(State(state): State<AppState>) -> Json<DashboardConfig> {
    Json(state.config.client_config())
}

async fn metrics_handler(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Json<MetricsResponse> {
    let metrics = state.data.metrics(&state.config.metrics, &query.filters());
    Json(MetricsResponse { metrics })
}

async fn table_handler(State(state): State<AppState>, Query(query): Query<DateQuery>) -> Json<Table> {
    Json(state.data.table(&query.filters()))
}

async fn chart_handler(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
    Query(query): Query<DateQuery>,
) -> Response {
    let Some(chart) = state.config.chart(&id) else {
        tracing::warn!("Unknown chart id requested: {}", id);
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Unknown chart id: {}", id) })),
        )
            .into_response();
    };

    Json(state.data.chart(chart, &query.filters())).into_response()
}
