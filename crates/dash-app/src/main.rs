//! Analytics dashboard WASM entry point
//!
//! Reads the dashboard config (embedded in the page, else from `/api/config`),
//! mounts the views and sends the initial reload.

use dash_client::{connect, ApiConfig, HttpApiClient, DEFAULT_API_BASE};
use dash_components::Dashboard;
use dash_core::{ConfigError, DashboardConfig};
use dash_state::provide_dashboard_state;
use leptos::prelude::*;

/// `<script type="application/json">` element holding an inline config
const CONFIG_ELEMENT_ID: &str = "dashboard-config";

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    tracing::info!("Starting analytics dashboard v{}", env!("CARGO_PKG_VERSION"));

    let api = ApiConfig::new(DEFAULT_API_BASE);

    match embedded_config() {
        Some(Ok(config)) => mount(config, api),
        Some(Err(e)) => {
            tracing::error!("Embedded dashboard config rejected: {}", e);
            mount(DashboardConfig::default(), api);
        }
        None => wasm_bindgen_futures::spawn_local(async move {
            let config = match HttpApiClient::new(api.clone()).fetch_config().await {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!("Failed to load dashboard config: {}", e);
                    DashboardConfig::default()
                }
            };
            mount(config, api);
        }),
    }
}

fn embedded_config() -> Option<Result<DashboardConfig, ConfigError>> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
    let json = element.text_content()?;
    Some(DashboardConfig::from_json(&json))
}

fn mount(config: DashboardConfig, api: ApiConfig) {
    tracing::info!("Mounting dashboard with {} charts", config.charts.len());
    leptos::mount::mount_to_body(move || view! { <App config=config api=api /> });
}

#[component]
fn App(config: DashboardConfig, api: ApiConfig) -> impl IntoView {
    let state = provide_dashboard_state(&config);
    let handle = connect(config, state, api);
    provide_context(handle.clone());

    // initial load with empty filters
    handle.reload();

    view! { <Dashboard /> }
}
