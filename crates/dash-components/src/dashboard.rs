//! Main dashboard layout component

use dash_state::{shown_phase, use_dashboard_state};
use leptos::prelude::*;

use crate::{ChartPanel, ChartPanelProps, DataTable, FilterBar, MetricCards};

#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_dashboard_state();
    let title = state.title.clone().unwrap_or_else(|| "Dashboard".to_string());
    let show_filters = state.date_filter_enabled;

    view! {
        <div class="dashboard">
            <header class="dash-header">
                <h1 class="dash-title">{title}</h1>
                {show_filters.then(|| view! { <FilterBar /> })}
            </header>

            <main class="dash-main">
                <section class="dash-metrics">
                    <MetricCards metrics=state.metrics />
                </section>

                <section class="dash-charts">
                    {state
                        .charts
                        .iter()
                        .cloned()
                        .map(|slot| ChartPanel(ChartPanelProps { slot }))
                        .collect_view()}
                </section>

                <section class="panel dash-table">
                    <div class="panel-header">
                        <span class="panel-title">"Sample Rows"</span>
                    </div>
                    <div class="panel-content">
                        <DataTable table=state.table />
                    </div>
                </section>
            </main>

            <footer class="dash-footer">
                <StatusBar />
            </footer>
        </div>
    }
}

#[component]
fn StatusBar() -> impl IntoView {
    let state = use_dashboard_state();
    let phase = state.phase;
    let failed = state.last_cycle_failed;
    let filters = state.filters;
    let status = Memo::new(move |_| shown_phase(phase.get(), failed.get()));

    view! {
        <div class="status-bar">
            <div class="sb-phase">
                <span class="sb-label">"Status:"</span>
                <span class=move || format!("sb-value {}", status.get().css_class())>
                    {move || status.get().label()}
                </span>
            </div>

            {move || {
                let query = filters.get().query_string();
                (!query.is_empty()).then(|| view! {
                    <div class="sb-filters">
                        <span class="sb-label">"Filters:"</span>
                        <span class="sb-value">{query}</span>
                    </div>
                })
            }}

            <div class="sb-version">
                <span>{concat!("v", env!("CARGO_PKG_VERSION"))}</span>
            </div>
        </div>
    }
}
