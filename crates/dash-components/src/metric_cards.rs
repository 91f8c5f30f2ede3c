//! KPI cards

use dash_core::{colors, Metric};
use leptos::prelude::*;

#[component]
pub fn MetricCards(#[prop(into)] metrics: Signal<Vec<Metric>>) -> impl IntoView {
    view! {
        <div class="metric-cards">
            {move || {
                metrics
                    .get()
                    .into_iter()
                    .map(|metric| view! { <MetricCard metric=metric /> })
                    .collect_view()
            }}
        </div>
    }
}

#[component]
fn MetricCard(metric: Metric) -> impl IntoView {
    let value = metric.display_value();

    view! {
        <div class="panel metric-card">
            <span class="mc-label" style=format!("color: {}", colors::TEXT_MUTED)>
                {metric.label}
            </span>
            <span class="mc-value" style=format!("color: {}", colors::TEXT_PRIMARY)>
                {value}
            </span>
        </div>
    }
}
