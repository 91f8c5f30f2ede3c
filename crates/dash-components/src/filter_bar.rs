//! Date range inputs and reset button

use dash_client::DashboardHandle;
use dash_state::use_dashboard_state;
use leptos::prelude::*;

/// Date range filter controls.
///
/// Inputs mirror the filter state, so a reset clears them too. Each change
/// is forwarded to the event loop, which triggers a refresh.
#[component]
pub fn FilterBar() -> impl IntoView {
    let state = use_dashboard_state();
    let handle = expect_context::<DashboardHandle>();
    let filters = state.filters;
    let phase = state.phase;
    let busy = Memo::new(move |_| phase.get().is_busy());

    let on_start = {
        let handle = handle.clone();
        move |ev| {
            let value = event_target_value(&ev);
            tracing::debug!("Start date changed to '{}'", value);
            handle.start_date(value);
        }
    };
    let on_end = {
        let handle = handle.clone();
        move |ev| {
            let value = event_target_value(&ev);
            tracing::debug!("End date changed to '{}'", value);
            handle.end_date(value);
        }
    };
    let on_reset = move |_| {
        tracing::debug!("Filters reset");
        handle.reset();
    };

    view! {
        <div class="filter-bar">
            <label class="fb-field">
                <span class="fb-label">"From"</span>
                <input
                    type="date"
                    class="fb-input"
                    prop:value=move || filters.get().start_value()
                    on:change=on_start
                />
            </label>
            <label class="fb-field">
                <span class="fb-label">"To"</span>
                <input
                    type="date"
                    class="fb-input"
                    prop:value=move || filters.get().end_value()
                    on:change=on_end
                />
            </label>
            <button
                class="fb-reset"
                class:busy=move || busy.get()
                on:click=on_reset
            >
                "Reset"
            </button>
        </div>
    }
}
