//! Event loop wiring between the view layer and the orchestrator

use crate::{ApiConfig, DashboardApi, HttpApiClient, Orchestrator};
use dash_charts::MountPoint;
use dash_core::{DashboardConfig, FilterEvent};
use dash_state::{Canvas, DashboardSink, DashboardState};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::future::LocalBoxFuture;
use futures::{FutureExt, StreamExt};
use std::rc::Rc;

/// Orchestrator wired to the HTTP API and the reactive state
pub type LiveOrchestrator = Orchestrator<HttpApiClient, DashboardState, Canvas>;

// ============================================================================
// DASHBOARD HANDLE (Send + Sync)
// ============================================================================

/// Handle for sending filter events to the running dashboard
#[derive(Clone)]
pub struct DashboardHandle {
    events: UnboundedSender<FilterEvent>,
}

impl DashboardHandle {
    pub fn new(events: UnboundedSender<FilterEvent>) -> Self {
        Self { events }
    }

    /// Queue an event; returns false once the loop has stopped
    pub fn send(&self, event: FilterEvent) -> bool {
        match self.events.unbounded_send(event) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Dashboard event loop is gone, dropping {:?}", e.into_inner());
                false
            }
        }
    }

    pub fn start_date(&self, value: impl Into<String>) -> bool {
        self.send(FilterEvent::StartDate(value.into()))
    }

    pub fn end_date(&self, value: impl Into<String>) -> bool {
        self.send(FilterEvent::EndDate(value.into()))
    }

    /// Clear both dates and refresh
    pub fn reset(&self) -> bool {
        self.send(FilterEvent::Reset)
    }

    /// Refresh with the current filters (initial load)
    pub fn reload(&self) -> bool {
        self.send(FilterEvent::Reload)
    }

    /// Stop the event loop. Cycles already running finish normally.
    pub fn stop(&self) {
        self.events.close_channel();
    }

    pub fn is_running(&self) -> bool {
        !self.events.is_closed()
    }
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Start the dashboard: build the live orchestrator and spawn its event loop.
///
/// Nothing is fetched until the first event arrives; send `reload()` for the
/// initial load.
pub fn connect(config: DashboardConfig, state: DashboardState, api: ApiConfig) -> DashboardHandle {
    let mounts = state.mounts();
    tracing::info!(
        "Starting dashboard with {} charts (API base '{}')",
        mounts.len(),
        api.base_url
    );

    let orchestrator = Rc::new(Orchestrator::new(config, HttpApiClient::new(api), state, mounts));
    let (tx, rx) = mpsc::unbounded();

    wasm_bindgen_futures::spawn_local(run_event_loop(orchestrator, rx, |cycle| {
        wasm_bindgen_futures::spawn_local(cycle)
    }));

    DashboardHandle::new(tx)
}

/// Apply each event in arrival order and spawn the refresh it triggers.
///
/// Refreshes run detached so a newer event can supersede a cycle that is
/// still waiting on the network.
pub async fn run_event_loop<A, S, M, F>(
    orchestrator: Rc<Orchestrator<A, S, M>>,
    mut events: UnboundedReceiver<FilterEvent>,
    spawn: F,
) where
    A: DashboardApi + 'static,
    S: DashboardSink + 'static,
    M: MountPoint + 'static,
    F: Fn(LocalBoxFuture<'static, ()>),
{
    while let Some(event) = events.next().await {
        tracing::debug!("Dashboard event: {:?}", event);
        if !orchestrator.apply(&event) {
            continue;
        }

        let orchestrator = Rc::clone(&orchestrator);
        spawn(
            async move {
                orchestrator.refresh().await;
            }
            .boxed_local(),
        );
    }

    tracing::info!("Dashboard event loop stopped");
}
