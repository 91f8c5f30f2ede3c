//! # dash-state
//!
//! Reactive state for the analytics dashboard.
//! Leptos signals hold what the views render: cards, table, filter inputs,
//! refresh phase and one canvas per configured chart.

use dash_charts::{MountRegistry, VisualNode};
use dash_core::{DashboardConfig, FilterState, Metric, RefreshPhase, Table};
use leptos::prelude::*;

// ============================================================================
// SINK
// ============================================================================

/// Receiver for everything a refresh cycle produces besides chart canvases
pub trait DashboardSink {
    fn show_metrics(&self, metrics: Vec<Metric>);

    fn show_table(&self, table: Table);

    fn set_phase(&self, phase: RefreshPhase);

    /// Called after the filter state changed (input sync)
    fn filters_changed(&self, _filters: &FilterState) {}
}

// ============================================================================
// CHART SLOTS
// ============================================================================

/// Canvas signal for one configured chart
pub type Canvas = RwSignal<Vec<VisualNode>>;

/// Panel created once per configured chart
#[derive(Clone)]
pub struct ChartSlot {
    pub id: String,
    pub label: String,
    pub canvas: Canvas,
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Dashboard state with reactive signals
#[derive(Clone)]
pub struct DashboardState {
    /// Optional page title from config
    pub title: Option<String>,
    /// Whether the date range controls are wired
    pub date_filter_enabled: bool,
    /// Current filter inputs (mirrors the orchestrator's filter state)
    pub filters: RwSignal<FilterState>,
    /// KPI cards
    pub metrics: RwSignal<Vec<Metric>>,
    /// Sample rows
    pub table: RwSignal<Table>,
    /// Refresh cycle phase
    pub phase: RwSignal<RefreshPhase>,
    /// Set when a cycle aborts, cleared when the next one starts fetching
    pub last_cycle_failed: RwSignal<bool>,
    /// Chart panels in configuration order
    pub charts: Vec<ChartSlot>,
}

impl DashboardState {
    /// Create state with one empty canvas per configured chart
    pub fn new(config: &DashboardConfig) -> Self {
        let charts = config
            .charts
            .iter()
            .map(|chart| ChartSlot {
                id: chart.id.clone(),
                label: chart.display_label().to_string(),
                canvas: RwSignal::new(Vec::new()),
            })
            .collect();

        Self {
            title: config.title.clone(),
            date_filter_enabled: config.date_filter_enabled(),
            filters: RwSignal::new(FilterState::default()),
            metrics: RwSignal::new(Vec::new()),
            table: RwSignal::new(Table::default()),
            phase: RwSignal::new(RefreshPhase::Idle),
            last_cycle_failed: RwSignal::new(false),
            charts,
        }
    }

    /// Phase as shown to the user
    pub fn status(&self) -> RefreshPhase {
        shown_phase(self.phase.get(), self.last_cycle_failed.get())
    }

    /// Mount registry over the chart canvases
    pub fn mounts(&self) -> MountRegistry<Canvas> {
        let mut registry = MountRegistry::new();
        for slot in &self.charts {
            registry.register(slot.id.clone(), slot.canvas);
        }
        registry
    }
}

impl DashboardSink for DashboardState {
    fn show_metrics(&self, metrics: Vec<Metric>) {
        self.metrics.set(metrics);
    }

    fn show_table(&self, table: Table) {
        self.table.set(table);
    }

    fn set_phase(&self, phase: RefreshPhase) {
        tracing::trace!("Refresh phase: {:?}", phase);
        match phase {
            RefreshPhase::Failed => self.last_cycle_failed.set(true),
            RefreshPhase::Fetching => self.last_cycle_failed.set(false),
            _ => {}
        }
        self.phase.set(phase);
    }

    fn filters_changed(&self, filters: &FilterState) {
        self.filters.set(*filters);
    }
}

/// An aborted cycle settles on `Idle`; it still reads as failed until the
/// next cycle begins.
pub fn shown_phase(phase: RefreshPhase, last_cycle_failed: bool) -> RefreshPhase {
    match phase {
        RefreshPhase::Idle if last_cycle_failed => RefreshPhase::Failed,
        phase => phase,
    }
}

// ============================================================================
// CONTEXT HELPERS
// ============================================================================

/// Provide dashboard state context to component tree
pub fn provide_dashboard_state(config: &DashboardConfig) -> DashboardState {
    let state = DashboardState::new(config);
    provide_context(state.clone());
    state
}

/// Use dashboard state from context
pub fn use_dashboard_state() -> DashboardState {
    expect_context::<DashboardState>()
}
