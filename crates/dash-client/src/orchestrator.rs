//! Refresh cycle orchestration
//!
//! Owns the filter state and drives one refresh cycle per filter event:
//! metrics and table concurrently, then every chart sequentially.

use crate::{ChartJob, ChartQueue, DashboardApi};
use dash_charts::{ChartRenderer, MountPoint, MountRegistry};
use dash_core::{
    ApiError, ChartConfig, ChartResponse, ChartSpec, DashboardConfig, FilterEvent, FilterState,
    RefreshPhase,
};
use dash_state::DashboardSink;
use std::cell::{Cell, RefCell};

/// What a failed chart fetch does to the rest of the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartFailurePolicy {
    /// Stop the cycle; charts already drawn stay on screen
    #[default]
    AbortCycle,
    /// Log the failure, keep the chart's previous content and move on
    SkipChart,
}

/// Per-cycle bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub generation: u64,
    pub rendered: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

/// How a refresh cycle ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed(CycleReport),
    Aborted { report: CycleReport, error: ApiError },
    /// A newer cycle started while this one was waiting; its results were dropped
    Superseded(CycleReport),
}

impl CycleOutcome {
    pub fn report(&self) -> &CycleReport {
        match self {
            Self::Completed(report) | Self::Superseded(report) => report,
            Self::Aborted { report, .. } => report,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Aborted { error, .. } => Some(error),
            _ => None,
        }
    }
}

// ============================================================================
// ORCHESTRATOR
// ============================================================================

/// Dashboard refresh orchestrator.
///
/// Single-threaded: state lives in `Cell`/`RefCell` and is only touched
/// between awaits.
pub struct Orchestrator<A, S, M> {
    api: A,
    sink: S,
    charts: Vec<ChartConfig>,
    date_filter_enabled: bool,
    mounts: MountRegistry<M>,
    renderer: ChartRenderer,
    failure_policy: ChartFailurePolicy,
    filters: RefCell<FilterState>,
    generation: Cell<u64>,
}

impl<A, S, M> Orchestrator<A, S, M>
where
    A: DashboardApi,
    S: DashboardSink,
    M: MountPoint,
{
    pub fn new(config: DashboardConfig, api: A, sink: S, mounts: MountRegistry<M>) -> Self {
        Self {
            api,
            sink,
            date_filter_enabled: config.date_filter_enabled(),
            charts: config.charts,
            mounts,
            renderer: ChartRenderer::default(),
            failure_policy: ChartFailurePolicy::default(),
            filters: RefCell::new(FilterState::default()),
            generation: Cell::new(0),
        }
    }

    pub fn with_renderer(mut self, renderer: ChartRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_failure_policy(mut self, policy: ChartFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn filters(&self) -> FilterState {
        *self.filters.borrow()
    }

    /// Stamp of the most recently started cycle
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Apply an event to the filter state. Returns whether a refresh should follow.
    pub fn apply(&self, event: &FilterEvent) -> bool {
        if event.is_date_filter() && !self.date_filter_enabled {
            tracing::debug!("Date range filter not configured, ignoring {:?}", event);
            return false;
        }

        let filters = {
            let mut filters = self.filters.borrow_mut();
            match event {
                FilterEvent::StartDate(raw) => filters.set_start(raw),
                FilterEvent::EndDate(raw) => filters.set_end(raw),
                FilterEvent::Reset => filters.clear(),
                FilterEvent::Reload => {}
            }
            *filters
        };

        self.sink.filters_changed(&filters);
        true
    }

    /// Apply an event and run the refresh it triggers
    pub async fn handle(&self, event: FilterEvent) -> Option<CycleOutcome> {
        if self.apply(&event) {
            Some(self.refresh().await)
        } else {
            None
        }
    }

    /// Run one refresh cycle with the current filters
    pub async fn refresh(&self) -> CycleOutcome {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        let filters = self.filters();
        let mut report = CycleReport {
            generation,
            ..Default::default()
        };

        tracing::info!("Refresh #{} started (filters: {:?})", generation, filters.query_string());
        self.sink.set_phase(RefreshPhase::Fetching);

        let summary = futures::future::try_join(
            self.api.metrics(&filters),
            self.api.table(&filters),
        )
        .await;

        if self.is_stale(generation) {
            return self.superseded(report);
        }

        let (metrics, table) = match summary {
            Ok(summary) => summary,
            Err(error) => return self.abort(report, error),
        };

        self.sink.set_phase(RefreshPhase::Rendering);
        self.sink.show_metrics(metrics.metrics);
        self.sink.show_table(table);

        let mut queue = ChartQueue::from_charts(&self.charts);
        while let Some(job) = queue.pop() {
            self.sink.set_phase(RefreshPhase::Fetching);
            let result = self.api.chart(job.id(), &filters).await;

            if self.is_stale(generation) {
                return self.superseded(report);
            }

            match result {
                Ok(response) => {
                    self.sink.set_phase(RefreshPhase::Rendering);
                    self.draw(&job, response, &mut report);
                }
                Err(error) => {
                    report.failed.push(job.chart.id.clone());
                    match self.failure_policy {
                        ChartFailurePolicy::AbortCycle => return self.abort(report, error),
                        ChartFailurePolicy::SkipChart => {
                            tracing::warn!("Chart '{}' failed, keeping previous content: {}", job.id(), error);
                        }
                    }
                }
            }
        }

        self.sink.set_phase(RefreshPhase::Idle);
        tracing::info!(
            "Refresh #{} finished: {} rendered, {} skipped, {} failed",
            generation,
            report.rendered.len(),
            report.skipped.len(),
            report.failed.len()
        );

        CycleOutcome::Completed(report)
    }

    fn draw(&self, job: &ChartJob, response: ChartResponse, report: &mut CycleReport) {
        let spec = ChartSpec::from_response(&job.chart, response);

        let Some(mount) = self.mounts.get(&spec.id) else {
            tracing::debug!("No mount point for chart '{}', skipping", spec.id);
            report.skipped.push(spec.id);
            return;
        };

        let drawn = self.renderer.render_chart(mount, &spec);
        tracing::debug!(
            "Rendered {} chart '{}' ({} points, {} primitives)",
            spec.kind.as_str(),
            spec.id,
            spec.points.len(),
            drawn
        );
        report.rendered.push(spec.id);
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.get() != generation
    }

    fn abort(&self, report: CycleReport, error: ApiError) -> CycleOutcome {
        tracing::error!("Refresh #{} aborted: {}", report.generation, error);
        self.sink.set_phase(RefreshPhase::Failed);
        self.sink.set_phase(RefreshPhase::Idle);
        CycleOutcome::Aborted { report, error }
    }

    fn superseded(&self, report: CycleReport) -> CycleOutcome {
        tracing::debug!(
            "Refresh #{} superseded by #{}, dropping results",
            report.generation,
            self.generation.get()
        );
        CycleOutcome::Superseded(report)
    }
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use dash_charts::{MemoryMount, VisualNode, NO_DATA};
    use dash_core::{ChartKind, FilterConfig};
    use futures::executor::block_on;

    type TestOrchestrator = Orchestrator<FakeApi, RecordingSink, MemoryMount>;

    fn config(ids: &[&str]) -> DashboardConfig {
        DashboardConfig::new(ids.iter().map(|id| ChartConfig::new(*id, id.to_uppercase())).collect())
            .with_filter(FilterConfig::date_range())
    }

    fn orchestrator(ids: &[&str], api: FakeApi) -> (TestOrchestrator, MountRegistry<MemoryMount>) {
        let config = config(ids);
        let mounts = MountRegistry::from_charts(&config.charts, |_| MemoryMount::new());
        let orchestrator = Orchestrator::new(config, api, RecordingSink::default(), mounts.clone());
        (orchestrator, mounts)
    }

    #[test]
    fn test_full_cycle_renders_every_chart_in_order() {
        let api = FakeApi::default()
            .with_chart("revenue", line(&[("Jan", 10.0), ("Feb", 30.0)]))
            .with_chart("signups", bar(&[("EU", 3.0)]))
            .with_chart("churn", bar(&[]));
        let (orch, mounts) = orchestrator(&["revenue", "signups", "churn"], api);

        let outcome = block_on(orch.refresh());

        assert!(outcome.is_completed());
        assert_eq!(outcome.report().rendered, vec!["revenue", "signups", "churn"]);
        assert_eq!(
            orch.api().calls(),
            vec!["metrics", "table", "chart:revenue", "chart:signups", "chart:churn"]
        );
        assert_eq!(orch.sink().metrics.borrow()[0].display_value(), "$10.00");
        assert_eq!(orch.sink().tables.get(), 1);
        assert_eq!(orch.sink().last_phase(), Some(RefreshPhase::Idle));

        assert!(mounts.get("revenue").unwrap().markup().contains("<path"));
        assert!(mounts.get("signups").unwrap().markup().contains("<rect"));
        assert_eq!(
            mounts.get("churn").unwrap().children(),
            vec![VisualNode::Text(NO_DATA.to_string())]
        );
    }

    #[test]
    fn test_metrics_and_table_overlap_but_charts_do_not() {
        let api = FakeApi::default()
            .with_chart("a", bar(&[("x", 1.0)]))
            .with_chart("b", bar(&[("y", 2.0)]))
            .with_chart("c", bar(&[("z", 3.0)]));
        let (orch, _) = orchestrator(&["a", "b", "c"], api);

        block_on(orch.refresh());

        assert_eq!(orch.api().max_in_flight.get(), 2);
        assert_eq!(orch.api().max_chart_in_flight.get(), 1);
    }

    #[test]
    fn test_chart_failure_aborts_but_keeps_rendered_charts() {
        // signups is configured first and renders before revenue fails
        let api = FakeApi::default()
            .with_chart("signups", bar(&[("EU", 4.0), ("US", 9.0)]))
            .with_chart("revenue", Err(ApiError::status(500, "/api/charts/revenue")))
            .with_chart("churn", bar(&[("EU", 1.0)]));
        let (orch, mounts) = orchestrator(&["signups", "revenue", "churn"], api);

        let outcome = block_on(orch.refresh());

        assert_eq!(outcome.error(), Some(&ApiError::status(500, "/api/charts/revenue")));
        assert_eq!(outcome.report().rendered, vec!["signups"]);
        assert_eq!(outcome.report().failed, vec!["revenue"]);
        assert_eq!(mounts.get("signups").unwrap().markup().matches("<rect").count(), 2);
        // first load: the failed chart stays empty, later charts are never fetched
        assert!(mounts.get("revenue").unwrap().is_empty());
        assert!(mounts.get("churn").unwrap().is_empty());
        assert!(!orch.api().calls().contains(&"chart:churn".to_string()));

        let phases = orch.sink().phases.borrow().clone();
        assert_eq!(&phases[phases.len() - 2..], &[RefreshPhase::Failed, RefreshPhase::Idle]);
    }

    #[test]
    fn test_failed_chart_retains_previous_content() {
        let good = FakeApi::default()
            .with_chart("revenue", line(&[("Jan", 5.0)]))
            .with_chart("signups", bar(&[("EU", 2.0)]));
        let config = config(&["signups", "revenue"]);
        let mounts = MountRegistry::from_charts(&config.charts, |_| MemoryMount::new());

        let first = Orchestrator::new(config.clone(), good, RecordingSink::default(), mounts.clone());
        block_on(first.refresh());
        let before = mounts.get("revenue").unwrap().children();
        assert_eq!(before.len(), 1);

        let failing = FakeApi::default()
            .with_chart("signups", bar(&[("EU", 7.0), ("US", 1.0)]))
            .with_chart("revenue", Err(ApiError::status(500, "/api/charts/revenue")));
        let second = Orchestrator::new(config, failing, RecordingSink::default(), mounts.clone());
        let outcome = block_on(second.refresh());

        assert!(outcome.error().is_some());
        assert_eq!(mounts.get("revenue").unwrap().children(), before);
        assert_eq!(mounts.get("signups").unwrap().markup().matches("<rect").count(), 2);
        assert_eq!(second.sink().last_phase(), Some(RefreshPhase::Idle));
    }

    #[test]
    fn test_skip_policy_continues_past_failures() {
        let api = FakeApi::default()
            .with_chart("revenue", Err(ApiError::Transport("offline".into())))
            .with_chart("signups", bar(&[("EU", 4.0)]));
        let (orch, mounts) = orchestrator(&["revenue", "signups"], api);
        let orch = orch.with_failure_policy(ChartFailurePolicy::SkipChart);

        let outcome = block_on(orch.refresh());

        assert!(outcome.is_completed());
        assert_eq!(outcome.report().failed, vec!["revenue"]);
        assert_eq!(outcome.report().rendered, vec!["signups"]);
        assert!(mounts.get("revenue").unwrap().is_empty());
        assert!(!mounts.get("signups").unwrap().is_empty());
    }

    #[test]
    fn test_summary_failure_skips_charts() {
        let api = FakeApi::default()
            .with_chart("revenue", line(&[("Jan", 1.0)]))
            .failing_metrics(ApiError::Transport("connection refused".into()));
        let (orch, mounts) = orchestrator(&["revenue"], api);

        let outcome = block_on(orch.refresh());

        assert!(matches!(outcome.error(), Some(ApiError::Transport(_))));
        assert_eq!(orch.api().calls(), vec!["metrics", "table"]);
        assert!(mounts.get("revenue").unwrap().is_empty());
        assert_eq!(orch.sink().tables.get(), 0);
        assert_eq!(orch.sink().last_phase(), Some(RefreshPhase::Idle));
    }

    #[test]
    fn test_response_for_unknown_chart_is_skipped() {
        let api = FakeApi::default()
            .with_chart("revenue", line(&[("Jan", 1.0)]).map(|r| r.with_id("ghost")))
            .with_chart("signups", bar(&[("EU", 1.0)]));
        let (orch, mounts) = orchestrator(&["revenue", "signups"], api);

        let outcome = block_on(orch.refresh());

        assert!(outcome.is_completed());
        assert_eq!(outcome.report().skipped, vec!["ghost"]);
        assert_eq!(outcome.report().rendered, vec!["signups"]);
        assert!(mounts.get("revenue").unwrap().is_empty());
    }

    #[test]
    fn test_chart_without_mount_is_skipped() {
        let api = FakeApi::default()
            .with_chart("revenue", line(&[("Jan", 1.0)]))
            .with_chart("orphan", bar(&[("EU", 1.0)]));
        let config = config(&["orphan", "revenue"]);
        let mut mounts = MountRegistry::new();
        mounts.register("revenue", MemoryMount::new());
        let orch = Orchestrator::new(config, api, RecordingSink::default(), mounts);

        let outcome = block_on(orch.refresh());

        assert!(outcome.is_completed());
        assert_eq!(outcome.report().skipped, vec!["orphan"]);
        assert_eq!(outcome.report().rendered, vec!["revenue"]);
    }

    #[test]
    fn test_unknown_kind_renders_as_bar() {
        let response = ChartResponse {
            kind: Some("donut".into()),
            points: vec![dash_core::Point::new("a", 1.0)],
            ..Default::default()
        };
        let api = FakeApi::default().with_chart("mix", Ok(response));
        let (orch, mounts) = orchestrator(&["mix"], api);

        block_on(orch.refresh());

        let markup = mounts.get("mix").unwrap().markup();
        assert!(markup.contains("<rect"));
        assert!(!markup.contains("<path"));
    }

    #[test]
    fn test_kind_hint_applies_when_response_has_no_type() {
        let response = ChartResponse {
            points: vec![dash_core::Point::new("a", 1.0), dash_core::Point::new("b", 2.0)],
            ..Default::default()
        };
        let config = DashboardConfig::new(vec![ChartConfig::new("trend", "Trend").with_kind(ChartKind::Line)]);
        let mounts = MountRegistry::from_charts(&config.charts, |_| MemoryMount::new());
        let api = FakeApi::default().with_chart("trend", Ok(response));
        let orch = Orchestrator::new(config, api, RecordingSink::default(), mounts.clone());

        block_on(orch.refresh());

        assert!(mounts.get("trend").unwrap().markup().contains("<path"));
    }

    #[test]
    fn test_filter_events_drive_query() {
        let api = FakeApi::default().with_chart("revenue", line(&[("Jan", 1.0)]));
        let (orch, _) = orchestrator(&["revenue"], api);

        assert!(block_on(orch.handle(FilterEvent::StartDate("2024-01-01".into()))).is_some());
        assert_eq!(orch.filters().start_value(), "2024-01-01");
        assert!(orch.api().filters_seen.borrow().iter().all(|f| f.start_value() == "2024-01-01"));

        block_on(orch.handle(FilterEvent::EndDate("2024-01-31".into())));
        block_on(orch.handle(FilterEvent::Reset));

        assert!(orch.filters().is_empty());
        assert!(orch.api().filters_seen.borrow().last().unwrap().is_empty());
        let synced = orch.sink().filters.borrow().clone();
        assert_eq!(synced.len(), 3);
        assert!(synced[2].is_empty());
        assert_eq!(orch.generation(), 3);
    }

    #[test]
    fn test_date_events_ignored_without_date_filter() {
        let config = DashboardConfig::new(vec![ChartConfig::new("revenue", "Revenue")]);
        let mounts = MountRegistry::from_charts(&config.charts, |_| MemoryMount::new());
        let api = FakeApi::default().with_chart("revenue", line(&[("Jan", 1.0)]));
        let orch = Orchestrator::new(config, api, RecordingSink::default(), mounts);

        assert!(!orch.apply(&FilterEvent::StartDate("2024-01-01".into())));
        assert!(orch.filters().is_empty());
        assert!(orch.apply(&FilterEvent::Reload));
    }

    #[test]
    fn test_overlapping_cycles_last_request_wins() {
        let api = FakeApi::default().with_chart("revenue", line(&[("Jan", 1.0)]));
        let (orch, mounts) = orchestrator(&["revenue"], api);

        let (first, second) = block_on(async { futures::join!(orch.refresh(), orch.refresh()) });

        assert!(matches!(first, CycleOutcome::Superseded(ref r) if r.generation == 1));
        assert!(second.is_completed());
        assert_eq!(second.report().generation, 2);
        assert_eq!(orch.sink().tables.get(), 1);
        assert_eq!(mounts.get("revenue").unwrap().children().len(), 1);
        assert_eq!(orch.sink().last_phase(), Some(RefreshPhase::Idle));
    }

    #[test]
    fn test_repeated_refresh_does_not_accumulate() {
        let api = FakeApi::default().with_chart("revenue", bar(&[("a", 1.0), ("b", 2.0)]));
        let (orch, mounts) = orchestrator(&["revenue"], api);

        block_on(orch.refresh());
        let first = mounts.get("revenue").unwrap().children();
        block_on(orch.refresh());

        assert_eq!(mounts.get("revenue").unwrap().children(), first);
    }
}
