//! End-to-end refresh cycles: API responses to mounted visuals

use std::cell::RefCell;
use std::collections::HashMap;

use dash_charts::{MemoryMount, MountRegistry, SvgElement, VisualNode, NO_DATA};
use dash_client::{ChartFailurePolicy, CycleOutcome, DashboardApi, Orchestrator};
use dash_core::{
    ApiError, ApiResult, ChartConfig, ChartKind, ChartResponse, DashboardConfig, FilterState, Metric,
    MetricsResponse, Point, RefreshPhase, Table, TableResponse,
};
use dash_state::DashboardSink;
use futures::executor::block_on;

#[derive(Default)]
struct StaticApi {
    charts: HashMap<String, ApiResult<ChartResponse>>,
}

impl StaticApi {
    fn chart(mut self, id: &str, response: ApiResult<ChartResponse>) -> Self {
        self.charts.insert(id.to_string(), response);
        self
    }
}

impl DashboardApi for StaticApi {
    async fn metrics(&self, _filters: &FilterState) -> ApiResult<MetricsResponse> {
        Ok(MetricsResponse {
            metrics: vec![Metric::new("Orders", 42.0)],
        })
    }

    async fn table(&self, _filters: &FilterState) -> ApiResult<TableResponse> {
        Ok(Table::default())
    }

    async fn chart(&self, id: &str, _filters: &FilterState) -> ApiResult<ChartResponse> {
        self.charts
            .get(id)
            .cloned()
            .unwrap_or_else(|| Err(ApiError::status(404, id)))
    }
}

#[derive(Default)]
struct PhaseLog(RefCell<Vec<RefreshPhase>>);

impl DashboardSink for PhaseLog {
    fn show_metrics(&self, _metrics: Vec<Metric>) {}

    fn show_table(&self, _table: Table) {}

    fn set_phase(&self, phase: RefreshPhase) {
        self.0.borrow_mut().push(phase);
    }
}

fn response(kind: ChartKind, points: &[(&str, f64)]) -> ApiResult<ChartResponse> {
    Ok(ChartResponse::new(
        kind,
        points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
    ))
}

fn dashboard(
    ids: &[&str],
    api: StaticApi,
) -> (Orchestrator<StaticApi, PhaseLog, MemoryMount>, MountRegistry<MemoryMount>) {
    let config = DashboardConfig::new(ids.iter().map(|id| ChartConfig::new(*id, *id)).collect());
    let mounts = MountRegistry::from_charts(&config.charts, |_| MemoryMount::new());
    let orchestrator = Orchestrator::new(config, api, PhaseLog::default(), mounts.clone());
    (orchestrator, mounts)
}

fn svg_children(mount: &MemoryMount) -> Vec<SvgElement> {
    match mount.children().as_slice() {
        [VisualNode::Svg { children, .. }] => children.clone(),
        other => panic!("expected a single svg node, got {:?}", other),
    }
}

#[test]
fn line_chart_zero_value_sits_on_baseline() {
    let api = StaticApi::default().chart(
        "sales",
        response(ChartKind::Line, &[("Jan", 10.0), ("Feb", 30.0), ("Mar", 0.0)]),
    );
    let (orchestrator, mounts) = dashboard(&["sales"], api);

    assert!(block_on(orchestrator.refresh()).is_completed());

    let circles: Vec<(f64, f64)> = svg_children(mounts.get("sales").unwrap())
        .into_iter()
        .filter_map(|element| match element {
            SvgElement::Circle { cx, cy, .. } => Some((cx, cy)),
            _ => None,
        })
        .collect();

    assert_eq!(circles.len(), 3);
    // Feb holds the domain max and reaches the top edge
    assert_eq!(circles[1], (200.0, 30.0));
    // Mar (y = 0) lands on height - padding
    assert_eq!(circles[2], (370.0, 190.0));
}

#[test]
fn empty_bar_chart_shows_only_placeholder() {
    let api = StaticApi::default().chart("empty", response(ChartKind::Bar, &[]));
    let (orchestrator, mounts) = dashboard(&["empty"], api);

    block_on(orchestrator.refresh());

    let mount = mounts.get("empty").unwrap();
    assert_eq!(mount.children(), vec![VisualNode::Text(NO_DATA.to_string())]);
    assert!(!mount.markup().contains("<rect"));
}

#[test]
fn failed_chart_does_not_block_earlier_charts() {
    let api = StaticApi::default()
        .chart("signups", response(ChartKind::Bar, &[("EU", 12.0), ("US", 30.0), ("APAC", 7.0)]))
        .chart("revenue", Err(ApiError::status(500, "/api/charts/revenue")));
    let (orchestrator, mounts) = dashboard(&["signups", "revenue"], api);

    let outcome = block_on(orchestrator.refresh());

    assert!(matches!(outcome, CycleOutcome::Aborted { .. }));
    let bars = svg_children(mounts.get("signups").unwrap())
        .into_iter()
        .filter(|element| matches!(element, SvgElement::Rect { .. }))
        .count();
    assert_eq!(bars, 3);
    assert!(mounts.get("revenue").unwrap().is_empty());
    assert_eq!(orchestrator.sink().0.borrow().last(), Some(&RefreshPhase::Idle));
}

#[test]
fn skip_policy_renders_charts_after_a_failure() {
    let api = StaticApi::default()
        .chart("revenue", Err(ApiError::status(500, "/api/charts/revenue")))
        .chart("signups", response(ChartKind::Bar, &[("EU", 12.0)]));
    let (orchestrator, mounts) = dashboard(&["revenue", "signups"], api);
    let orchestrator = orchestrator.with_failure_policy(ChartFailurePolicy::SkipChart);

    let outcome = block_on(orchestrator.refresh());

    assert!(outcome.is_completed());
    assert!(!mounts.get("signups").unwrap().is_empty());
    assert!(mounts.get("revenue").unwrap().is_empty());
    assert_eq!(orchestrator.sink().0.borrow().last(), Some(&RefreshPhase::Idle));
}

#[test]
fn response_for_unconfigured_chart_is_ignored() {
    let api = StaticApi::default()
        .chart("first", response(ChartKind::Bar, &[("a", 1.0)]).map(|r| r.with_id("elsewhere")))
        .chart("second", response(ChartKind::Line, &[("a", 1.0), ("b", 2.0)]));
    let (orchestrator, mounts) = dashboard(&["first", "second"], api);

    let outcome = block_on(orchestrator.refresh());

    assert!(outcome.is_completed());
    assert_eq!(outcome.report().skipped, vec!["elsewhere"]);
    assert!(mounts.get("first").unwrap().is_empty());
    assert!(mounts.get("second").unwrap().markup().contains("<path"));
}
