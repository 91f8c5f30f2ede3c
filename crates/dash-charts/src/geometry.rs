//! Geometry builder: chart data to drawable primitives
//!
//! Output is plain data. Nothing in here touches a visual tree.

use crate::{
    chartkit::{LinearScale, Scale, ScaleDomain},
    ChartStyle, Viewport,
};
use dash_core::{ChartKind, ChartSpec, Point};

/// Placeholder text shown instead of an empty chart
pub const NO_DATA: &str = "No data";

/// One drawable instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    AxisLine { from: (f64, f64), to: (f64, f64) },
    Path { points: Vec<(f64, f64)>, stroke: String },
    Marker { cx: f64, cy: f64, r: f64 },
    Bar { x: f64, y: f64, width: f64, height: f64 },
    /// Category label, centered on `x`
    Label { x: f64, y: f64, text: String },
    /// Stand-in for a chart with nothing to draw
    Placeholder { text: String },
}

impl Primitive {
    pub fn placeholder() -> Self {
        Self::Placeholder { text: NO_DATA.to_string() }
    }
}

// ============================================================================
// STRATEGY PATTERN: Chart Geometry
// ============================================================================

/// Strategy trait for turning ordered points into primitives
pub trait ChartGeometry {
    fn build(&self, points: &[Point], viewport: &Viewport, style: &ChartStyle) -> Vec<Primitive>;
}

/// Polyline with a marker per point, x placed by sequence index
#[derive(Debug, Clone, Copy, Default)]
pub struct LineGeometry;

/// One bar per point in equal slots, with a category label under each
#[derive(Debug, Clone, Copy, Default)]
pub struct BarGeometry;

impl ChartGeometry for LineGeometry {
    fn build(&self, points: &[Point], viewport: &Viewport, style: &ChartStyle) -> Vec<Primitive> {
        if points.is_empty() {
            return vec![Primitive::placeholder()];
        }

        let x_scale = LinearScale::new()
            .with_domain(ScaleDomain::for_indices(points.len()))
            .range(viewport.left(), viewport.right());
        let y_scale = value_scale(points, viewport);

        let coords: Vec<(f64, f64)> = points
            .iter()
            .enumerate()
            .map(|(i, p)| (x_scale.scale(i as f64), y_scale.scale(p.y)))
            .collect();

        let mut primitives = Vec::with_capacity(coords.len() + 3);
        primitives.extend(axes(viewport));
        primitives.push(Primitive::Path {
            points: coords.clone(),
            stroke: style.line_stroke.to_string(),
        });
        primitives.extend(coords.into_iter().map(|(cx, cy)| Primitive::Marker {
            cx,
            cy,
            r: style.marker_radius,
        }));

        primitives
    }
}

impl ChartGeometry for BarGeometry {
    fn build(&self, points: &[Point], viewport: &Viewport, style: &ChartStyle) -> Vec<Primitive> {
        if points.is_empty() {
            return vec![Primitive::placeholder()];
        }

        let domain = ScaleDomain::for_values(points.iter().map(|p| p.y));
        let height_scale = LinearScale::new()
            .with_domain(domain)
            .range(0.0, viewport.inner_height());

        let n = points.len() as f64;
        let slot_width = viewport.inner_width() / n;
        let bar_width = slot_width * style.bar_fill_ratio;
        let bottom = viewport.bottom();

        let mut primitives = Vec::with_capacity(points.len() * 2 + 2);
        primitives.extend(axes(viewport));

        for (i, point) in points.iter().enumerate() {
            let center = viewport.left() + slot_width * (i as f64 + 0.5);
            let height = height_scale.scale(point.y);

            primitives.push(Primitive::Bar {
                x: center - bar_width / 2.0,
                y: bottom - height,
                width: bar_width,
                height,
            });
            primitives.push(Primitive::Label {
                x: center,
                y: bottom + style.label_offset,
                text: point.x.to_string(),
            });
        }

        primitives
    }
}

/// Bottom x axis and left y axis
fn axes(viewport: &Viewport) -> [Primitive; 2] {
    [
        Primitive::AxisLine {
            from: (viewport.left(), viewport.bottom()),
            to: (viewport.right(), viewport.bottom()),
        },
        Primitive::AxisLine {
            from: (viewport.left(), viewport.top()),
            to: (viewport.left(), viewport.bottom()),
        },
    ]
}

/// y scale mapping `[0, max]` onto `[bottom, top]`
fn value_scale(points: &[Point], viewport: &Viewport) -> LinearScale {
    LinearScale::new()
        .with_domain(ScaleDomain::for_values(points.iter().map(|p| p.y)))
        .range(viewport.bottom(), viewport.top())
}

/// Geometry strategy for a chart kind
pub fn geometry_for(kind: ChartKind) -> &'static dyn ChartGeometry {
    match kind {
        ChartKind::Line => &LineGeometry,
        ChartKind::Bar => &BarGeometry,
    }
}

/// Build the primitives for a chart, dispatching on its kind
pub fn build_geometry(spec: &ChartSpec, viewport: &Viewport, style: &ChartStyle) -> Vec<Primitive> {
    geometry_for(spec.kind).build(&spec.points, viewport, style)
}
