//! Chart renderer: primitives to a retained SVG tree on a mount point
//!
//! This is the only layer that produces visual nodes. Mount points are
//! abstract so the same renderer drives Leptos signals and in-memory targets.

use crate::{
    chartkit::line_path,
    geometry::{build_geometry, Primitive},
    ChartStyle, Viewport,
};
use dash_core::{ChartConfig, ChartSpec};
use leptos::prelude::*;
use std::cell::RefCell;
use std::fmt::Write;
use std::rc::Rc;

// ============================================================================
// VISUAL TREE
// ============================================================================

/// SVG child element
#[derive(Debug, Clone, PartialEq)]
pub enum SvgElement {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: String,
        stroke_width: f64,
    },
    Path {
        d: String,
        stroke: String,
        stroke_width: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: String,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: String,
    },
    Text {
        x: f64,
        y: f64,
        anchor: &'static str,
        font_size: f64,
        fill: String,
        content: String,
    },
}

/// Top-level content of a mount point
#[derive(Debug, Clone, PartialEq)]
pub enum VisualNode {
    Svg {
        view_box: String,
        children: Vec<SvgElement>,
    },
    /// Plain text (used for the "No data" placeholder)
    Text(String),
}

impl VisualNode {
    /// Number of drawn elements (a text node counts as one)
    pub fn element_count(&self) -> usize {
        match self {
            Self::Svg { children, .. } => children.len(),
            Self::Text(_) => 1,
        }
    }

    /// Serialize to SVG/HTML markup
    pub fn to_markup(&self) -> String {
        match self {
            Self::Text(text) => escape(text),
            Self::Svg { view_box, children } => {
                let mut out = String::with_capacity(64 + children.len() * 96);
                let _ = write!(
                    out,
                    r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{}">"#,
                    view_box
                );
                for child in children {
                    child.write_markup(&mut out);
                }
                out.push_str("</svg>");
                out
            }
        }
    }
}

impl SvgElement {
    fn write_markup(&self, out: &mut String) {
        let _ = match self {
            Self::Line { x1, y1, x2, y2, stroke, stroke_width } => write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
                x1, y1, x2, y2, stroke, stroke_width
            ),
            Self::Path { d, stroke, stroke_width } => write!(
                out,
                r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                d, stroke, stroke_width
            ),
            Self::Circle { cx, cy, r, fill } => write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                cx, cy, r, fill
            ),
            Self::Rect { x, y, width, height, fill } => write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                x, y, width, height, fill
            ),
            Self::Text { x, y, anchor, font_size, fill, content } => write!(
                out,
                r#"<text x="{}" y="{}" text-anchor="{}" font-size="{}" fill="{}">{}</text>"#,
                x,
                y,
                anchor,
                font_size,
                fill,
                escape(content)
            ),
        };
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ============================================================================
// MOUNT POINTS
// ============================================================================

/// Named visual container a chart is drawn into
pub trait MountPoint {
    /// Replace every child of the container
    fn replace_children(&self, children: Vec<VisualNode>);

    fn clear(&self) {
        self.replace_children(Vec::new());
    }
}

/// Live mount point: the chart canvas component renders whatever the signal holds
impl MountPoint for RwSignal<Vec<VisualNode>> {
    fn replace_children(&self, children: Vec<VisualNode>) {
        self.set(children);
    }
}

/// In-memory mount point (tests, markup export)
#[derive(Debug, Clone, Default)]
pub struct MemoryMount {
    children: Rc<RefCell<Vec<VisualNode>>>,
}

impl MemoryMount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children(&self) -> Vec<VisualNode> {
        self.children.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.children.borrow().is_empty()
    }

    pub fn markup(&self) -> String {
        self.children.borrow().iter().map(VisualNode::to_markup).collect()
    }
}

impl MountPoint for MemoryMount {
    fn replace_children(&self, children: Vec<VisualNode>) {
        *self.children.borrow_mut() = children;
    }
}

/// Chart id to mount point relation, fixed at initialization
#[derive(Debug, Clone)]
pub struct MountRegistry<M> {
    entries: Vec<(String, M)>,
}

impl<M> MountRegistry<M> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// One mount per configured chart, in configuration order
    pub fn from_charts(charts: &[ChartConfig], mut create: impl FnMut(&ChartConfig) -> M) -> Self {
        Self {
            entries: charts.iter().map(|c| (c.id.clone(), create(c))).collect(),
        }
    }

    /// Register a mount; an existing id keeps its original mount
    pub fn register(&mut self, id: impl Into<String>, mount: M) -> bool {
        let id = id.into();
        if self.get(&id).is_some() {
            tracing::warn!("Mount point '{}' already registered", id);
            return false;
        }
        self.entries.push((id, mount));
        true
    }

    pub fn get(&self, id: &str) -> Option<&M> {
        self.entries.iter().find(|(key, _)| key == id).map(|(_, mount)| mount)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<M> Default for MountRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// RENDERER
// ============================================================================

/// Materializes primitives on mount points
#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    viewport: Viewport,
    style: ChartStyle,
}

impl ChartRenderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            style: ChartStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    /// Build the visual node for a primitive list.
    ///
    /// A lone placeholder becomes plain text rather than an empty SVG.
    pub fn to_node(&self, primitives: &[Primitive]) -> VisualNode {
        if let [Primitive::Placeholder { text }] = primitives {
            return VisualNode::Text(text.clone());
        }

        VisualNode::Svg {
            view_box: self.viewport.viewbox(),
            children: primitives.iter().map(|p| self.element(p)).collect(),
        }
    }

    /// Replace the mount's content with the given primitives
    pub fn render<M: MountPoint + ?Sized>(&self, mount: &M, primitives: &[Primitive]) {
        let node = self.to_node(primitives);
        mount.replace_children(vec![node]);
    }

    /// Geometry + render in one step
    pub fn render_chart<M: MountPoint + ?Sized>(&self, mount: &M, spec: &ChartSpec) -> usize {
        let primitives = build_geometry(spec, &self.viewport, &self.style);
        self.render(mount, &primitives);
        primitives.len()
    }

    fn element(&self, primitive: &Primitive) -> SvgElement {
        let style = &self.style;
        match primitive {
            Primitive::AxisLine { from, to } => SvgElement::Line {
                x1: from.0,
                y1: from.1,
                x2: to.0,
                y2: to.1,
                stroke: style.axis_stroke.to_string(),
                stroke_width: style.axis_width,
            },
            Primitive::Path { points, stroke } => SvgElement::Path {
                d: line_path(points),
                stroke: stroke.clone(),
                stroke_width: style.line_width,
            },
            Primitive::Marker { cx, cy, r } => SvgElement::Circle {
                cx: *cx,
                cy: *cy,
                r: *r,
                fill: style.marker_fill.to_string(),
            },
            Primitive::Bar { x, y, width, height } => SvgElement::Rect {
                x: *x,
                y: *y,
                width: *width,
                height: *height,
                fill: style.bar_fill.to_string(),
            },
            Primitive::Label { x, y, text } => SvgElement::Text {
                x: *x,
                y: *y,
                anchor: "middle",
                font_size: style.label_font_size,
                fill: style.label_fill.to_string(),
                content: text.clone(),
            },
            Primitive::Placeholder { text } => SvgElement::Text {
                x: self.viewport.width / 2.0,
                y: self.viewport.height / 2.0,
                anchor: "middle",
                font_size: style.label_font_size,
                fill: style.label_fill.to_string(),
                content: text.clone(),
            },
        }
    }
}
