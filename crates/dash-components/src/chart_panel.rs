//! Chart panels: one per configured chart, drawn from its canvas signal

use dash_charts::{SvgElement, VisualNode};
use dash_state::ChartSlot;
use leptos::prelude::*;

/// Titled panel around a chart canvas
#[component]
pub fn ChartPanel(slot: ChartSlot) -> impl IntoView {
    view! {
        <div class="panel chart-panel" id=format!("chart-{}", slot.id)>
            <div class="panel-header">
                <span class="panel-title">{slot.label}</span>
            </div>
            <div class="panel-content">
                <ChartCanvas nodes=slot.canvas />
            </div>
        </div>
    }
}

/// Mount point view: renders whatever the renderer last put on the canvas
#[component]
pub fn ChartCanvas(#[prop(into)] nodes: Signal<Vec<VisualNode>>) -> impl IntoView {
    view! {
        <div class="chart-canvas">
            {move || nodes.get().into_iter().map(node_view).collect_view()}
        </div>
    }
}

fn node_view(node: VisualNode) -> AnyView {
    match node {
        VisualNode::Text(text) => view! { <p class="chart-empty">{text}</p> }.into_any(),
        VisualNode::Svg { view_box, children } => view! {
            <svg
                class="chart-svg"
                viewBox=view_box
                preserveAspectRatio="xMidYMid meet"
                style="width: 100%; height: 100%;"
            >
                {children.into_iter().map(element_view).collect_view()}
            </svg>
        }
        .into_any(),
    }
}

fn element_view(element: SvgElement) -> AnyView {
    match element {
        SvgElement::Line { x1, y1, x2, y2, stroke, stroke_width } => view! {
            <line x1=x1 y1=y1 x2=x2 y2=y2 stroke=stroke stroke-width=stroke_width />
        }
        .into_any(),
        SvgElement::Path { d, stroke, stroke_width } => view! {
            <path d=d fill="none" stroke=stroke stroke-width=stroke_width />
        }
        .into_any(),
        SvgElement::Circle { cx, cy, r, fill } => view! {
            <circle cx=cx cy=cy r=r fill=fill />
        }
        .into_any(),
        SvgElement::Rect { x, y, width, height, fill } => view! {
            <rect x=x y=y width=width height=height fill=fill />
        }
        .into_any(),
        SvgElement::Text { x, y, anchor, font_size, fill, content } => view! {
            <text x=x y=y text-anchor=anchor font-size=font_size fill=fill>
                {content}
            </text>
        }
        .into_any(),
    }
}
