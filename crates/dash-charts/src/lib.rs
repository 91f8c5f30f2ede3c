//! # dash-charts
//!
//! SVG chart engine for the analytics dashboard.
//!
//! ## Architecture
//!
//! - `chartkit` - Scale function, linear scale and path builder
//! - `geometry` - Turns a [`ChartSpec`](dash_core::ChartSpec) into drawable primitives
//!   (Strategy pattern: one geometry per chart kind)
//! - `render` - Materializes primitives into a visual tree on a mount point
//!
//! Geometry is plain data, so it can be tested without any DOM.

pub mod chartkit;
pub mod geometry;
pub mod render;

pub use chartkit::*;
pub use geometry::*;
pub use render::*;

// Re-export colors from dash-core for convenience
pub use dash_core::colors;

/// Fixed drawing area shared by every chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64, padding: f64) -> Self {
        Self { width, height, padding }
    }

    /// Left edge of the plot area (y axis column)
    pub fn left(&self) -> f64 {
        self.padding
    }

    /// Right edge of the plot area
    pub fn right(&self) -> f64 {
        self.width - self.padding
    }

    /// Top edge of the plot area
    pub fn top(&self) -> f64 {
        self.padding
    }

    /// Bottom edge of the plot area (x axis row / baseline)
    pub fn bottom(&self) -> f64 {
        self.height - self.padding
    }

    /// Inner width (excluding padding)
    pub fn inner_width(&self) -> f64 {
        (self.width - 2.0 * self.padding).max(0.0)
    }

    /// Inner height (excluding padding)
    pub fn inner_height(&self) -> f64 {
        (self.height - 2.0 * self.padding).max(0.0)
    }

    /// ViewBox string for SVG
    pub fn viewbox(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(400.0, 220.0, 30.0)
    }
}

/// Stroke, fill and text settings applied to every chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub axis_stroke: &'static str,
    pub axis_width: f64,
    pub line_stroke: &'static str,
    pub line_width: f64,
    pub marker_fill: &'static str,
    pub marker_radius: f64,
    pub bar_fill: &'static str,
    /// Share of each bar slot covered by the bar
    pub bar_fill_ratio: f64,
    pub label_fill: &'static str,
    pub label_font_size: f64,
    /// Distance of category labels below the x axis
    pub label_offset: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            axis_stroke: colors::AXIS,
            axis_width: 1.0,
            line_stroke: colors::LINE,
            line_width: 2.0,
            marker_fill: colors::MARKER,
            marker_radius: 3.0,
            bar_fill: colors::BAR,
            bar_fill_ratio: 0.7,
            label_fill: colors::LABEL,
            label_font_size: 9.0,
            label_offset: 12.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let vp = Viewport::default();
        assert_eq!(vp.bottom(), 190.0);
        assert_eq!(vp.right(), 370.0);
        assert_eq!(vp.inner_width(), 340.0);
        assert_eq!(vp.inner_height(), 160.0);
        assert_eq!(vp.viewbox(), "0 0 400 220");
    }

    #[test]
    fn test_oversized_padding_clamps() {
        let vp = Viewport::new(40.0, 40.0, 30.0);
        assert_eq!(vp.inner_width(), 0.0);
        assert_eq!(vp.inner_height(), 0.0);
    }
}
