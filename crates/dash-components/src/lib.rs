//! # dash-components
//!
//! Leptos views for the analytics dashboard: header, filter bar, KPI cards,
//! chart panels and the sample table.

mod chart_panel;
mod dashboard;
mod filter_bar;
mod metric_cards;
mod table;

pub use chart_panel::*;
pub use dashboard::*;
pub use filter_bar::*;
pub use metric_cards::*;
pub use table::*;
