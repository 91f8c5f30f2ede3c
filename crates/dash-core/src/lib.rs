//! # dash-core
//!
//! Core domain types for the analytics dashboard: chart data points, API wire
//! payloads, filter state, static configuration and the refresh-cycle FSM.

pub mod api;
pub mod chart;
pub mod config;
pub mod error;
pub mod filter;

pub use api::*;
pub use chart::*;
pub use config::*;
pub use error::*;
pub use filter::*;

// ============================================================================
// REFRESH CYCLE FSM
// ============================================================================

/// Refresh cycle state.
///
/// `Idle -> Fetching -> Rendering -> Idle`, or `Fetching -> Failed -> Idle`
/// when a request is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPhase {
    #[default]
    Idle,
    Fetching,
    Rendering,
    Failed,
}

impl RefreshPhase {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Fetching | Self::Rendering)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Fetching => "Loading...",
            Self::Rendering => "Rendering...",
            Self::Failed => "Failed",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Idle => "phase-idle",
            Self::Fetching => "phase-fetching",
            Self::Rendering => "phase-rendering",
            Self::Failed => "phase-failed",
        }
    }
}

/// User-originated dashboard events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    /// Raw value of the start date input (empty clears it)
    StartDate(String),
    /// Raw value of the end date input (empty clears it)
    EndDate(String),
    /// Clear all filters, then refresh
    Reset,
    /// Refresh with the current filters (initial load)
    Reload,
}

impl FilterEvent {
    /// Whether the event touches the date range filter
    pub fn is_date_filter(&self) -> bool {
        !matches!(self, Self::Reload)
    }
}

// ============================================================================
// COLOR CONSTANTS
// ============================================================================

pub mod colors {
    pub const AXIS: &str = "#4b5563";
    pub const LINE: &str = "#60a5fa";
    pub const MARKER: &str = "#93c5fd";
    pub const BAR: &str = "#34d399";
    pub const LABEL: &str = "#9ca3af";
    pub const TEXT_PRIMARY: &str = "#f9fafb";
    pub const TEXT_MUTED: &str = "#9ca3af";
}
