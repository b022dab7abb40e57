//! Display formatting for terminal output
//!
//! Renders chart snapshots as tables with text bars, or as JSON for other
//! tools to draw.

pub mod chart;

pub use chart::{describe_mode, format_bar, format_chart, format_chart_json};
