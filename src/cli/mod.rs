//! CLI command handlers
//!
//! Bridges the clap argument parsing with the chart engine.

pub mod chart;

pub use chart::{handle_chart_command, render_chart_command, ChartCommands};
