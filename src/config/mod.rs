//! Configuration module for tally-chart
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - User settings persistence
//! - Chart layout preferences

pub mod paths;
pub mod settings;

pub use paths::TallyPaths;
pub use settings::{ChartSettings, Settings};
