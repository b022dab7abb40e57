//! tally-chart - income and expense charts for personal finance data
//!
//! This library turns a snapshot of a user's transactions into paged
//! income/expense bar charts, bucketed by day, week, month, year or category,
//! with a value axis scaled to the visible page.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, categories, money)
//! - `stats`: Interval generation, aggregation, paging and axis scaling
//! - `storage`: Snapshot sources (JSON, CSV, in-memory)
//! - `display`: Terminal and JSON rendering of chart pages
//! - `cli`: Command handlers for the `tally` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use tally_chart::config::ChartSettings;
//! use tally_chart::stats::{ChartEngine, Granularity};
//!
//! let mut engine = ChartEngine::new(transactions, categories, ChartSettings::default());
//! engine.set_granularity(Granularity::Week);
//! let labels = engine.axis_labels();
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod stats;
pub mod storage;

pub use error::{TallyError, TallyResult};
