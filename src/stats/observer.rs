//! Change notification for chart consumers
//!
//! Rendering layers register a [`ChartObserver`] on the engine instead of the
//! engine calling into any UI code. Consumers that prefer polling can read
//! [`ChartSnapshot`]s straight from the engine.

use serde::Serialize;

use super::axis::Visibility;
use super::bucket::BucketPair;
use super::engine::ChartMode;
use super::page::PageInfo;
use crate::models::Money;

/// Everything a renderer needs to draw the current page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSnapshot {
    pub mode: ChartMode,
    pub visibility: Visibility,
    /// Visible income/expense pairs in period order
    pub pairs: Vec<BucketPair>,
    pub page: PageInfo,
    /// Value-axis labels, ascending
    pub axis_labels: Vec<i64>,
    /// One caption per visible pair
    pub x_axis_labels: Vec<String>,
    /// Sum of the visible income buckets
    pub income_total: Money,
    /// Sum of the visible expense buckets
    pub expense_total: Money,
}

/// Receives a snapshot after every recomputation of the chart
pub trait ChartObserver {
    fn chart_updated(&self, snapshot: &ChartSnapshot);
}

impl<F> ChartObserver for F
where
    F: Fn(&ChartSnapshot),
{
    fn chart_updated(&self, snapshot: &ChartSnapshot) {
        self(snapshot)
    }
}
