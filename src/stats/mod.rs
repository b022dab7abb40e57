//! Statistics aggregation
//!
//! Turns a transaction snapshot into paged income/expense bucket pairs with a
//! value axis scaled to the visible page:
//!
//! - [`interval`] splits a month or year range into time intervals
//! - [`bucket`] sums transactions into per-interval or per-category pairs
//! - [`page`] slices pairs into pages
//! - [`axis`] derives the value-axis labels
//! - [`engine`] owns the chart parameters and ties the steps together

pub mod axis;
pub mod bucket;
pub mod engine;
pub mod interval;
pub mod observer;
pub mod page;

pub use axis::{AxisScale, Visibility};
pub use bucket::{Bucket, BucketPair};
pub use engine::{ChartEngine, ChartMode};
pub use interval::{DateRange, Granularity, Interval, TimeSelection};
pub use observer::{ChartObserver, ChartSnapshot};
pub use page::{Page, PageInfo, Paginator};
