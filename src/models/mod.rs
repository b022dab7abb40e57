//! Core data models for tally-chart
//!
//! This module contains the read-only records the chart engine consumes:
//! transactions, categories, money amounts and their identifiers.

pub mod category;
pub mod ids;
pub mod money;
pub mod transaction;

pub use category::Category;
pub use ids::{CategoryId, TransactionId, UserId};
pub use money::Money;
pub use transaction::{EntryKind, Transaction};
