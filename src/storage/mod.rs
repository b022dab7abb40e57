//! Snapshot sources for the chart engine
//!
//! The engine never reads storage itself. A [`TransactionSource`] hands it an
//! owned, read-only snapshot of one user's transactions plus the category
//! list, and the engine aggregates that snapshot until it is replaced.

pub mod csv_source;
pub mod file_io;
pub mod json_source;

pub use csv_source::CsvSnapshotSource;
pub use file_io::{read_json, read_json_required, write_json_atomic};
pub use json_source::JsonSnapshotSource;

use crate::error::TallyResult;
use crate::models::{Category, Transaction, UserId};

/// Provider of transaction snapshots
pub trait TransactionSource {
    /// All transactions owned by `user`
    fn fetch_transactions(&self, user: UserId) -> TallyResult<Vec<Transaction>>;

    /// The category list, uncategorized entry included
    fn fetch_categories(&self) -> TallyResult<Vec<Category>>;
}

/// In-memory source for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
}

impl MemorySource {
    pub fn new(transactions: Vec<Transaction>, categories: Vec<Category>) -> Self {
        Self {
            transactions,
            categories,
        }
    }
}

impl TransactionSource for MemorySource {
    fn fetch_transactions(&self, user: UserId) -> TallyResult<Vec<Transaction>> {
        Ok(self
            .transactions
            .iter()
            .filter(|txn| txn.user_id == user)
            .cloned()
            .collect())
    }

    fn fetch_categories(&self) -> TallyResult<Vec<Category>> {
        Ok(self.categories.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    #[test]
    fn test_memory_source_filters_by_user() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let source = MemorySource::new(
            vec![
                Transaction::income(date, Money::from_units(10)).owned_by(UserId::new(1)),
                Transaction::expense(date, Money::from_units(20)).owned_by(UserId::new(2)),
            ],
            vec![Category::new(1, "Food")],
        );

        let mine = source.fetch_transactions(UserId::new(1)).unwrap();
        assert_eq!(mine.len(), 1);
        assert!(mine[0].income);
        assert_eq!(source.fetch_categories().unwrap().len(), 1);
    }
}
