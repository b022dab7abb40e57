//! JSON snapshot files
//!
//! `transactions.json` holds an array of transactions (amounts in cents),
//! `categories.json` an array of `{ "id": 3, "name": "Food" }` records.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::file_io::{read_json, read_json_required};
use super::TransactionSource;
use crate::config::paths::TallyPaths;
use crate::error::{TallyError, TallyResult};
use crate::models::category::with_uncategorized;
use crate::models::{Category, Transaction, UserId};

/// Reads transactions and categories from JSON files
#[derive(Debug, Clone)]
pub struct JsonSnapshotSource {
    transactions_file: PathBuf,
    categories_file: PathBuf,
}

impl JsonSnapshotSource {
    pub fn new(transactions_file: impl Into<PathBuf>, categories_file: impl Into<PathBuf>) -> Self {
        Self {
            transactions_file: transactions_file.into(),
            categories_file: categories_file.into(),
        }
    }

    /// Source reading the files of the data directory
    pub fn from_paths(paths: &TallyPaths) -> Self {
        Self::new(paths.transactions_file(), paths.categories_file())
    }

    pub fn transactions_file(&self) -> &Path {
        &self.transactions_file
    }
}

impl TransactionSource for JsonSnapshotSource {
    fn fetch_transactions(&self, user: UserId) -> TallyResult<Vec<Transaction>> {
        let all: Vec<Transaction> = read_json_required(&self.transactions_file)?;
        let total = all.len();

        let mut owned = Vec::with_capacity(total);
        for (index, txn) in all.into_iter().enumerate() {
            txn.validate().map_err(|e| {
                TallyError::Validation(format!("transaction #{} ({}): {}", index + 1, txn.id, e))
            })?;
            if txn.user_id == user {
                owned.push(txn);
            }
        }

        debug!(
            file = %self.transactions_file.display(),
            total,
            owned = owned.len(),
            %user,
            "loaded transaction snapshot"
        );
        Ok(owned)
    }

    fn fetch_categories(&self) -> TallyResult<Vec<Category>> {
        categories_from_file(&self.categories_file)
    }
}

/// Load and validate a categories file; a missing file means no categories
pub(crate) fn categories_from_file(path: &Path) -> TallyResult<Vec<Category>> {
    let categories: Vec<Category> = read_json(path)?;
    for category in &categories {
        category.validate().map_err(|e| {
            TallyError::Validation(format!("category {}: {}", category.id, e))
        })?;
    }

    debug!(file = %path.display(), count = categories.len(), "loaded categories");
    Ok(with_uncategorized(categories))
}
