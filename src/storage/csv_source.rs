//! CSV transaction export
//!
//! Expected header: `date,type,amount[,category][,name][,note][,user]`.
//! `type` is `income` or `expense`, `amount` a decimal such as `12.50` or
//! `1 250,75`, dates are `YYYY-MM-DD` or `DD.MM.YYYY`. Categories still come
//! from a JSON file.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use super::json_source::categories_from_file;
use super::TransactionSource;
use crate::error::{TallyError, TallyResult};
use crate::models::{Category, CategoryId, EntryKind, Money, Transaction, UserId};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    #[serde(rename = "type")]
    kind: EntryKind,
    amount: String,
    #[serde(default)]
    category: Option<u32>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    user: Option<u32>,
}

/// Reads transactions from a CSV export and categories from JSON
#[derive(Debug, Clone)]
pub struct CsvSnapshotSource {
    transactions_file: PathBuf,
    categories_file: PathBuf,
}

impl CsvSnapshotSource {
    pub fn new(transactions_file: impl Into<PathBuf>, categories_file: impl Into<PathBuf>) -> Self {
        Self {
            transactions_file: transactions_file.into(),
            categories_file: categories_file.into(),
        }
    }

    pub fn transactions_file(&self) -> &Path {
        &self.transactions_file
    }
}

impl TransactionSource for CsvSnapshotSource {
    fn fetch_transactions(&self, user: UserId) -> TallyResult<Vec<Transaction>> {
        let path = &self.transactions_file;
        if !path.exists() {
            return Err(TallyError::snapshot_not_found(path.display().to_string()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)?;

        let mut owned = Vec::new();
        let mut total = 0;
        for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
            // header is line 1
            let line = index + 2;
            let row = result.map_err(|e| TallyError::Csv(format!("line {}: {}", line, e)))?;
            let txn = parse_row(row).map_err(|e| {
                warn!(line, error = %e, "rejected csv row");
                TallyError::Validation(format!("line {}: {}", line, e))
            })?;

            total += 1;
            if txn.user_id == user {
                owned.push(txn);
            }
        }

        debug!(
            file = %path.display(),
            total,
            owned = owned.len(),
            %user,
            "loaded csv transactions"
        );
        Ok(owned)
    }

    fn fetch_categories(&self) -> TallyResult<Vec<Category>> {
        categories_from_file(&self.categories_file)
    }
}

fn parse_row(row: CsvRow) -> Result<Transaction, String> {
    let date = parse_date(&row.date)?;
    let amount = Money::parse(&row.amount).map_err(|e| e.to_string())?;

    let mut txn = Transaction::new(date, amount, row.kind == EntryKind::Income)
        .in_category(row.category.map(CategoryId::new).unwrap_or_default())
        .owned_by(row.user.map(UserId::new).unwrap_or_default());
    txn.name = row.name.unwrap_or_default();
    txn.note = row.note.unwrap_or_default();

    txn.validate().map_err(|e| e.to_string())?;
    Ok(txn)
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .ok_or_else(|| format!("Invalid date: {}", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn source_with(csv_data: &str) -> (TempDir, CsvSnapshotSource) {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("export.csv");
        fs::write(&csv_path, csv_data).unwrap();
        fs::write(
            dir.path().join("categories.json"),
            r#"[{"id": 2, "name": "Food"}]"#,
        )
        .unwrap();
        let source = CsvSnapshotSource::new(csv_path, dir.path().join("categories.json"));
        (dir, source)
    }

    #[test]
    fn test_parse_full_rows() {
        let (_dir, source) = source_with(
            "date,type,amount,category,name,note,user\n\
             2024-05-15,income,500,,Salary,,\n\
             16.05.2024,expense,\"1 250,75\",2,Groceries,weekly,\n\
             2024-05-17,expense,9.99,,Coffee,,3\n",
        );

        let txns = source.fetch_transactions(UserId::default()).unwrap();
        assert_eq!(txns.len(), 2);
        assert!(txns[0].income);
        assert_eq!(txns[0].amount, Money::from_units(500));
        assert_eq!(txns[1].date, NaiveDate::from_ymd_opt(2024, 5, 16).unwrap());
        assert_eq!(txns[1].amount, Money::from_cents(125075));
        assert_eq!(txns[1].category_id, CategoryId::new(2));
        assert_eq!(txns[1].note, "weekly");

        let other = source.fetch_transactions(UserId::new(3)).unwrap();
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].name, "Coffee");
    }

    #[test]
    fn test_minimal_columns() {
        let (_dir, source) = source_with("date,type,amount\n2024-01-02,expense,3.5\n");
        let txns = source.fetch_transactions(UserId::default()).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].amount, Money::from_cents(350));
        assert!(txns[0].category_id.is_uncategorized());
    }

    #[test]
    fn test_bad_amount_reports_line() {
        let (_dir, source) = source_with("date,type,amount\n2024-01-02,expense,3.5\n2024-01-03,income,lots\n");
        let err = source.fetch_transactions(UserId::default()).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_malformed_decimals_rejected() {
        for amount in ["12.€", "1.-5", "1.999"] {
            let (_dir, source) =
                source_with(&format!("date,type,amount\n2024-01-02,expense,{}\n", amount));
            let err = source.fetch_transactions(UserId::default()).unwrap_err();
            assert!(err.is_validation(), "{} gave {:?}", amount, err);
        }
    }

    #[test]
    fn test_negative_amount_rejected() {
        let (_dir, source) = source_with("date,type,amount\n2024-01-02,expense,-3\n");
        assert!(source.fetch_transactions(UserId::default()).unwrap_err().is_validation());
    }

    #[test]
    fn test_unknown_type_is_csv_error() {
        let (_dir, source) = source_with("date,type,amount\n2024-01-02,transfer,3\n");
        let err = source.fetch_transactions(UserId::default()).unwrap_err();
        assert!(matches!(err, TallyError::Csv(_)));
    }

    #[test]
    fn test_categories_loaded_from_json() {
        let (_dir, source) = source_with("date,type,amount\n");
        let categories = source.fetch_categories().unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1].name, "Food");
    }
}
