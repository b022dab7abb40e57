//! Transaction model
//!
//! A transaction is an immutable snapshot record handed to the chart engine by
//! the persistence layer. Amounts are always non-negative; the `income` flag
//! decides which side of the chart a record lands on.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, TransactionId, UserId};
use super::money::Money;

/// Which side of the ledger an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    /// Kind of a record with the given income flag
    pub fn from_income_flag(income: bool) -> Self {
        if income {
            Self::Income
        } else {
            Self::Expense
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    #[serde(default)]
    pub id: TransactionId,

    /// Owner of the record
    #[serde(default)]
    pub user_id: UserId,

    /// Short description
    #[serde(default)]
    pub name: String,

    /// Transaction date
    pub date: NaiveDate,

    /// Amount, never negative
    pub amount: Money,

    /// True for income, false for expense
    pub income: bool,

    /// Category; `CategoryId::UNCATEGORIZED` when none was chosen
    #[serde(default)]
    pub category_id: CategoryId,

    /// Free-form notes
    #[serde(default)]
    pub note: String,

    /// When the record was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new uncategorized transaction
    pub fn new(date: NaiveDate, amount: Money, income: bool) -> Self {
        Self {
            id: TransactionId::new(),
            user_id: UserId::default(),
            name: String::new(),
            date,
            amount,
            income,
            category_id: CategoryId::UNCATEGORIZED,
            note: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Create an income record
    pub fn income(date: NaiveDate, amount: Money) -> Self {
        Self::new(date, amount, true)
    }

    /// Create an expense record
    pub fn expense(date: NaiveDate, amount: Money) -> Self {
        Self::new(date, amount, false)
    }

    /// Builder-style category assignment
    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = category_id;
        self
    }

    /// Builder-style owner assignment
    pub fn owned_by(mut self, user_id: UserId) -> Self {
        self.user_id = user_id;
        self
    }

    /// Income or expense
    pub fn kind(&self) -> EntryKind {
        EntryKind::from_income_flag(self.income)
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount(self.amount));
        }

        if self.name.len() > 300 {
            return Err(TransactionValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.kind(),
            self.amount,
            self.name
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NegativeAmount(Money),
    NameTooLong(usize),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(f, "Transaction amount must not be negative: {}", amount)
            }
            Self::NameTooLong(len) => {
                write!(f, "Transaction name too long ({} chars, max 300)", len)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_kind() {
        let txn = Transaction::income(date(2024, 5, 15), Money::from_units(500));
        assert_eq!(txn.kind(), EntryKind::Income);
        assert!(txn.category_id.is_uncategorized());

        let txn = Transaction::expense(date(2024, 5, 15), Money::from_units(20));
        assert_eq!(txn.kind(), EntryKind::Expense);
    }

    #[test]
    fn test_validate() {
        let txn = Transaction::expense(date(2024, 1, 1), Money::from_cents(-1));
        assert!(matches!(
            txn.validate(),
            Err(TransactionValidationError::NegativeAmount(_))
        ));

        let txn = Transaction::expense(date(2024, 1, 1), Money::zero());
        assert!(txn.validate().is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"date":"2024-05-15","amount":50000,"income":true}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.amount, Money::from_units(500));
        assert!(txn.income);
        assert_eq!(txn.category_id, CategoryId::UNCATEGORIZED);
    }
}
