//! Bucket aggregation
//!
//! Turns time intervals or categories into income/expense bucket pairs by
//! scanning the whole transaction snapshot once per pair. Empty buckets are
//! kept so the x-axis stays evenly spaced.

use chrono::NaiveDate;
use serde::Serialize;

use super::interval::{DateRange, Interval};
use crate::models::{Category, CategoryId, EntryKind, Money, Transaction};

/// Running count and exact sum of matched amounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub count: usize,
    pub total: Money,
}

impl Tally {
    /// Add one matched amount
    pub fn record(&mut self, amount: Money) {
        self.count += 1;
        self.total += amount;
    }
}

/// One bar of the chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    /// Display name, e.g. "Friday 03.05." or a category name
    pub label: String,
    /// Short x-axis caption
    pub caption: String,
    /// Inclusive start; the filter range start for category buckets
    pub period_start: NaiveDate,
    /// Inclusive end; the filter range end for category buckets
    pub period_end: NaiveDate,
    /// Set for category buckets
    pub category: Option<CategoryId>,
    pub kind: EntryKind,
    /// Number of matched transactions
    pub count: usize,
    /// Sum of matched amounts
    pub total: Money,
}

impl Bucket {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Income and expense buckets covering the same period or category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketPair {
    pub income: Bucket,
    pub expense: Bucket,
}

impl BucketPair {
    fn from_tallies(
        label: String,
        caption: String,
        range: DateRange,
        category: Option<CategoryId>,
        income: Tally,
        expense: Tally,
    ) -> Self {
        let bucket = |kind: EntryKind, tally: Tally| Bucket {
            label: label.clone(),
            caption: caption.clone(),
            period_start: range.start(),
            period_end: range.end(),
            category,
            kind,
            count: tally.count,
            total: tally.total,
        };
        Self {
            income: bucket(EntryKind::Income, income),
            expense: bucket(EntryKind::Expense, expense),
        }
    }

    /// The bucket of the given kind
    pub fn get(&self, kind: EntryKind) -> &Bucket {
        match kind {
            EntryKind::Income => &self.income,
            EntryKind::Expense => &self.expense,
        }
    }

    /// Both buckets, income first
    pub fn buckets(&self) -> [&Bucket; 2] {
        [&self.income, &self.expense]
    }

    /// Transactions matched by either bucket
    pub fn count(&self) -> usize {
        self.income.count + self.expense.count
    }
}

/// Scan the snapshot and split every match by its income flag
fn tally_matching<F>(transactions: &[Transaction], matches: F) -> (Tally, Tally)
where
    F: Fn(&Transaction) -> bool,
{
    let mut income = Tally::default();
    let mut expense = Tally::default();

    for txn in transactions.iter().filter(|t| matches(*t)) {
        match txn.kind() {
            EntryKind::Income => income.record(txn.amount),
            EntryKind::Expense => expense.record(txn.amount),
        }
    }

    (income, expense)
}

/// One bucket pair per time interval, in interval order
pub fn aggregate_intervals(intervals: &[Interval], transactions: &[Transaction]) -> Vec<BucketPair> {
    intervals
        .iter()
        .map(|interval| {
            let (income, expense) =
                tally_matching(transactions, |txn| interval.range.contains(txn.date));
            BucketPair::from_tallies(
                interval.label.clone(),
                interval.caption.clone(),
                interval.range,
                None,
                income,
                expense,
            )
        })
        .collect()
}

/// One bucket pair per category within the date range, in category order
///
/// The reserved uncategorized entry never gets a pair.
pub fn aggregate_categories(
    categories: &[Category],
    range: DateRange,
    transactions: &[Transaction],
) -> Vec<BucketPair> {
    categories
        .iter()
        .filter(|category| category.is_chartable())
        .map(|category| {
            let (income, expense) = tally_matching(transactions, |txn| {
                txn.category_id == category.id && range.contains(txn.date)
            });
            BucketPair::from_tallies(
                category.name.clone(),
                category.name.clone(),
                range,
                Some(category.id),
                income,
                expense,
            )
        })
        .collect()
}

/// Page size for `bucket_count` category pairs
///
/// Prefers the largest size in `max..=min` that divides the count evenly so
/// every page is full; otherwise picks the size leaving the fullest last page.
pub fn category_page_size(bucket_count: usize, min: usize, max: usize) -> usize {
    let min = min.max(1);
    let max = max.max(min);

    let mut best = max;
    let mut best_remainder = 0;
    for size in (min..=max).rev() {
        let remainder = bucket_count % size;
        if remainder == 0 {
            return size;
        }
        if remainder > best_remainder {
            best_remainder = remainder;
            best = size;
        }
    }
    best
}
