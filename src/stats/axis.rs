//! Value axis scaling
//!
//! Derives evenly spaced value-axis labels, in whole currency units, from the
//! largest visible bucket on the current page.

use serde::{Deserialize, Serialize};

use super::bucket::BucketPair;
use crate::models::{EntryKind, Money};

/// Which bucket kinds are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    pub income: bool,
    pub expense: bool,
}

impl Visibility {
    pub fn is_visible(&self, kind: EntryKind) -> bool {
        match kind {
            EntryKind::Income => self.income,
            EntryKind::Expense => self.expense,
        }
    }

    pub fn set(&mut self, kind: EntryKind, visible: bool) {
        match kind {
            EntryKind::Income => self.income = visible,
            EntryKind::Expense => self.expense = visible,
        }
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            income: true,
            expense: true,
        }
    }
}

/// Ascending value-axis labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisScale {
    labels: Vec<i64>,
}

impl AxisScale {
    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// The highest label
    pub fn top(&self) -> i64 {
        self.labels.last().copied().unwrap_or(0)
    }
}

/// Largest total among buckets whose kind is visible
pub fn max_visible_total(pairs: &[BucketPair], visibility: Visibility) -> Money {
    pairs
        .iter()
        .flat_map(|pair| pair.buckets())
        .filter(|bucket| visibility.is_visible(bucket.kind))
        .map(|bucket| bucket.total)
        .max()
        .unwrap_or_default()
}

/// Axis labels for the visible pairs
pub fn compute_scale(pairs: &[BucketPair], visibility: Visibility, level_count: usize) -> AxisScale {
    scale_for_max(max_visible_total(pairs, visibility).units_ceil(), level_count)
}

/// Axis labels for a known maximum, in whole currency units
///
/// Small or empty maxima give `[1, 2, ..., level_count]`. Larger ones are
/// rounded up to two significant digits and split into `level_count` steps.
pub fn scale_for_max(max_value: i64, level_count: usize) -> AxisScale {
    let level_count = level_count.max(1);
    let levels = level_count as i64;

    if max_value <= levels {
        return AxisScale {
            labels: (1..=levels).collect(),
        };
    }

    let unit = rounding_unit(max_value);
    let mut ceiling = ((max_value + unit - 1) / unit) * unit;
    if ceiling < max_value {
        ceiling = max_value;
    }
    debug_assert!(ceiling >= max_value);

    let labels = (1..=levels)
        .map(|i| round_div(ceiling * i, levels))
        .collect();

    AxisScale { labels }
}

/// Power of ten two places below the leading digit of `value`
fn rounding_unit(value: i64) -> i64 {
    let digits = value.unsigned_abs().checked_ilog10().unwrap_or(0) + 1;
    if digits <= 2 {
        1
    } else {
        10_i64.pow(digits - 2)
    }
}

/// Integer division rounding half away from zero, for non-negative inputs
fn round_div(numerator: i64, denominator: i64) -> i64 {
    (numerator + denominator / 2) / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::bucket::aggregate_intervals;
    use crate::stats::interval::year_intervals;
    use crate::models::Transaction;
    use chrono::NaiveDate;

    fn pairs_with(income: i64, expense: i64) -> Vec<BucketPair> {
        let date = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let transactions = vec![
            Transaction::income(date, Money::from_units(income)),
            Transaction::expense(date, Money::from_units(expense)),
        ];
        aggregate_intervals(&year_intervals(2023, 2023), &transactions)
    }

    fn assert_strictly_ascending(labels: &[i64]) {
        for pair in labels.windows(2) {
            assert!(pair[0] < pair[1], "{:?} is not strictly ascending", labels);
        }
    }

    #[test]
    fn test_degenerate_scale() {
        assert_eq!(scale_for_max(0, 5).labels(), &[1, 2, 3, 4, 5]);
        assert_eq!(scale_for_max(5, 5).labels(), &[1, 2, 3, 4, 5]);
        assert_eq!(compute_scale(&[], Visibility::default(), 5).labels(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_all_empty_buckets() {
        let pairs = pairs_with(0, 0);
        assert_eq!(
            compute_scale(&pairs, Visibility::default(), 5).labels(),
            &[1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn test_round_thousands() {
        assert_eq!(scale_for_max(15000, 5).labels(), &[3000, 6000, 9000, 12000, 15000]);
        assert_eq!(scale_for_max(9000, 5).labels(), &[1800, 3600, 5400, 7200, 9000]);
    }

    #[test]
    fn test_ceiling_never_below_max() {
        // just above a power of ten
        let scale = scale_for_max(10001, 5);
        assert_eq!(scale.top(), 11000);

        for max in [6, 7, 13, 99, 100, 101, 999, 1001, 12345, 99999, 100001, 7654321] {
            let scale = scale_for_max(max, 5);
            assert!(scale.top() >= max, "top {} below max {}", scale.top(), max);
            assert_strictly_ascending(scale.labels());
            assert_eq!(scale.labels().len(), 5);
        }
    }

    #[test]
    fn test_hidden_kind_ignored() {
        let pairs = pairs_with(15000, 9000);
        let expense_only = Visibility {
            income: false,
            expense: true,
        };
        assert_eq!(compute_scale(&pairs, expense_only, 5).top(), 9000);
        assert_eq!(compute_scale(&pairs, Visibility::default(), 5).top(), 15000);

        let nothing = Visibility {
            income: false,
            expense: false,
        };
        assert_eq!(compute_scale(&pairs, nothing, 5).labels(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_cents_round_up() {
        let date = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let transactions = vec![Transaction::expense(date, Money::from_cents(1001))];
        let pairs = aggregate_intervals(&year_intervals(2023, 2023), &transactions);
        // 10.01 needs a top label of 11
        assert_eq!(compute_scale(&pairs, Visibility::default(), 5).top(), 11);
    }

    #[test]
    fn test_other_level_counts() {
        let scale = scale_for_max(640, 4);
        assert_eq!(scale.labels(), &[160, 320, 480, 640]);
        assert_eq!(scale_for_max(2, 3).labels(), &[1, 2, 3]);
    }
}
