//! Chart aggregation engine
//!
//! Owns the chart parameters (aggregation mode, granularity, selected period
//! or date range, income/expense visibility, page index) and rebuilds the
//! bucket sequence, the visible page and the axis scale whenever one of them
//! changes. Rejected parameters leave the previous state untouched.

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, trace, warn};

use super::axis::{compute_scale, scale_for_max, AxisScale, Visibility};
use super::bucket::{aggregate_categories, aggregate_intervals, category_page_size, Bucket, BucketPair};
use super::interval::{self, first_day_of_previous_month, DateRange, Granularity, TimeSelection};
use super::observer::{ChartObserver, ChartSnapshot};
use super::page::{Page, PageInfo, Paginator};
use crate::config::settings::ChartSettings;
use crate::error::{TallyError, TallyResult};
use crate::models::category::with_uncategorized;
use crate::models::{Category, EntryKind, Money, Transaction};

/// What the buckets are built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ChartMode {
    /// Time overview: one pair per interval
    Time {
        granularity: Granularity,
        selection: TimeSelection,
    },
    /// Category overview: one pair per category within a date range
    Categories { range: DateRange },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModeKind {
    Time,
    Categories,
}

/// The aggregation orchestrator behind the statistics charts
pub struct ChartEngine {
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    settings: ChartSettings,
    today: NaiveDate,

    kind: ModeKind,
    granularity: Granularity,
    selection: TimeSelection,
    range: DateRange,
    visibility: Visibility,

    pairs: Vec<BucketPair>,
    pager: Paginator,
    page: Page<BucketPair>,
    axis: AxisScale,

    observers: Vec<Box<dyn ChartObserver>>,
}

impl ChartEngine {
    /// Create an engine charting the current month day by day
    ///
    /// The category with id 0 is the reserved uncategorized entry and never
    /// gets a bucket pair; the list is reordered so it comes first.
    pub fn new(
        transactions: Vec<Transaction>,
        categories: Vec<Category>,
        settings: ChartSettings,
    ) -> Self {
        Self::with_today(transactions, categories, settings, Local::now().date_naive())
    }

    /// Create an engine with a fixed notion of "today"
    pub fn with_today(
        transactions: Vec<Transaction>,
        categories: Vec<Category>,
        settings: ChartSettings,
        today: NaiveDate,
    ) -> Self {
        let range = DateRange::new(first_day_of_previous_month(today), today)
            .unwrap_or_else(|_| DateRange::single_day(today));

        let axis = scale_for_max(0, settings.axis_levels);
        let mut engine = Self {
            transactions,
            categories: with_uncategorized(categories),
            settings,
            today,
            kind: ModeKind::Time,
            granularity: Granularity::Day,
            selection: TimeSelection::containing(today),
            range,
            visibility: Visibility::default(),
            pairs: Vec::new(),
            pager: Paginator::new(0, 1),
            page: Page {
                items: Vec::new(),
                info: PageInfo {
                    index: 0,
                    total_pages: 1,
                },
            },
            axis,
            observers: Vec::new(),
        };
        engine.rebuild(true);
        engine
    }

    /// Register an observer notified after every recomputation
    pub fn subscribe(&mut self, observer: Box<dyn ChartObserver>) {
        self.observers.push(observer);
    }

    /// Switch to the time overview, keeping its last granularity and period
    pub fn show_time_overview(&mut self) {
        self.kind = ModeKind::Time;
        self.rebuild(true);
    }

    /// Switch to the category overview, keeping its last date range
    pub fn show_categories(&mut self) {
        self.kind = ModeKind::Categories;
        self.rebuild(true);
    }

    /// Change the time granularity; switches to the time overview
    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
        self.kind = ModeKind::Time;
        self.rebuild(true);
    }

    /// Select the month charted by day and week granularity
    pub fn set_month(&mut self, year: i32, month: u32) -> TallyResult<()> {
        self.check_month(year, month).inspect_err(|e| warn!("{}", e))?;

        self.selection.year = year;
        self.selection.month = month;
        self.selection.end_year = self.selection.end_year.max(year);
        self.kind = ModeKind::Time;
        self.rebuild(true);
        Ok(())
    }

    /// Select the (first) year; the month is pulled back if it would lie in
    /// the future
    pub fn set_year(&mut self, year: i32) -> TallyResult<()> {
        self.check_year(year).inspect_err(|e| warn!("{}", e))?;
        if self.granularity == Granularity::Year && year > self.selection.end_year {
            let err = TallyError::Validation(format!(
                "start year {} is after end year {}",
                year, self.selection.end_year
            ));
            warn!("{}", err);
            return Err(err);
        }

        self.selection.year = year;
        self.selection.end_year = self.selection.end_year.max(year);
        if year == self.today.year() && self.selection.month > self.today.month() {
            self.selection.month = self.today.month();
        }
        self.kind = ModeKind::Time;
        self.rebuild(true);
        Ok(())
    }

    /// Select the inclusive year range charted by year granularity
    pub fn set_year_range(&mut self, start_year: i32, end_year: i32) -> TallyResult<()> {
        let checked = self
            .check_year(start_year)
            .and_then(|_| self.check_year(end_year))
            .and_then(|_| {
                if end_year < start_year {
                    Err(TallyError::Validation(format!(
                        "end year {} is before start year {}",
                        end_year, start_year
                    )))
                } else {
                    Ok(())
                }
            });
        checked.inspect_err(|e| warn!("{}", e))?;

        self.selection.year = start_year;
        self.selection.end_year = end_year;
        if start_year == self.today.year() && self.selection.month > self.today.month() {
            self.selection.month = self.today.month();
        }
        self.kind = ModeKind::Time;
        self.rebuild(true);
        Ok(())
    }

    /// Select the date range of the category overview; switches to it
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) -> TallyResult<()> {
        let range = DateRange::new(start, end).inspect_err(|e| warn!("{}", e))?;

        self.range = range;
        self.kind = ModeKind::Categories;
        self.rebuild(true);
        Ok(())
    }

    /// Show or hide one kind of bucket; only the axis scale changes
    pub fn set_visibility(&mut self, kind: EntryKind, visible: bool) {
        self.visibility.set(kind, visible);
        self.rebuild(false);
    }

    /// Replace the transaction snapshot, keeping the page where possible
    pub fn replace_snapshot(&mut self, transactions: Vec<Transaction>) {
        self.transactions = transactions;
        self.rebuild(false);
    }

    /// Replace the category list, keeping the page where possible
    ///
    /// As in [`ChartEngine::new`], id 0 marks the uncategorized entry.
    pub fn replace_categories(&mut self, categories: Vec<Category>) {
        self.categories = with_uncategorized(categories);
        self.rebuild(false);
    }

    /// Go to the next page; no-op on the last page
    pub fn next_page(&mut self) -> bool {
        let moved = self.pager.next();
        if moved {
            self.refresh_page();
        }
        moved
    }

    /// Go to the previous page; no-op on the first page
    pub fn previous_page(&mut self) -> bool {
        let moved = self.pager.previous();
        if moved {
            self.refresh_page();
        }
        moved
    }

    /// Jump to a page, clamped to the last one
    pub fn go_to_page(&mut self, index: usize) {
        self.pager.go_to(index);
        self.refresh_page();
    }

    /// Visible buckets, income then expense for each period in order
    pub fn visible_page(&self) -> Vec<Bucket> {
        self.page
            .items
            .iter()
            .flat_map(|pair| [pair.income.clone(), pair.expense.clone()])
            .collect()
    }

    /// Visible bucket pairs
    pub fn visible_pairs(&self) -> &[BucketPair] {
        &self.page.items
    }

    /// Every bucket pair of the current aggregation
    pub fn all_pairs(&self) -> &[BucketPair] {
        &self.pairs
    }

    /// Value-axis labels for the visible page
    pub fn axis_labels(&self) -> Vec<i64> {
        self.axis.labels().to_vec()
    }

    pub fn page_info(&self) -> PageInfo {
        self.page.info
    }

    pub fn page_size(&self) -> usize {
        self.pager.page_size()
    }

    /// One caption per visible pair: period captions or category names
    pub fn x_axis_labels(&self) -> Vec<String> {
        self.page
            .items
            .iter()
            .map(|pair| match self.kind {
                ModeKind::Time => pair.income.caption.clone(),
                ModeKind::Categories => pair.income.label.clone(),
            })
            .collect()
    }

    /// Sum of the visible buckets of one kind
    pub fn visible_total(&self, kind: EntryKind) -> Money {
        self.page.items.iter().map(|pair| pair.get(kind).total).sum()
    }

    pub fn mode(&self) -> ChartMode {
        match self.kind {
            ModeKind::Time => ChartMode::Time {
                granularity: self.granularity,
                selection: self.selection,
            },
            ModeKind::Categories => ChartMode::Categories { range: self.range },
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Everything needed to draw the current page
    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            mode: self.mode(),
            visibility: self.visibility,
            pairs: self.page.items.clone(),
            page: self.page.info,
            axis_labels: self.axis_labels(),
            x_axis_labels: self.x_axis_labels(),
            income_total: self.visible_total(EntryKind::Income),
            expense_total: self.visible_total(EntryKind::Expense),
        }
    }

    fn check_year(&self, year: i32) -> TallyResult<()> {
        if year > self.today.year() {
            return Err(TallyError::Validation(format!(
                "cannot chart future year {}",
                year
            )));
        }
        if year < self.settings.first_year {
            return Err(TallyError::Validation(format!(
                "year {} is before the first selectable year {}",
                year, self.settings.first_year
            )));
        }
        Ok(())
    }

    fn check_month(&self, year: i32, month: u32) -> TallyResult<()> {
        if !(1..=12).contains(&month) {
            return Err(TallyError::Validation(format!("invalid month {}", month)));
        }
        self.check_year(year)?;
        if year == self.today.year() && month > self.today.month() {
            return Err(TallyError::Validation(format!(
                "cannot chart future month {:04}-{:02}",
                year, month
            )));
        }
        Ok(())
    }

    /// Rebuild every bucket from the snapshot, then reselect and rescale
    fn rebuild(&mut self, reset_page: bool) {
        let (pairs, page_size) = match self.kind {
            ModeKind::Time => {
                let plan = interval::generate(
                    self.granularity,
                    &self.selection,
                    self.today,
                    &self.settings,
                );
                (aggregate_intervals(&plan.intervals, &self.transactions), plan.page_size)
            }
            ModeKind::Categories => {
                let pairs = aggregate_categories(&self.categories, self.range, &self.transactions);
                let size = category_page_size(
                    pairs.len(),
                    self.settings.min_category_page_size,
                    self.settings.max_category_page_size,
                );
                (pairs, size)
            }
        };

        debug!(
            mode = ?self.kind,
            granularity = %self.granularity,
            pairs = pairs.len(),
            page_size,
            transactions = self.transactions.len(),
            "rebuilt chart buckets"
        );

        self.pairs = pairs;
        self.pager.resize(self.pairs.len(), page_size);
        if reset_page {
            self.pager.reset();
        }
        self.refresh_page();
    }

    /// Reselect the visible page and rescale the axis
    fn refresh_page(&mut self) {
        self.page = self.pager.select(&self.pairs);
        // keep the pager in step with any empty-page fallback
        self.pager.go_to(self.page.info.index);
        self.axis = compute_scale(&self.page.items, self.visibility, self.settings.axis_levels);

        trace!(
            page = self.page.info.index,
            total_pages = self.page.info.total_pages,
            top = self.axis.top(),
            "selected chart page"
        );

        if !self.observers.is_empty() {
            let snapshot = self.snapshot();
            for observer in &self.observers {
                observer.chart_updated(&snapshot);
            }
        }
    }
}
