//! CLI commands for charts
//!
//! Builds a chart engine over the loaded snapshot, applies the requested
//! parameters in the same order an interactive user would, and prints the
//! selected page.

use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Subcommand};
use tracing::info;

use crate::config::Settings;
use crate::display::{format_chart, format_chart_json};
use crate::error::{TallyError, TallyResult};
use crate::models::EntryKind;
use crate::stats::{ChartEngine, Granularity};
use crate::storage::TransactionSource;

/// Options shared by every chart
#[derive(Args, Debug, Clone, Default)]
pub struct ChartOutput {
    /// Page to show, starting at 1
    #[arg(short, long)]
    pub page: Option<usize>,

    /// Leave income out of the axis scale
    #[arg(long)]
    pub hide_income: bool,

    /// Leave expenses out of the axis scale
    #[arg(long)]
    pub hide_expense: bool,

    /// Print the page as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long, hide = true)]
    pub today: Option<String>,
}

/// Chart subcommands
#[derive(Subcommand, Debug)]
pub enum ChartCommands {
    /// Income and expense over time
    Time {
        /// Bucket size: day, week, month or year
        #[arg(short, long, default_value = "day")]
        granularity: Granularity,

        /// Month for day and week charts (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,

        /// Year for month charts, first year for year charts
        #[arg(short, long)]
        year: Option<i32>,

        /// Last year for year charts (defaults to the current year)
        #[arg(long)]
        to_year: Option<i32>,

        #[command(flatten)]
        output: ChartOutput,
    },

    /// Income and expense per category
    #[command(alias = "cat")]
    Categories {
        /// Start date (YYYY-MM-DD); defaults to the 1st of last month
        #[arg(short, long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        end: Option<String>,

        #[command(flatten)]
        output: ChartOutput,
    },
}

/// Handle chart commands
pub fn handle_chart_command(
    source: &dyn TransactionSource,
    settings: &Settings,
    cmd: ChartCommands,
) -> TallyResult<()> {
    let rendered = render_chart_command(source, settings, cmd)?;
    print!("{}", rendered);
    Ok(())
}

/// Run a chart command and return what it would print
pub fn render_chart_command(
    source: &dyn TransactionSource,
    settings: &Settings,
    cmd: ChartCommands,
) -> TallyResult<String> {
    let output = match &cmd {
        ChartCommands::Time { output, .. } | ChartCommands::Categories { output, .. } => {
            output.clone()
        }
    };
    let today = match &output.today {
        Some(value) => parse_date(value, "today")?,
        None => Local::now().date_naive(),
    };

    let transactions = source.fetch_transactions(settings.user_id)?;
    let categories = source.fetch_categories()?;
    info!(
        transactions = transactions.len(),
        categories = categories.len(),
        %today,
        "building chart"
    );

    let mut engine = ChartEngine::with_today(transactions, categories, settings.chart.clone(), today);

    match cmd {
        ChartCommands::Time {
            granularity,
            month,
            year,
            to_year,
            ..
        } => apply_time_options(&mut engine, granularity, month, year, to_year)?,
        ChartCommands::Categories { start, end, .. } => {
            apply_category_options(&mut engine, start, end)?
        }
    }

    if output.hide_income {
        engine.set_visibility(EntryKind::Income, false);
    }
    if output.hide_expense {
        engine.set_visibility(EntryKind::Expense, false);
    }

    if let Some(page) = output.page {
        if page == 0 {
            return Err(TallyError::Validation("pages are numbered from 1".into()));
        }
        engine.go_to_page(page - 1);
    }

    let snapshot = engine.snapshot();
    if output.json {
        let mut json = format_chart_json(&snapshot)?;
        json.push('\n');
        Ok(json)
    } else {
        Ok(format_chart(&snapshot, &settings.currency_symbol))
    }
}

fn apply_time_options(
    engine: &mut ChartEngine,
    granularity: Granularity,
    month: Option<String>,
    year: Option<i32>,
    to_year: Option<i32>,
) -> TallyResult<()> {
    engine.set_granularity(granularity);

    if let Some(value) = month {
        let (year, month) = parse_month(&value)?;
        engine.set_month(year, month)?;
    }

    match (granularity, year, to_year) {
        (Granularity::Year, Some(start), end) => {
            let end = end.unwrap_or_else(|| engine.today().year().max(start));
            engine.set_year_range(start, end)?;
        }
        (Granularity::Year, None, Some(end)) => {
            engine.set_year_range(end.min(engine.today().year()), end)?;
        }
        (_, Some(year), None) => engine.set_year(year)?,
        (_, _, Some(_)) => {
            return Err(TallyError::Validation(
                "--to-year only applies to year charts".into(),
            ));
        }
        (_, None, None) => {}
    }

    Ok(())
}

fn apply_category_options(
    engine: &mut ChartEngine,
    start: Option<String>,
    end: Option<String>,
) -> TallyResult<()> {
    if start.is_none() && end.is_none() {
        engine.show_categories();
        return Ok(());
    }

    let today = engine.today();
    let start = match start {
        Some(value) => parse_date(&value, "start")?,
        None => crate::stats::interval::first_day_of_previous_month(today),
    };
    let end = match end {
        Some(value) => parse_date(&value, "end")?,
        None => today,
    };
    engine.set_date_range(start, end)
}

/// Parse "YYYY-MM"
fn parse_month(value: &str) -> TallyResult<(i32, u32)> {
    NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d")
        .map(|date| (date.year(), date.month()))
        .map_err(|_| {
            TallyError::Validation(format!(
                "Invalid month format: {}. Use YYYY-MM (e.g., 2024-05)",
                value
            ))
        })
}

fn parse_date(value: &str, what: &str) -> TallyResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        TallyError::Validation(format!(
            "Invalid {} date format: {}. Use YYYY-MM-DD",
            what, value
        ))
    })
}
