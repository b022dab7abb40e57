//! Chart page formatting
//!
//! One table row per visible bucket pair, bars scaled against the top axis
//! label so rows on the same page compare at a glance.

use chrono::Month;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::error::TallyResult;
use crate::models::Money;
use crate::stats::{Bucket, ChartMode, ChartSnapshot, Granularity, Visibility};

const BAR_WIDTH: usize = 20;
const LABEL_WIDTH: usize = 32;

#[derive(Tabled)]
struct ChartRow {
    #[tabled(rename = "Period")]
    label: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expense")]
    expense: String,
    #[tabled(rename = "")]
    bars: String,
}

/// Create a text bar of `width` cells, `value` relative to `max_value`
pub fn format_bar(value: i64, max_value: i64, width: usize) -> String {
    if max_value <= 0 || value <= 0 {
        return " ".repeat(width);
    }

    let filled = ((value as i128 * width as i128 + max_value as i128 / 2) / max_value as i128)
        as usize;
    let filled = filled.clamp(1, width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Short title for the chart parameters, e.g. "May 2024 by day"
pub fn describe_mode(mode: &ChartMode) -> String {
    match mode {
        ChartMode::Time {
            granularity,
            selection,
        } => match granularity {
            Granularity::Day | Granularity::Week => format!(
                "{} {} by {}",
                month_name(selection.month),
                selection.year,
                granularity
            ),
            Granularity::Month => format!("{} by month", selection.year),
            Granularity::Year if selection.year == selection.end_year => {
                format!("{} by year", selection.year)
            }
            Granularity::Year => format!("{}-{} by year", selection.year, selection.end_year),
        },
        ChartMode::Categories { range } => format!("Categories {}", range),
    }
}

/// Render the visible page as a table followed by the axis and page footer
pub fn format_chart(snapshot: &ChartSnapshot, currency_symbol: &str) -> String {
    let mut output = String::new();
    output.push_str(&describe_mode(&snapshot.mode));
    output.push('\n');

    let top = snapshot.axis_labels.last().copied().unwrap_or(0);
    let rows: Vec<ChartRow> = snapshot
        .pairs
        .iter()
        .zip(&snapshot.x_axis_labels)
        .map(|(pair, caption)| {
            let label = match snapshot.mode {
                ChartMode::Time { .. } if *caption != pair.income.label => {
                    format!("{} ({})", pair.income.label, caption)
                }
                _ => pair.income.label.clone(),
            };
            ChartRow {
                label: truncate(&label, LABEL_WIDTH),
                income: amount_cell(&pair.income, snapshot.visibility, currency_symbol),
                expense: amount_cell(&pair.expense, snapshot.visibility, currency_symbol),
                bars: bar_cell(pair.income.total, pair.expense.total, top, snapshot.visibility),
            }
        })
        .collect();

    if rows.is_empty() {
        output.push_str("No periods to chart.\n");
    } else {
        let mut table = Table::new(rows);
        table
            .with(Style::sharp())
            .with(Modify::new(Columns::new(1..3)).with(Alignment::right()));
        output.push_str(&table.to_string());
        output.push('\n');
    }

    output.push_str(&format!(
        "Total: income {}  expense {}\n",
        visible_or_hidden(snapshot.income_total, snapshot.visibility.income, currency_symbol),
        visible_or_hidden(snapshot.expense_total, snapshot.visibility.expense, currency_symbol),
    ));

    let labels: Vec<String> = snapshot.axis_labels.iter().map(i64::to_string).collect();
    output.push_str(&format!("Axis: {}\n", labels.join(" | ")));
    output.push_str(&format!(
        "Page {} of {}\n",
        snapshot.page.index + 1,
        snapshot.page.total_pages
    ));

    output
}

/// Render the snapshot as pretty JSON
pub fn format_chart_json(snapshot: &ChartSnapshot) -> TallyResult<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

fn amount_cell(bucket: &Bucket, visibility: Visibility, symbol: &str) -> String {
    if !visibility.is_visible(bucket.kind) {
        return "hidden".to_string();
    }
    if bucket.is_empty() {
        return "-".to_string();
    }
    format!("{} ({})", bucket.total.format_with_symbol(symbol), bucket.count)
}

fn visible_or_hidden(total: Money, visible: bool, symbol: &str) -> String {
    if visible {
        total.format_with_symbol(symbol)
    } else {
        "hidden".to_string()
    }
}

fn bar_cell(income: Money, expense: Money, top: i64, visibility: Visibility) -> String {
    let mut lines = Vec::with_capacity(2);
    if visibility.income {
        lines.push(format!("+{}", format_bar(income.units_ceil(), top, BAR_WIDTH)));
    }
    if visibility.expense {
        lines.push(format!("-{}", format_bar(expense.units_ceil(), top, BAR_WIDTH)));
    }
    lines.join("\n")
}

fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("?")
}

/// Truncate to `max_len` characters with an ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
