//! Time interval generation for the time overview chart
//!
//! Produces the ordered, inclusive date intervals that become the x-axis of
//! the chart for each granularity, together with the page size the chart
//! uses for that granularity.

use chrono::{Datelike, Duration, Month, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::settings::ChartSettings;
use crate::error::{TallyError, TallyResult};

/// The time-bucketing unit of the overview chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
            Self::Year => write!(f, "year"),
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "days" | "d" => Ok(Self::Day),
            "week" | "weeks" | "w" => Ok(Self::Week),
            "month" | "months" | "m" => Ok(Self::Month),
            "year" | "years" | "y" => Ok(Self::Year),
            other => Err(format!(
                "unknown granularity '{}', expected day, week, month or year",
                other
            )),
        }
    }
}

/// An inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting an end before the start
    pub fn new(start: NaiveDate, end: NaiveDate) -> TallyResult<Self> {
        if end < start {
            return Err(TallyError::Validation(format!(
                "end date {} is before start date {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// A range covering a single day
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Check if a date falls within this range
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// One x-axis slot of the time overview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    /// Inclusive bounds
    pub range: DateRange,
    /// Long name, e.g. "Friday 03.05." or "May: 2. week"
    pub label: String,
    /// Short axis caption, e.g. "3.5. - 9.5."
    pub caption: String,
}

impl Interval {
    fn new(start: NaiveDate, end: NaiveDate, label: String, caption: String) -> Self {
        Self {
            range: DateRange { start, end },
            label,
            caption,
        }
    }
}

/// The month/year context intervals are generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSelection {
    /// Selected (or first) year
    pub year: i32,
    /// Selected month, 1-12; used by day and week granularity
    pub month: u32,
    /// Last year of the range; used by year granularity
    pub end_year: i32,
}

impl TimeSelection {
    /// Selection pointing at the month containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            end_year: date.year(),
        }
    }
}

/// Generated intervals plus the page size the chart shows them with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalPlan {
    pub intervals: Vec<Interval>,
    pub page_size: usize,
}

/// Generate the intervals for a granularity and selection
///
/// `today` bounds the current month and the current year so no future day or
/// month is ever charted. Rejecting future selections is the caller's job.
pub fn generate(
    granularity: Granularity,
    selection: &TimeSelection,
    today: NaiveDate,
    settings: &ChartSettings,
) -> IntervalPlan {
    let intervals = match granularity {
        Granularity::Day => day_intervals(selection.year, selection.month, today),
        Granularity::Week => week_intervals(selection.year, selection.month),
        Granularity::Month => month_intervals(selection.year, today),
        Granularity::Year => year_intervals(selection.year, selection.end_year),
    };

    let page_size = match granularity {
        Granularity::Day => settings.day_page_size,
        // one page per month, whatever its week count
        Granularity::Week => intervals.len(),
        Granularity::Month => {
            if intervals.len() < 10 {
                intervals.len() + 1
            } else {
                12
            }
        }
        Granularity::Year => (intervals.len() + 1).min(settings.max_year_page_size),
    };

    IntervalPlan {
        intervals,
        page_size: page_size.max(1),
    }
}

/// One interval per day of the month, stopping at `today` in the current month
pub fn day_intervals(year: i32, month: u32, today: NaiveDate) -> Vec<Interval> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let last = last_day_of_month(first).min(today);

    first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| {
            let label = format!("{} {}", weekday_name(day.weekday()), day.format("%d.%m."));
            Interval::new(day, day, label.clone(), label)
        })
        .collect()
}

/// Monday-Sunday weeks overlapping the month
///
/// The first week starts on the Monday on or before the 1st and the last one
/// ends on the Sunday on or after the last day, so either may reach into the
/// neighbouring month or year.
pub fn week_intervals(year: i32, month: u32) -> Vec<Interval> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let last = last_day_of_month(first);
    let month_name = month_name(month);

    let mut start =
        first - Duration::days(i64::from(first.weekday().num_days_from_monday()));
    let mut weeks = Vec::new();
    while start <= last {
        let end = start + Duration::days(6);
        let number = weeks.len() + 1;
        weeks.push(Interval::new(
            start,
            end,
            format!("{}: {}. week", month_name, number),
            format!(
                "{}.{}. - {}.{}.",
                start.day(),
                start.month(),
                end.day(),
                end.month()
            ),
        ));
        start = end + Duration::days(1);
    }
    weeks
}

/// Twelve months of the year, truncated to the current month of the current year
pub fn month_intervals(year: i32, today: NaiveDate) -> Vec<Interval> {
    let last_month = if year < today.year() {
        12
    } else if year == today.year() {
        today.month()
    } else {
        0
    };

    (1..=last_month)
        .filter_map(|month| NaiveDate::from_ymd_opt(year, month, 1))
        .map(|first| {
            let name = month_name(first.month()).to_string();
            Interval::new(first, last_day_of_month(first), name.clone(), name)
        })
        .collect()
}

/// One interval per year of the inclusive range
pub fn year_intervals(start_year: i32, end_year: i32) -> Vec<Interval> {
    (start_year..=end_year)
        .filter_map(|year| {
            let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
            let last = NaiveDate::from_ymd_opt(year, 12, 31)?;
            Some(Interval::new(first, last, year.to_string(), year.to_string()))
        })
        .collect()
}

/// Last calendar day of the month containing `date`
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// First day of the month before the one containing `date`
pub fn first_day_of_previous_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("?")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn far_future() -> NaiveDate {
        date(2030, 1, 1)
    }

    #[test]
    fn test_day_intervals_full_month() {
        let days = day_intervals(2024, 5, far_future());
        assert_eq!(days.len(), 31);
        assert_eq!(days[0].range.start(), date(2024, 5, 1));
        assert_eq!(days[30].range.end(), date(2024, 5, 31));
        assert_eq!(days[2].label, "Friday 03.05.");
        assert!(days.iter().all(|d| d.range.days() == 1));
    }

    #[test]
    fn test_day_intervals_stop_at_today() {
        let days = day_intervals(2024, 5, date(2024, 5, 10));
        assert_eq!(days.len(), 10);
        assert_eq!(days.last().unwrap().range.end(), date(2024, 5, 10));
    }

    #[test]
    fn test_day_intervals_leap_february() {
        assert_eq!(day_intervals(2024, 2, far_future()).len(), 29);
        assert_eq!(day_intervals(2023, 2, far_future()).len(), 28);
    }

    #[test]
    fn test_week_intervals_span_month_boundaries() {
        // June 2024 starts on a Saturday and ends on a Sunday
        let weeks = week_intervals(2024, 6);
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[0].range.start(), date(2024, 5, 27));
        assert_eq!(weeks[0].range.end(), date(2024, 6, 2));
        assert_eq!(weeks[4].range.end(), date(2024, 6, 30));
        assert_eq!(weeks[0].label, "June: 1. week");
        assert_eq!(weeks[0].caption, "27.5. - 2.6.");
    }

    #[test]
    fn test_week_intervals_cross_year() {
        // January 2025 starts on a Wednesday, December 2024 ends on a Tuesday
        let jan = week_intervals(2025, 1);
        assert_eq!(jan[0].range.start(), date(2024, 12, 30));

        let dec = week_intervals(2024, 12);
        assert_eq!(dec.last().unwrap().range.end(), date(2025, 1, 5));
    }

    #[test]
    fn test_week_counts() {
        // February 2021 is exactly four Monday-Sunday weeks
        assert_eq!(week_intervals(2021, 2).len(), 4);
        // December 2024 starts on a Sunday and needs six
        assert_eq!(week_intervals(2024, 12).len(), 6);
    }

    #[test]
    fn test_weeks_are_contiguous() {
        let weeks = week_intervals(2024, 9);
        for pair in weeks.windows(2) {
            assert_eq!(pair[0].range.end() + Duration::days(1), pair[1].range.start());
            assert_eq!(pair[0].range.start().weekday(), Weekday::Mon);
            assert_eq!(pair[0].range.end().weekday(), Weekday::Sun);
        }
    }

    #[test]
    fn test_month_intervals() {
        let months = month_intervals(2023, date(2024, 3, 5));
        assert_eq!(months.len(), 12);
        assert_eq!(months[1].range.end(), date(2023, 2, 28));
        assert_eq!(months[4].label, "May");

        let current = month_intervals(2024, date(2024, 3, 5));
        assert_eq!(current.len(), 3);

        assert!(month_intervals(2025, date(2024, 3, 5)).is_empty());
    }

    #[test]
    fn test_year_intervals() {
        let years = year_intervals(2019, 2021);
        assert_eq!(years.len(), 3);
        assert_eq!(years[0].range.start(), date(2019, 1, 1));
        assert_eq!(years[2].range.end(), date(2021, 12, 31));
        assert_eq!(years[1].label, "2020");
    }

    #[test]
    fn test_page_sizes() {
        let settings = ChartSettings::default();
        let today = date(2024, 3, 5);

        let plan = generate(
            Granularity::Day,
            &TimeSelection { year: 2024, month: 1, end_year: 2024 },
            today,
            &settings,
        );
        assert_eq!(plan.page_size, 11);

        let plan = generate(
            Granularity::Week,
            &TimeSelection { year: 2024, month: 6, end_year: 2024 },
            today,
            &settings,
        );
        assert_eq!(plan.page_size, plan.intervals.len());

        let plan = generate(
            Granularity::Month,
            &TimeSelection { year: 2024, month: 1, end_year: 2024 },
            today,
            &settings,
        );
        assert_eq!(plan.intervals.len(), 3);
        assert_eq!(plan.page_size, 4);

        let plan = generate(
            Granularity::Month,
            &TimeSelection { year: 2023, month: 1, end_year: 2023 },
            today,
            &settings,
        );
        assert_eq!(plan.page_size, 12);

        let plan = generate(
            Granularity::Year,
            &TimeSelection { year: 2022, month: 1, end_year: 2023 },
            today,
            &settings,
        );
        assert_eq!(plan.page_size, 3);

        let plan = generate(
            Granularity::Year,
            &TimeSelection { year: 2015, month: 1, end_year: 2024 },
            today,
            &settings,
        );
        assert_eq!(plan.page_size, 5);
    }

    #[test]
    fn test_date_range_validation() {
        assert!(DateRange::new(date(2024, 5, 2), date(2024, 5, 1))
            .unwrap_err()
            .is_validation());
        let range = DateRange::new(date(2024, 5, 1), date(2024, 5, 1)).unwrap();
        assert_eq!(range.days(), 1);
        assert!(range.contains(date(2024, 5, 1)));
    }

    #[test]
    fn test_previous_month_wraps_year() {
        assert_eq!(first_day_of_previous_month(date(2024, 1, 17)), date(2023, 12, 1));
        assert_eq!(first_day_of_previous_month(date(2024, 7, 1)), date(2024, 6, 1));
    }

    #[test]
    fn test_granularity_parse() {
        assert_eq!("Week".parse::<Granularity>().unwrap(), Granularity::Week);
        assert!("fortnight".parse::<Granularity>().is_err());
    }
}
