//! Month calendar of launches
//!
//! Pure functions only. Launches are bucketed by the calendar day their
//! start date falls on in the viewer's local offset, so a launch at
//! 2024-06-30T23:30 local time is shown on June 30 even when that instant
//! is already July 1 in UTC.

use brandhub_common::db::{Brand, Launch, LaunchStatus};
use brandhub_common::time::STORABLE_YEARS;
use brandhub_common::{Error, Result};
use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Event color when the launch's brand has no primary color
pub const DEFAULT_EVENT_COLOR: &str = "#8b5cf6";

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

impl MonthRef {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::validation(format!("Invalid month: {}", month)));
        }
        if !STORABLE_YEARS.contains(&year) {
            return Err(Error::validation(format!("Invalid year: {}", year)));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn first_day(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .ok_or_else(|| Error::validation(format!("Invalid month {}-{}", self.year, self.month)))
    }

    pub fn last_day(&self) -> Result<NaiveDate> {
        let next = self.next().first_day()?;
        next.pred_opt()
            .ok_or_else(|| Error::validation(format!("Invalid month {}-{}", self.year, self.month)))
    }

    /// Heading such as "June 2024"
    pub fn label(&self) -> Result<String> {
        Ok(self.first_day()?.format("%B %Y").to_string())
    }
}

/// One launch rendered as a calendar event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub launch_id: Uuid,
    pub brand_id: Uuid,
    pub title: String,
    pub status: LaunchStatus,
    pub color: String,
    /// Completed-task percentage; absent when the launch has no tasks
    pub progress: Option<u8>,
    pub completed_tasks: usize,
    pub total_tasks: usize,
}

/// One cell of the month grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for the leading and trailing days of neighbouring months
    pub in_month: bool,
    pub events: Vec<CalendarEvent>,
}

/// The rendered month view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub previous: MonthRef,
    pub next: MonthRef,
    /// Whole weeks, Sunday first
    pub days: Vec<CalendarDay>,
}

/// Calendar day of an instant in the given offset
pub fn local_day(at: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    at.with_timezone(&offset).date_naive()
}

/// Group launches by the local day of their start date
///
/// Launches keep their input order within a day.
pub fn bucket_by_day(launches: &[Launch], offset: FixedOffset) -> BTreeMap<NaiveDate, Vec<&Launch>> {
    let mut days: BTreeMap<NaiveDate, Vec<&Launch>> = BTreeMap::new();
    for launch in launches {
        days.entry(local_day(launch.start_date, offset))
            .or_default()
            .push(launch);
    }
    days
}

/// Brand id → primary color, for brands that have one
pub fn brand_colors(brands: &[Brand]) -> HashMap<Uuid, String> {
    brands
        .iter()
        .filter_map(|b| b.primary_color.clone().map(|c| (b.id, c)))
        .collect()
}

fn event_for(launch: &Launch, colors: &HashMap<Uuid, String>) -> CalendarEvent {
    CalendarEvent {
        launch_id: launch.id,
        brand_id: launch.brand_id,
        title: launch.title.clone(),
        status: launch.status,
        color: colors
            .get(&launch.brand_id)
            .cloned()
            .unwrap_or_else(|| DEFAULT_EVENT_COLOR.to_string()),
        progress: launch.progress(),
        completed_tasks: launch.tasks.iter().filter(|t| t.completed).count(),
        total_tasks: launch.tasks.len(),
    }
}

/// Build the Sunday-first grid covering `month`
///
/// The grid starts on the Sunday on or before the 1st and ends on the
/// Saturday on or after the last day of the month.
pub fn build_month(
    launches: &[Launch],
    brands: &[Brand],
    month: MonthRef,
    offset: FixedOffset,
) -> Result<CalendarMonth> {
    let first = month.first_day()?;
    let last = month.last_day()?;
    let out_of_range = || Error::validation(format!("Invalid month {}-{}", month.year, month.month));
    let grid_start = first
        .checked_sub_days(Days::new(u64::from(first.weekday().num_days_from_sunday())))
        .ok_or_else(out_of_range)?;
    let grid_end = last
        .checked_add_days(Days::new(u64::from(6 - last.weekday().num_days_from_sunday())))
        .ok_or_else(out_of_range)?;

    let buckets = bucket_by_day(launches, offset);
    let colors = brand_colors(brands);

    let mut days = Vec::new();
    let mut date = grid_start;
    while date <= grid_end {
        let events = buckets
            .get(&date)
            .map(|day| day.iter().map(|l| event_for(l, &colors)).collect())
            .unwrap_or_default();
        days.push(CalendarDay {
            date,
            in_month: date.month() == month.month && date.year() == month.year,
            events,
        });
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    Ok(CalendarMonth {
        year: month.year,
        month: month.month,
        label: month.label()?,
        previous: month.previous(),
        next: month.next(),
        days,
    })
}
