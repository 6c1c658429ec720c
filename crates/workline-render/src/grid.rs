//! Timeline grid columns
//!
//! Columns step through `[start, end]` at a fixed stride per view. Months
//! are a flat 30 days so every column is the same width.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use workline_core::{Calendar, DateExt};

/// Grid resolution
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[default]
    Days,
    Weeks,
    Months,
}

impl ViewMode {
    /// Days between consecutive columns
    pub fn step_days(self) -> i64 {
        match self {
            ViewMode::Days => 1,
            ViewMode::Weeks => 7,
            ViewMode::Months => 30,
        }
    }

    /// strftime pattern for column labels
    pub fn label_format(self) -> &'static str {
        match self {
            ViewMode::Days | ViewMode::Weeks => "%b %d",
            ViewMode::Months => "%b %Y",
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(ViewMode::Days),
            "week" | "weeks" => Ok(ViewMode::Weeks),
            "month" | "months" => Ok(ViewMode::Months),
            other => Err(format!("unknown view mode '{}'", other)),
        }
    }
}

/// One column of the timeline header
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineColumn {
    pub date: NaiveDate,
    pub label: String,
    pub is_weekend: bool,
    pub is_holiday: bool,
}

/// Build grid columns for `[start, end]`.
///
/// `end` defaults to 90 days after `start`. An end before the start yields
/// no columns.
pub fn build_timeline_grid(
    start: NaiveDate,
    end: Option<NaiveDate>,
    view: ViewMode,
) -> Vec<TimelineColumn> {
    GridBuilder::new(view).build(start, end)
}

/// Grid builder with optional calendar and default span
#[derive(Clone, Debug)]
pub struct GridBuilder<'a> {
    view: ViewMode,
    calendar: Option<&'a Calendar>,
    default_span_days: i64,
}

impl<'a> GridBuilder<'a> {
    pub fn new(view: ViewMode) -> Self {
        Self {
            view,
            calendar: None,
            default_span_days: workline_core::config::DEFAULT_GRID_SPAN_DAYS,
        }
    }

    /// Flag holidays and use the calendar's weekend days
    pub fn calendar(mut self, calendar: &'a Calendar) -> Self {
        self.calendar = Some(calendar);
        self
    }

    /// Span used when no end date is given
    pub fn default_span_days(mut self, days: i64) -> Self {
        self.default_span_days = days;
        self
    }

    pub fn build(&self, start: NaiveDate, end: Option<NaiveDate>) -> Vec<TimelineColumn> {
        let end = end.unwrap_or_else(|| start.add_days(self.default_span_days));
        if end < start {
            tracing::debug!(%start, %end, "grid end before start, no columns");
            return Vec::new();
        }

        let step = self.view.step_days();
        let format = self.view.label_format();
        let mut columns = Vec::with_capacity((start.days_until(end) / step + 1) as usize);
        let mut current = start;

        while current <= end {
            let (is_weekend, is_holiday) = match self.calendar {
                Some(cal) => (cal.is_weekend(current), cal.is_holiday(current)),
                None => (current.is_weekend(), false),
            };
            columns.push(TimelineColumn {
                date: current,
                label: current.format(format).to_string(),
                is_weekend,
                is_holiday,
            });

            let next = current.add_days(step);
            if next == current {
                break;
            }
            current = next;
        }

        columns
    }
}
