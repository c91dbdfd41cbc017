//! Selected date ranges produced by grid gestures.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// A selected interval on the calendar grid.
///
/// Always satisfies `end >= start`. All-day ranges are truncated to midnight
/// on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
    all_day: bool,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, all_day: bool) -> Self {
        let (start, end) = if end < start { (end, start) } else { (start, end) };

        if all_day {
            DateRange {
                start: start_of_day(start.date()),
                end: start_of_day(end.date()),
                all_day,
            }
        } else {
            DateRange { start, end, all_day }
        }
    }

    /// Click on an empty day cell: a single all-day date.
    pub fn from_date_click(date: NaiveDate) -> Self {
        let day = start_of_day(date);
        DateRange::new(day, day, true)
    }

    /// Drag-select across cells or time slots.
    pub fn from_selection(start: NaiveDateTime, end: NaiveDateTime, all_day: bool) -> Self {
        DateRange::new(start, end, all_day)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn all_day(&self) -> bool {
        self.all_day
    }

    /// Length of the range in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        (self.end - self.start).num_milliseconds().unsigned_abs()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.all_day {
            write!(f, "{} to {} (all day)", self.start.date(), self.end.date())
        } else {
            write!(
                f,
                "{} to {}",
                self.start.format("%Y-%m-%d %H:%M"),
                self.end.format("%Y-%m-%d %H:%M")
            )
        }
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| start_of_day(date))
}

/// Parse YYYY-MM-DD
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}

/// Parse a wall-clock instant: `YYYY-MM-DDTHH:MM[:SS]`, or a bare date
/// which is read as midnight.
pub fn parse_instant(s: &str) -> Result<NaiveDateTime, String> {
    let s = s.trim();

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }

    parse_date(s)
        .map(start_of_day)
        .map_err(|_| format!("Invalid date/time '{}'. Expected YYYY-MM-DDTHH:MM", s))
}
