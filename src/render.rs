//! TUI rendering traits for calgrid types.
//!
//! Extension traits that add colored terminal output to calgrid-core types
//! using owo_colors.

use calgrid_core::{EventKind, EventRecord, ValidationError};
use chrono::NaiveDateTime;
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for EventRecord {
    fn render(&self) -> String {
        let time = match &self.kind {
            EventKind::Single { start, end } => format_span(*start, *end, self.all_day),
            EventKind::Recurring { rule, .. } => rule.to_string(),
        };

        let marker = if self.is_recurring() { "↻".cyan().to_string() } else { "•".to_string() };
        format!("{} {} {}", marker, self.title.bold(), time.dimmed())
    }
}

impl Render for ValidationError {
    fn render(&self) -> String {
        format!("✗ {}", self).red().to_string()
    }
}

/// Format a start/end pair (e.g. "Wed Aug 6 14:00-15:00" or "Sun Aug 10 all-day")
pub fn format_span(start: NaiveDateTime, end: NaiveDateTime, all_day: bool) -> String {
    if all_day {
        if start.date() == end.date() {
            return format!("{} all-day", start.format("%a %b %-d"));
        }
        return format!("{} - {} all-day", start.format("%a %b %-d"), end.format("%a %b %-d"));
    }

    if start.date() == end.date() {
        format!("{} {}-{}", start.format("%a %b %-d"), start.format("%H:%M"), end.format("%H:%M"))
    } else {
        format!("{} - {}", start.format("%a %b %-d %H:%M"), end.format("%a %b %-d %H:%M"))
    }
}
