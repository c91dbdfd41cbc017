//! Event records held by the store.
//!
//! A record is either a one-off event with fixed start/end, or the template
//! of a recurring series. Occurrences of a series are never stored.

use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::date_range::DateRange;
use crate::recurrence::RecurrenceRule;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: Uuid,
    /// Shared by every record of one recurring definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Uuid>,
    pub title: String,
    pub all_day: bool,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Single {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    Recurring {
        rule: RecurrenceRule,
        /// Per-occurrence length. Absent for all-day series.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
}

impl EventRecord {
    pub fn is_recurring(&self) -> bool {
        matches!(self.kind, EventKind::Recurring { .. })
    }

    pub fn rule(&self) -> Option<&RecurrenceRule> {
        match &self.kind {
            EventKind::Recurring { rule, .. } => Some(rule),
            EventKind::Single { .. } => None,
        }
    }

    /// The range this record covers when opened for editing.
    ///
    /// For a series this is the first occurrence.
    pub fn range(&self) -> DateRange {
        match &self.kind {
            EventKind::Single { start, end } => DateRange::new(*start, *end, self.all_day),
            EventKind::Recurring { rule, duration_ms } => {
                let end = duration_ms
                    .and_then(|ms| i64::try_from(ms).ok())
                    .and_then(TimeDelta::try_milliseconds)
                    .and_then(|d| rule.start.checked_add_signed(d))
                    .unwrap_or(rule.start);
                DateRange::new(rule.start, end, self.all_day)
            }
        }
    }

    /// Translate the record in time. Returns `None` if the result would fall
    /// outside the representable date range.
    ///
    /// Series move by their rule start; `until` is left where it was.
    pub fn shifted(&self, delta: TimeDelta) -> Option<EventRecord> {
        let kind = match &self.kind {
            EventKind::Single { start, end } => EventKind::Single {
                start: start.checked_add_signed(delta)?,
                end: end.checked_add_signed(delta)?,
            },
            EventKind::Recurring { rule, duration_ms } => EventKind::Recurring {
                rule: RecurrenceRule {
                    start: rule.start.checked_add_signed(delta)?,
                    ..rule.clone()
                },
                duration_ms: *duration_ms,
            },
        };

        Some(EventRecord {
            kind,
            ..self.clone()
        })
    }
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::Frequency;
    use chrono::{NaiveDate, Weekday};

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn make_series() -> EventRecord {
        EventRecord {
            id: Uuid::new_v4(),
            group_id: Some(Uuid::new_v4()),
            title: "Sync".to_string(),
            all_day: false,
            kind: EventKind::Recurring {
                rule: RecurrenceRule::new(
                    Frequency::Weekly,
                    2,
                    vec![Weekday::Tue],
                    None,
                    at(2025, 8, 6, 14),
                )
                .unwrap(),
                duration_ms: Some(3_600_000),
            },
        }
    }

    #[test]
    fn series_range_spans_first_occurrence() {
        let range = make_series().range();
        assert_eq!(range.start(), at(2025, 8, 6, 14));
        assert_eq!(range.end(), at(2025, 8, 6, 15));
        assert!(!range.all_day());
    }

    #[test]
    fn all_day_series_range_is_one_day() {
        let mut series = make_series();
        series.all_day = true;
        series.kind = EventKind::Recurring {
            rule: RecurrenceRule::new(Frequency::Daily, 1, vec![], None, at(2025, 8, 10, 0)).unwrap(),
            duration_ms: None,
        };
        let range = series.range();
        assert_eq!(range.start(), range.end());
    }

    #[test]
    fn shifted_single_moves_both_ends() {
        let single = EventRecord {
            id: Uuid::new_v4(),
            group_id: None,
            title: "Dentist".to_string(),
            all_day: false,
            kind: EventKind::Single {
                start: at(2025, 8, 6, 9),
                end: at(2025, 8, 6, 10),
            },
        };

        let moved = single.shifted(TimeDelta::hours(3)).unwrap();
        assert_eq!(
            moved.kind,
            EventKind::Single {
                start: at(2025, 8, 6, 12),
                end: at(2025, 8, 6, 13),
            }
        );
        assert_eq!(moved.id, single.id);
    }

    #[test]
    fn shifted_series_keeps_until_and_duration() {
        let mut series = make_series();
        if let EventKind::Recurring { rule, .. } = &mut series.kind {
            rule.until = Some(at(2025, 8, 7, 0));
        }

        let moved = series.shifted(TimeDelta::days(2)).unwrap();
        let rule = moved.rule().unwrap();
        assert_eq!(rule.start, at(2025, 8, 8, 14));
        assert_eq!(rule.until, Some(at(2025, 8, 7, 0)));
        assert!(matches!(
            moved.kind,
            EventKind::Recurring { duration_ms: Some(3_600_000), .. }
        ));
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(make_series()).unwrap();
        assert_eq!(json["kind"]["type"], "recurring");
        assert_eq!(json["kind"]["rule"]["frequency"], "weekly");
        assert_eq!(json["kind"]["duration_ms"], 3_600_000);
    }
}
