//! The shape handed to the calendar grid for drawing.

use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

use crate::event::{EventKind, EventRecord};

/// One entry of the grid's event source.
///
/// One-offs carry `start`/`end`; series carry the RRULE text and per-occurrence
/// duration, and the grid expands them itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderInput {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Uuid>,
    pub title: String,
    pub all_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl RenderInput {
    pub fn from_record(record: &EventRecord) -> Self {
        let (start, end, rrule, duration_ms) = match &record.kind {
            EventKind::Single { start, end } => (Some(*start), Some(*end), None, None),
            EventKind::Recurring { rule, duration_ms } => {
                (None, None, Some(rule.to_rrule_string()), *duration_ms)
            }
        };

        RenderInput {
            id: record.id,
            group_id: record.group_id,
            title: record.title.clone(),
            all_day: record.all_day,
            start,
            end,
            rrule,
            duration_ms,
        }
    }
}
