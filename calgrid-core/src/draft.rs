//! Turning grid selections and dialog input into event records.
//!
//! A draft is an explicit value: `EventDraftBuilder::start_new` /
//! `start_edit` produce a [`DraftContext`], the dialog edits a [`FormInput`],
//! and `build` combines the two into an [`EventRecord`] for the store.
//! [`DraftSession`] tracks whether a dialog is open at all.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::{BuilderConfig, WeeklyFallback};
use crate::date_range::{DateRange, end_of_day, start_of_day};
use crate::error::ValidationError;
use crate::event::{EventKind, EventRecord};
use crate::recurrence::{Frequency, RecurrenceRule};
use crate::store::EventStore;

/// The dialog's form fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormInput {
    pub title: String,
    /// `None` means "does not repeat".
    pub repeat: Option<Frequency>,
    /// Raw number field; validated on build.
    pub interval: i64,
    pub weekdays: Vec<Weekday>,
    pub until: Option<NaiveDate>,
}

impl Default for FormInput {
    fn default() -> Self {
        FormInput {
            title: String::new(),
            repeat: None,
            interval: 1,
            weekdays: Vec::new(),
            until: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftMode {
    New,
    /// Identity of the record being edited, carried through to the save.
    Edit { id: Uuid, group_id: Option<Uuid> },
}

/// An unsaved event: what was selected, and what the form starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftContext {
    pub mode: DraftMode,
    pub range: Option<DateRange>,
    pub form: FormInput,
}

impl DraftContext {
    pub fn is_edit(&self) -> bool {
        matches!(self.mode, DraftMode::Edit { .. })
    }

    pub fn heading(&self) -> &'static str {
        if self.is_edit() { "Edit event" } else { "Add event" }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventDraftBuilder {
    config: BuilderConfig,
}

impl EventDraftBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        EventDraftBuilder { config }
    }

    /// Fresh draft for an empty-cell click or a drag-select.
    pub fn start_new(&self, range: DateRange) -> DraftContext {
        DraftContext {
            mode: DraftMode::New,
            range: Some(range),
            form: FormInput::default(),
        }
    }

    /// Draft for an existing record, with its rule unpacked into form fields.
    pub fn start_edit(&self, existing: &EventRecord) -> DraftContext {
        let mut form = FormInput {
            title: existing.title.clone(),
            ..FormInput::default()
        };

        if let Some(rule) = existing.rule() {
            form.repeat = Some(rule.frequency);
            form.interval = i64::from(rule.interval);
            form.weekdays = rule.effective_weekdays().to_vec();
            form.until = rule.until.map(|u| u.date());
        }

        DraftContext {
            mode: DraftMode::Edit {
                id: existing.id,
                group_id: existing.group_id,
            },
            range: Some(existing.range()),
            form,
        }
    }

    /// Draft for a clicked occurrence, by record id or group id.
    pub fn start_edit_target(&self, store: &EventStore, target: Uuid) -> Option<DraftContext> {
        store.resolve(target).map(|record| self.start_edit(record))
    }

    pub fn build(
        &self,
        ctx: &DraftContext,
        form: &FormInput,
    ) -> Result<EventRecord, ValidationError> {
        let title = form.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let range = ctx.range.ok_or(ValidationError::MissingRange)?;

        let kind = match form.repeat {
            None => EventKind::Single {
                start: range.start(),
                end: range.end(),
            },
            Some(frequency) => {
                let interval = u32::try_from(form.interval)
                    .ok()
                    .filter(|i| *i >= 1)
                    .ok_or(ValidationError::InvalidInterval)?;

                let weekdays = self.weekdays_for(frequency, &form.weekdays, &range)?;

                let until = form.until.map(|date| {
                    if self.config.until_inclusive {
                        end_of_day(date)
                    } else {
                        start_of_day(date)
                    }
                });

                // A series dragged past its end date can still be edited as
                // long as the end date is left as shown.
                let until_unchanged = ctx.is_edit() && form.until == ctx.form.until;
                let rule = match RecurrenceRule::new(
                    frequency,
                    interval,
                    weekdays.clone(),
                    until,
                    range.start(),
                ) {
                    Err(ValidationError::UntilBeforeStart) if until_unchanged => {
                        debug!("Keeping an end date that precedes the series start");
                        let mut rule =
                            RecurrenceRule::new(frequency, interval, weekdays, None, range.start())?;
                        rule.until = until;
                        rule
                    }
                    other => other?,
                };
                let duration_ms = (!range.all_day()).then(|| range.duration_ms());

                EventKind::Recurring { rule, duration_ms }
            }
        };

        let (id, group_id) = match ctx.mode {
            DraftMode::Edit { id, group_id } => (id, group_id),
            DraftMode::New => {
                let group_id = matches!(kind, EventKind::Recurring { .. }).then(Uuid::new_v4);
                (Uuid::new_v4(), group_id)
            }
        };

        Ok(EventRecord {
            id,
            group_id,
            title: title.to_string(),
            all_day: range.all_day(),
            kind,
        })
    }

    fn weekdays_for(
        &self,
        frequency: Frequency,
        selected: &[Weekday],
        range: &DateRange,
    ) -> Result<Vec<Weekday>, ValidationError> {
        if frequency != Frequency::Weekly || !selected.is_empty() {
            return Ok(selected.to_vec());
        }

        match self.config.weekly_fallback {
            WeeklyFallback::StartWeekday => Ok(vec![range.start().weekday()]),
            WeeklyFallback::Reject => Err(ValidationError::NoWeekdays),
        }
    }
}

/// Whether an event dialog is open, and on what.
///
/// Every `open` starts from a fresh context; nothing survives a close.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DraftSession {
    #[default]
    Closed,
    Open(DraftContext),
}

impl DraftSession {
    pub fn open(&mut self, ctx: DraftContext) {
        *self = DraftSession::Open(ctx);
    }

    pub fn cancel(&mut self) {
        *self = DraftSession::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, DraftSession::Open(_))
    }

    pub fn context(&self) -> Option<&DraftContext> {
        match self {
            DraftSession::Open(ctx) => Some(ctx),
            DraftSession::Closed => None,
        }
    }

    /// Build the draft and write it to the store.
    ///
    /// On a validation error the dialog stays open and the store is
    /// untouched. Saving a closed session (a second click on the same save
    /// button) does nothing and returns `Ok(None)`.
    pub fn save(
        &mut self,
        builder: &EventDraftBuilder,
        store: &mut EventStore,
        form: &FormInput,
    ) -> Result<Option<EventRecord>, ValidationError> {
        let DraftSession::Open(ctx) = self else {
            debug!("Save on a closed dialog, ignoring");
            return Ok(None);
        };

        let record = builder.build(ctx, form)?;
        store.upsert(record.clone());
        *self = DraftSession::Closed;

        Ok(Some(record))
    }
}
