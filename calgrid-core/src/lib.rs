//! Core types for calgrid.
//!
//! This crate holds the event and recurrence model behind a month/week/day
//! calendar grid:
//! - `draft` turns a selected `DateRange` plus dialog input into an `EventRecord`
//! - `store` owns the records and applies create-or-replace edits
//! - `shift` moves an event, or a whole recurring series, after a drag
//! - `render` produces what the grid needs to draw (including RRULE text)

pub mod config;
pub mod date_range;
pub mod draft;
pub mod error;
pub mod event;
pub mod recurrence;
pub mod render;
pub mod shift;
pub mod store;

pub use date_range::DateRange;
pub use draft::{DraftContext, DraftMode, DraftSession, EventDraftBuilder, FormInput};
pub use error::{CalGridError, CalGridResult, ValidationError};
pub use event::{EventKind, EventRecord};
pub use recurrence::{Frequency, RecurrenceRule};
pub use shift::shift;
pub use store::{EventStore, Upsert};
