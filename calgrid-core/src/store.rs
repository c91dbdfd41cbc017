//! In-memory event store.
//!
//! The store is the only thing that mutates event records. It keeps
//! insertion order so the grid renders a stable sequence.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::event::EventRecord;
use crate::render::RenderInput;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStore {
    events: Vec<EventRecord>,
}

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
    /// Every record of a series was rewritten.
    Series(usize),
}

impl From<Vec<EventRecord>> for EventStore {
    /// Seed a store with records as-is, without upsert matching.
    fn from(events: Vec<EventRecord>) -> Self {
        EventStore { events }
    }
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&EventRecord> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn find_group(&self, group_id: Uuid) -> impl Iterator<Item = &EventRecord> {
        self.events
            .iter()
            .filter(move |e| e.group_id == Some(group_id))
    }

    /// Look up a drag or click target that may be either a record id or a
    /// group id. Record ids win when both could match.
    pub fn resolve(&self, target: Uuid) -> Option<&EventRecord> {
        self.get(target)
            .or_else(|| self.find_group(target).next())
    }

    /// Create or replace a record.
    ///
    /// 1. A group id shared with existing records rewrites the whole series.
    /// 2. Otherwise a matching id is replaced in place.
    /// 3. Otherwise the record is appended.
    ///
    /// Applying the same record twice leaves the store as applying it once.
    pub fn upsert(&mut self, record: EventRecord) -> Upsert {
        if let Some(group_id) = record.group_id {
            let mut matched = 0;
            for existing in self.events.iter_mut().filter(|e| e.group_id == Some(group_id)) {
                existing.title.clone_from(&record.title);
                existing.all_day = record.all_day;
                existing.kind = record.kind.clone();
                matched += 1;
            }

            if matched > 0 {
                debug!(%group_id, matched, title = %record.title, "Updated series");
                return Upsert::Series(matched);
            }
        }

        if let Some(existing) = self.events.iter_mut().find(|e| e.id == record.id) {
            debug!(id = %record.id, title = %record.title, "Replaced event");
            *existing = record;
            return Upsert::Replaced;
        }

        debug!(id = %record.id, title = %record.title, "Inserted event");
        self.events.push(record);
        Upsert::Inserted
    }

    /// Replace a record in place by id, leaving its position unchanged.
    /// Returns false if no record has that id.
    pub(crate) fn replace(&mut self, record: EventRecord) -> bool {
        match self.events.iter_mut().find(|e| e.id == record.id) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => false,
        }
    }

    pub(crate) fn group_ids(&self, group_id: Uuid) -> Vec<Uuid> {
        self.find_group(group_id).map(|e| e.id).collect()
    }

    /// Render inputs for the grid, in store order.
    pub fn render_inputs(&self) -> Vec<RenderInput> {
        self.events.iter().map(RenderInput::from_record).collect()
    }
}
