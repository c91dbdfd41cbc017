//! Drag-move of events and whole series.

use chrono::TimeDelta;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::store::EventStore;

/// Move the event or series behind `target` by `delta_ms` milliseconds.
///
/// `target` may be a record id or a group id. When the resolved record
/// belongs to a group, every record of that group moves: series by their
/// rule start, one-offs by start and end. A record without a group moves
/// alone. Unknown targets are ignored. Returns how many records moved.
pub fn shift(store: &mut EventStore, target: Uuid, delta_ms: i64) -> usize {
    let Some(resolved) = store.resolve(target) else {
        debug!(%target, "Shift target not found, ignoring");
        return 0;
    };

    let Some(delta) = TimeDelta::try_milliseconds(delta_ms) else {
        warn!(%target, delta_ms, "Shift delta out of range, ignoring");
        return 0;
    };

    let ids = match resolved.group_id {
        Some(group_id) => store.group_ids(group_id),
        None => vec![resolved.id],
    };

    let mut moved = 0;
    for id in ids {
        let Some(record) = store.get(id) else {
            continue;
        };

        match record.shifted(delta) {
            Some(shifted) => {
                if store.replace(shifted) {
                    moved += 1;
                }
            }
            None => warn!(%id, delta_ms, "Shifted time out of range, leaving event in place"),
        }
    }

    debug!(%target, delta_ms, moved, "Shifted events");
    moved
}
