//! Capacity and ownership rules.
//!
//! Pure functions over already-loaded rows. Store implementations call them
//! inside the same atomic section that performs the write, so a rule is never
//! evaluated against data another writer can change before the write lands.

use std::collections::BTreeSet;

use crate::error::{InventoryError, InventoryResult};
use crate::model::{Event, EventDraft, EventId, OwnerId, PackageDraft, TicketTarget};

fn check_fields(name: &str, seats: Option<i32>) -> InventoryResult<()> {
    if name.trim().is_empty() {
        return Err(InventoryError::InvalidRequest("name must not be blank".to_string()));
    }
    if let Some(seats) = seats {
        if seats < 0 {
            return Err(InventoryError::InvalidRequest(format!(
                "seats must be non-negative, got {}",
                seats
            )));
        }
    }
    Ok(())
}

pub fn validate_event_draft(draft: &EventDraft) -> InventoryResult<()> {
    check_fields(&draft.name, draft.seats)
}

/// Validates a package draft and returns its member ids as an ordered set.
pub fn validate_package_draft(draft: &PackageDraft) -> InventoryResult<Vec<EventId>> {
    check_fields(&draft.name, draft.seats)?;
    let members: BTreeSet<EventId> = draft.event_ids.iter().copied().collect();
    if members.is_empty() {
        return Err(InventoryError::InvalidRequest(
            "a package must reference at least one event".to_string(),
        ));
    }
    Ok(members.into_iter().collect())
}

/// Requested ids that have no matching row in `found`.
pub fn missing_events(requested: &[EventId], found: &[Event]) -> Vec<EventId> {
    requested
        .iter()
        .filter(|id| !found.iter().any(|event| event.id == **id))
        .copied()
        .collect()
}

/// Smallest capacity among members; unlimited members do not constrain it.
pub fn min_member_seats(members: &[Event]) -> Option<i32> {
    members.iter().filter_map(|event| event.seats).min()
}

pub fn check_package_capacity(requested: Option<i32>, members: &[Event]) -> InventoryResult<()> {
    match (requested, min_member_seats(members)) {
        (Some(requested), Some(min_seats)) if requested > min_seats => {
            Err(InventoryError::CapacityExceedsMembers { requested, min_seats })
        }
        _ => Ok(()),
    }
}

/// Gate for replacing an event's fields.
///
/// Capacity is frozen once any ticket references the event.
pub fn check_event_update(
    current: &Event,
    caller: OwnerId,
    draft: &EventDraft,
    tickets_sold: i64,
) -> InventoryResult<()> {
    if current.owner_id != caller {
        return Err(InventoryError::Forbidden(format!("event {}", current.id)));
    }
    if draft.seats != current.seats && tickets_sold > 0 {
        return Err(InventoryError::SeatsLocked(current.id));
    }
    Ok(())
}

pub fn check_issuable(target: TicketTarget, seats: Option<i32>, sold: i64) -> InventoryResult<()> {
    match seats {
        Some(seats) if sold >= i64::from(seats) => Err(InventoryError::SoldOut(target)),
        _ => Ok(()),
    }
}
