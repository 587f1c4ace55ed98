use async_trait::async_trait;
use std::sync::Arc;

use crate::error::InventoryResult;
use crate::model::{
    Event, EventDraft, EventId, OwnerId, Package, PackageDraft, PackageId, Ticket, TicketCode,
    TicketTarget,
};

/// Source of candidate ticket codes. Stores retry on collision.
pub type CodeGenerator = Arc<dyn Fn() -> TicketCode + Send + Sync>;

/// Upper bound on fresh codes tried for a single issuance.
pub const MAX_CODE_ATTEMPTS: usize = 8;

pub fn default_code_generator() -> CodeGenerator {
    Arc::new(TicketCode::generate)
}

/// Durable inventory storage.
///
/// Every mutating method is one atomic unit: the checks from
/// [`crate::rules`] run against the same snapshot the write commits to, and
/// implementations must keep that true across independent processes (row
/// locks and unique constraints, not in-process locking alone).
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Fails with `DuplicateName` when the name is taken.
    async fn insert_event(&self, owner: OwnerId, draft: &EventDraft) -> InventoryResult<Event>;

    async fn get_event(&self, id: EventId) -> InventoryResult<Option<Event>>;

    /// Replaces the event's fields after `rules::check_event_update` passes
    /// under the same lock that ticket issuance takes.
    async fn update_event(
        &self,
        id: EventId,
        caller: OwnerId,
        draft: &EventDraft,
    ) -> InventoryResult<Event>;

    /// Inserts the package and all membership rows together.
    /// `members` is the validated, de-duplicated id set.
    async fn insert_package(
        &self,
        owner: OwnerId,
        draft: &PackageDraft,
        members: &[EventId],
    ) -> InventoryResult<Package>;

    async fn get_package(&self, id: PackageId) -> InventoryResult<Option<Package>>;

    async fn packages_for_event(&self, id: EventId) -> InventoryResult<Vec<Package>>;

    async fn events_for_package(&self, id: PackageId) -> InventoryResult<Vec<Event>>;

    /// Count-then-insert as one step. `NotFound` for a missing target,
    /// `SoldOut` at capacity.
    async fn issue_ticket(&self, target: TicketTarget) -> InventoryResult<Ticket>;

    async fn find_ticket(&self, code: &TicketCode) -> InventoryResult<Option<Ticket>>;

    async fn tickets_sold(&self, target: TicketTarget) -> InventoryResult<i64>;
}
