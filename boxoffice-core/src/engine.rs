use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{InventoryError, InventoryResult};
use crate::identity::Identity;
use crate::model::{
    Availability, Event, EventDraft, EventId, Package, PackageDraft, PackageId, Ticket,
    TicketCode, TicketTarget,
};
use crate::repository::InventoryStore;
use crate::rules;

/// Entry point for every capacity-affecting mutation.
///
/// The engine validates input and resolves ownership; atomicity of each
/// check-then-write is delegated to the injected [`InventoryStore`].
#[derive(Clone)]
pub struct InventoryEngine {
    store: Arc<dyn InventoryStore>,
}

impl InventoryEngine {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    pub async fn create_event(&self, caller: &Identity, draft: EventDraft) -> InventoryResult<Event> {
        rules::validate_event_draft(&draft)?;
        let event = self.store.insert_event(caller.owner_id, &draft).await?;
        info!(event_id = %event.id, owner_id = %event.owner_id, "event created");
        Ok(event)
    }

    pub async fn update_event(
        &self,
        caller: &Identity,
        id: EventId,
        draft: EventDraft,
    ) -> InventoryResult<Event> {
        rules::validate_event_draft(&draft)?;
        let result = self.store.update_event(id, caller.owner_id, &draft).await;
        match &result {
            Ok(event) => info!(event_id = %event.id, "event updated"),
            Err(InventoryError::SeatsLocked(_)) => {
                warn!(event_id = %id, "rejected seat change on event with sales")
            }
            Err(_) => {}
        }
        result
    }

    pub async fn create_package(
        &self,
        caller: &Identity,
        draft: PackageDraft,
    ) -> InventoryResult<Package> {
        let members = rules::validate_package_draft(&draft)?;
        let package = self
            .store
            .insert_package(caller.owner_id, &draft, &members)
            .await?;
        info!(
            package_id = %package.id,
            members = package.event_ids.len(),
            "package created"
        );
        Ok(package)
    }

    /// Issues one ticket against `target`. Any verified caller may buy.
    pub async fn issue_ticket(&self, caller: &Identity, target: TicketTarget) -> InventoryResult<Ticket> {
        match self.store.issue_ticket(target).await {
            Ok(ticket) => {
                info!(code = %ticket.code, ticket_target = %target, subject = %caller.subject, "ticket issued");
                Ok(ticket)
            }
            Err(err @ InventoryError::SoldOut(_)) => {
                warn!(ticket_target = %target, "issuance rejected: sold out");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn event(&self, id: EventId) -> InventoryResult<Event> {
        self.store
            .get_event(id)
            .await?
            .ok_or_else(|| InventoryError::NotFound(format!("event {}", id)))
    }

    pub async fn package(&self, id: PackageId) -> InventoryResult<Package> {
        self.store
            .get_package(id)
            .await?
            .ok_or_else(|| InventoryError::NotFound(format!("package {}", id)))
    }

    pub async fn packages_for_event(&self, id: EventId) -> InventoryResult<Vec<Package>> {
        self.event(id).await?;
        self.store.packages_for_event(id).await
    }

    pub async fn events_for_package(&self, id: PackageId) -> InventoryResult<Vec<Event>> {
        self.package(id).await?;
        self.store.events_for_package(id).await
    }

    /// The ticket with `code`, provided it is bound to `target`.
    pub async fn ticket_for(&self, target: TicketTarget, code: &TicketCode) -> InventoryResult<Ticket> {
        self.store
            .find_ticket(code)
            .await?
            .filter(|ticket| ticket.target == target)
            .ok_or_else(|| InventoryError::NotFound(format!("ticket {} for {}", code, target)))
    }

    /// Unserialized read; may trail concurrent issuance.
    pub async fn availability(&self, target: TicketTarget) -> InventoryResult<Availability> {
        let seats = match target {
            TicketTarget::Event(id) => self.event(id).await?.seats,
            TicketTarget::Package(id) => self.package(id).await?.seats,
        };
        let sold = self.store.tickets_sold(target).await?;
        Ok(Availability::new(seats, sold))
    }
}
