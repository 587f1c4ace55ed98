use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use crate::error::{InventoryError, InventoryResult};
use crate::model::{
    Event, EventDraft, EventId, OwnerId, Package, PackageDraft, PackageId, Ticket, TicketCode,
    TicketTarget,
};
use crate::repository::{default_code_generator, CodeGenerator, InventoryStore, MAX_CODE_ATTEMPTS};
use crate::rules;

#[derive(Default)]
struct Inventory {
    events: BTreeMap<EventId, Event>,
    packages: BTreeMap<PackageId, Package>,
    tickets: HashMap<TicketCode, Ticket>,
    last_event_id: i64,
    last_package_id: i64,
}

impl Inventory {
    fn tickets_sold(&self, target: TicketTarget) -> i64 {
        self.tickets.values().filter(|t| t.target == target).count() as i64
    }

    fn event_name_taken(&self, name: &str, except: Option<EventId>) -> bool {
        self.events
            .values()
            .any(|e| e.name == name && Some(e.id) != except)
    }
}

/// In-process inventory store.
///
/// One mutex guards the whole inventory, so every trait method is atomic in
/// the same sense the Postgres store's transactions are.
pub struct MemoryInventoryStore {
    inventory: Mutex<Inventory>,
    codes: CodeGenerator,
}

impl MemoryInventoryStore {
    pub fn new() -> Self {
        Self::with_code_generator(default_code_generator())
    }

    pub fn with_code_generator(codes: CodeGenerator) -> Self {
        Self {
            inventory: Mutex::new(Inventory::default()),
            codes,
        }
    }

    fn lock(&self) -> InventoryResult<MutexGuard<'_, Inventory>> {
        self.inventory
            .lock()
            .map_err(|_| InventoryError::Storage("inventory lock poisoned".to_string()))
    }
}

impl Default for MemoryInventoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    async fn insert_event(&self, owner: OwnerId, draft: &EventDraft) -> InventoryResult<Event> {
        let mut inventory = self.lock()?;
        if inventory.event_name_taken(&draft.name, None) {
            return Err(InventoryError::DuplicateName(draft.name.clone()));
        }

        inventory.last_event_id += 1;
        let event = Event {
            id: EventId(inventory.last_event_id),
            owner_id: owner,
            name: draft.name.clone(),
            location: draft.location.clone(),
            description: draft.description.clone(),
            seats: draft.seats,
        };
        inventory.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn get_event(&self, id: EventId) -> InventoryResult<Option<Event>> {
        Ok(self.lock()?.events.get(&id).cloned())
    }

    async fn update_event(
        &self,
        id: EventId,
        caller: OwnerId,
        draft: &EventDraft,
    ) -> InventoryResult<Event> {
        let mut inventory = self.lock()?;
        let current = inventory
            .events
            .get(&id)
            .cloned()
            .ok_or_else(|| InventoryError::NotFound(format!("event {}", id)))?;

        let sold = inventory.tickets_sold(TicketTarget::Event(id));
        rules::check_event_update(&current, caller, draft, sold)?;
        if inventory.event_name_taken(&draft.name, Some(id)) {
            return Err(InventoryError::DuplicateName(draft.name.clone()));
        }

        let updated = Event {
            name: draft.name.clone(),
            location: draft.location.clone(),
            description: draft.description.clone(),
            seats: draft.seats,
            ..current
        };
        inventory.events.insert(id, updated.clone());
        Ok(updated)
    }

    async fn insert_package(
        &self,
        owner: OwnerId,
        draft: &PackageDraft,
        members: &[EventId],
    ) -> InventoryResult<Package> {
        let mut inventory = self.lock()?;
        let found: Vec<Event> = members
            .iter()
            .filter_map(|id| inventory.events.get(id).cloned())
            .collect();

        let missing = rules::missing_events(members, &found);
        if !missing.is_empty() {
            return Err(InventoryError::EventsNotFound(missing));
        }
        rules::check_package_capacity(draft.seats, &found)?;
        if inventory.packages.values().any(|p| p.name == draft.name) {
            return Err(InventoryError::DuplicateName(draft.name.clone()));
        }

        inventory.last_package_id += 1;
        let package = Package {
            id: PackageId(inventory.last_package_id),
            owner_id: owner,
            name: draft.name.clone(),
            location: draft.location.clone(),
            description: draft.description.clone(),
            seats: draft.seats,
            event_ids: members.to_vec(),
        };
        inventory.packages.insert(package.id, package.clone());
        Ok(package)
    }

    async fn get_package(&self, id: PackageId) -> InventoryResult<Option<Package>> {
        Ok(self.lock()?.packages.get(&id).cloned())
    }

    async fn packages_for_event(&self, id: EventId) -> InventoryResult<Vec<Package>> {
        Ok(self
            .lock()?
            .packages
            .values()
            .filter(|p| p.event_ids.contains(&id))
            .cloned()
            .collect())
    }

    async fn events_for_package(&self, id: PackageId) -> InventoryResult<Vec<Event>> {
        let inventory = self.lock()?;
        let Some(package) = inventory.packages.get(&id) else {
            return Ok(Vec::new());
        };
        Ok(package
            .event_ids
            .iter()
            .filter_map(|event_id| inventory.events.get(event_id).cloned())
            .collect())
    }

    async fn issue_ticket(&self, target: TicketTarget) -> InventoryResult<Ticket> {
        let mut inventory = self.lock()?;
        let seats = match target {
            TicketTarget::Event(id) => inventory.events.get(&id).map(|e| e.seats),
            TicketTarget::Package(id) => inventory.packages.get(&id).map(|p| p.seats),
        }
        .ok_or_else(|| InventoryError::NotFound(target.to_string()))?;

        rules::check_issuable(target, seats, inventory.tickets_sold(target))?;

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = (self.codes)();
            if inventory.tickets.contains_key(&code) {
                continue;
            }
            let ticket = Ticket { code: code.clone(), target };
            inventory.tickets.insert(code, ticket.clone());
            return Ok(ticket);
        }

        Err(InventoryError::Storage(
            "could not allocate a unique ticket code".to_string(),
        ))
    }

    async fn find_ticket(&self, code: &TicketCode) -> InventoryResult<Option<Ticket>> {
        Ok(self.lock()?.tickets.get(code).cloned())
    }

    async fn tickets_sold(&self, target: TicketTarget) -> InventoryResult<i64> {
        Ok(self.lock()?.tickets_sold(target))
    }
}
