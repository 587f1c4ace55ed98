use std::sync::Arc;
use boxoffice_core::{InventoryEngine, InventoryStore, TicketValidator};
use boxoffice_profile::PurchaseOrchestrator;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

/// State of the inventory service.
#[derive(Clone)]
pub struct AppState {
    pub engine: InventoryEngine,
    pub validator: TicketValidator,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn InventoryStore>, auth: AuthConfig) -> Self {
        Self {
            engine: InventoryEngine::new(store.clone()),
            validator: TicketValidator::new(store),
            auth,
        }
    }
}

/// State of the client-profile service.
#[derive(Clone)]
pub struct ProfileState {
    pub orchestrator: Arc<PurchaseOrchestrator>,
    pub auth: AuthConfig,
}
