use std::sync::Arc;
use tracing::debug;

use crate::error::InventoryResult;
use crate::model::TicketCode;
use crate::repository::InventoryStore;

/// Read-only existence check over issued tickets.
///
/// Validity is existence of exactly this code; there is no expiry or
/// redemption state behind it.
#[derive(Clone)]
pub struct TicketValidator {
    store: Arc<dyn InventoryStore>,
}

impl TicketValidator {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    pub async fn validate(&self, code: &TicketCode) -> InventoryResult<bool> {
        if code.as_str().is_empty() {
            return Ok(false);
        }
        let valid = self.store.find_ticket(code).await?.is_some();
        debug!(%code, valid, "ticket validated");
        Ok(valid)
    }
}
