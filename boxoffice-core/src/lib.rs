pub mod model;
pub mod identity;
pub mod error;
pub mod rules;
pub mod repository;
pub mod memory;
pub mod engine;
pub mod validator;
pub mod protocol;

pub use model::{
    Availability, Event, EventDraft, EventId, OwnerId, Package, PackageDraft, PackageId, Ticket,
    TicketCode, TicketTarget,
};
pub use identity::{Identity, Role};
pub use error::{InventoryError, InventoryResult};
pub use repository::{CodeGenerator, InventoryStore};
pub use memory::MemoryInventoryStore;
pub use engine::InventoryEngine;
pub use validator::TicketValidator;
