pub mod models;
pub mod error;
pub mod validator_client;
pub mod store;
pub mod orchestrator;

pub use models::{AttachedTicket, TicketDetails, TicketSnapshot};
pub use error::{ProfileStoreError, PurchaseError, ValidatorError};
pub use validator_client::{HttpValidatorClient, ValidatorClient};
pub use store::{MemoryProfileStore, ProfileStore};
pub use orchestrator::PurchaseOrchestrator;
