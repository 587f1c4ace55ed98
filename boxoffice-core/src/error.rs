use crate::model::{EventId, TicketTarget};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("caller does not own {0}")]
    Forbidden(String),

    #[error("name already in use: {0}")]
    DuplicateName(String),

    #[error("package seats {requested} exceed the tightest member event capacity {min_seats}")]
    CapacityExceedsMembers { requested: i32, min_seats: i32 },

    #[error("events not found: {0:?}")]
    EventsNotFound(Vec<EventId>),

    #[error("seats of event {0} are locked: tickets already sold")]
    SeatsLocked(EventId),

    #[error("{0} is sold out")]
    SoldOut(TicketTarget),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl InventoryError {
    /// Stable machine-readable condition name.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::DuplicateName(_) => "DUPLICATE_NAME",
            Self::CapacityExceedsMembers { .. } => "CAPACITY_EXCEEDS_MEMBERS",
            Self::EventsNotFound(_) => "EVENTS_NOT_FOUND",
            Self::SeatsLocked(_) => "SEATS_LOCKED",
            Self::SoldOut(_) => "SOLD_OUT",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::Storage(_) => "INTERNAL",
        }
    }
}

pub type InventoryResult<T> = Result<T, InventoryError>;
