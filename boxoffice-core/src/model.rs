use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{InventoryError, InventoryResult};

/// Length of a generated ticket code, in lowercase hex characters.
pub const TICKET_CODE_LEN: usize = 12;

macro_rules! numeric_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

numeric_id!(EventId);
numeric_id!(PackageId);
numeric_id!(OwnerId);

/// Opaque, globally unique proof-of-purchase code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketCode(String);

impl TicketCode {
    /// Fresh random code: the first 12 hex digits of a v4 UUID.
    pub fn generate() -> Self {
        let mut code = Uuid::new_v4().simple().to_string();
        code.truncate(TICKET_CODE_LEN);
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TicketCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TicketCode {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TicketCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub owner_id: OwnerId,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    /// `None` means unlimited capacity.
    pub seats: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,
    pub owner_id: OwnerId,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub seats: Option<i32>,
    /// Member events, ascending.
    pub event_ids: Vec<EventId>,
}

/// Caller-supplied fields for creating or replacing an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub seats: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDraft {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub seats: Option<i32>,
    #[serde(default)]
    pub event_ids: Vec<EventId>,
}

/// The single sellable unit a ticket is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketTarget {
    Event(EventId),
    Package(PackageId),
}

impl TicketTarget {
    /// Builds a target from the two optional wire fields; exactly one must be set.
    pub fn from_selection(
        event_id: Option<EventId>,
        package_id: Option<PackageId>,
    ) -> InventoryResult<Self> {
        match (event_id, package_id) {
            (Some(event_id), None) => Ok(Self::Event(event_id)),
            (None, Some(package_id)) => Ok(Self::Package(package_id)),
            (Some(_), Some(_)) => Err(InventoryError::InvalidRequest(
                "provide either event_id or package_id, not both".to_string(),
            )),
            (None, None) => Err(InventoryError::InvalidRequest(
                "provide event_id or package_id".to_string(),
            )),
        }
    }

    pub fn event_id(&self) -> Option<EventId> {
        match self {
            Self::Event(id) => Some(*id),
            Self::Package(_) => None,
        }
    }

    pub fn package_id(&self) -> Option<PackageId> {
        match self {
            Self::Event(_) => None,
            Self::Package(id) => Some(*id),
        }
    }
}

impl fmt::Display for TicketTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event(id) => write!(f, "event {}", id),
            Self::Package(id) => write!(f, "package {}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub code: TicketCode,
    pub target: TicketTarget,
}

/// Seat accounting for one target, recomputed from ticket rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub seats: Option<i32>,
    pub sold: i64,
    pub remaining: Option<i64>,
}

impl Availability {
    pub fn new(seats: Option<i32>, sold: i64) -> Self {
        Self {
            seats,
            sold,
            remaining: seats.map(|s| (i64::from(s) - sold).max(0)),
        }
    }
}
