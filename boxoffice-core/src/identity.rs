use serde::{Deserialize, Serialize};

use crate::model::OwnerId;

/// Role names issued by the identity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "owner-event")]
    OwnerEvent,
    #[serde(rename = "client")]
    Client,
    #[serde(rename = "admin")]
    Admin,
    #[serde(other)]
    Other,
}

/// Verified caller identity, as established by the identity service.
///
/// `owner_id` is the stable numeric id the identity service assigns to the
/// subject; it is never derived locally from `subject`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject: String,
    pub role: Role,
    pub owner_id: OwnerId,
}

impl Identity {
    pub fn new(subject: impl Into<String>, role: Role, owner_id: OwnerId) -> Self {
        Self {
            subject: subject.into(),
            role,
            owner_id,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}
