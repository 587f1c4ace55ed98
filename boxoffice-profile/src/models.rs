use boxoffice_core::TicketCode;
use serde::{Deserialize, Serialize};

/// Descriptive copy of a purchased ticket kept on the buyer's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TicketSnapshot {
    Event {
        code: TicketCode,
        name: String,
        #[serde(default)]
        location: Option<String>,
    },
    Package {
        code: TicketCode,
        name: String,
    },
}

impl TicketSnapshot {
    pub fn code(&self) -> &TicketCode {
        match self {
            Self::Event { code, .. } | Self::Package { code, .. } => code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedTicket {
    pub added: bool,
    pub code: TicketCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDetails {
    pub code: TicketCode,
    pub valid: bool,
    pub ticket: TicketSnapshot,
}
