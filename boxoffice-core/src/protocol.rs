//! Wire shapes shared by the inventory service and its callers.

use serde::{Deserialize, Serialize};

use crate::error::InventoryResult;
use crate::model::{EventId, PackageId, Ticket, TicketCode, TicketTarget};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueTicketRequest {
    #[serde(default)]
    pub event_id: Option<EventId>,
    #[serde(default)]
    pub package_id: Option<PackageId>,
}

impl IssueTicketRequest {
    pub fn target(&self) -> InventoryResult<TicketTarget> {
        TicketTarget::from_selection(self.event_id, self.package_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketResponse {
    pub code: TicketCode,
    pub event_id: Option<EventId>,
    pub package_id: Option<PackageId>,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            event_id: ticket.target.event_id(),
            package_id: ticket.target.package_id(),
            code: ticket.code,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateTicketRequest {
    pub code: TicketCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateTicketResponse {
    pub valid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_response_sets_exactly_one_target_field() {
        let ticket = Ticket {
            code: TicketCode::from("abc123abc123"),
            target: TicketTarget::Package(PackageId(4)),
        };
        let json = serde_json::to_value(TicketResponse::from(ticket)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"code": "abc123abc123", "event_id": null, "package_id": 4})
        );
    }

    #[test]
    fn issue_request_parses_into_target() {
        let req: IssueTicketRequest = serde_json::from_str(r#"{"event_id": 7}"#).unwrap();
        assert_eq!(req.target().unwrap(), TicketTarget::Event(EventId(7)));

        let req: IssueTicketRequest = serde_json::from_str("{}").unwrap();
        assert!(req.target().is_err());
    }
}
