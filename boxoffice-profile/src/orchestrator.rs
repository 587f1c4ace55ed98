use boxoffice_core::TicketCode;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::PurchaseError;
use crate::models::{AttachedTicket, TicketDetails, TicketSnapshot};
use crate::store::ProfileStore;
use crate::validator_client::ValidatorClient;

/// Records purchased tickets on buyer profiles after the inventory service
/// confirms them.
///
/// Validation always completes before the single profile write, so dropping
/// an in-flight call leaves the profile untouched. Issuance and attachment
/// live in different stores with no compensation between them; a ticket
/// validated here and later invalidated upstream stays on the profile.
pub struct PurchaseOrchestrator {
    validator: Arc<dyn ValidatorClient>,
    profiles: Arc<dyn ProfileStore>,
}

impl PurchaseOrchestrator {
    pub fn new(validator: Arc<dyn ValidatorClient>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { validator, profiles }
    }

    pub async fn attach_ticket(
        &self,
        subject: &str,
        bearer_token: &str,
        ticket: TicketSnapshot,
    ) -> Result<AttachedTicket, PurchaseError> {
        let code = ticket.code().clone();
        self.confirm(&code, bearer_token).await?;

        if !self.profiles.attach(subject, ticket).await? {
            return Err(PurchaseError::AlreadyAttached(code));
        }

        info!(%code, subject, "ticket attached to profile");
        Ok(AttachedTicket { added: true, code })
    }

    pub async fn tickets(&self, subject: &str) -> Result<Vec<TicketSnapshot>, PurchaseError> {
        Ok(self.profiles.tickets(subject).await?)
    }

    /// Re-validates a ticket already on the caller's profile.
    pub async fn ticket_details(
        &self,
        subject: &str,
        bearer_token: &str,
        code: &TicketCode,
    ) -> Result<TicketDetails, PurchaseError> {
        let ticket = self
            .profiles
            .tickets(subject)
            .await?
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or_else(|| PurchaseError::NotFound(code.clone()))?;

        self.confirm(code, bearer_token).await?;

        Ok(TicketDetails {
            code: code.clone(),
            valid: true,
            ticket,
        })
    }

    async fn confirm(&self, code: &TicketCode, bearer_token: &str) -> Result<(), PurchaseError> {
        match self.validator.validate(code, bearer_token).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!(%code, "validator rejected ticket");
                Err(PurchaseError::TicketInvalid(code.clone()))
            }
            Err(err) => {
                error!(%code, error = %err, "ticket validation failed");
                Err(PurchaseError::ValidatorUnavailable(err))
            }
        }
    }
}
