use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::ProfileStoreError;
use crate::models::TicketSnapshot;

/// Buyer profile documents, keyed by identity subject.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Tickets on the subject's profile; empty when there is no profile.
    async fn tickets(&self, subject: &str) -> Result<Vec<TicketSnapshot>, ProfileStoreError>;

    /// Appends the snapshot, creating the profile if needed. Returns `false`
    /// and writes nothing when the code is already on the profile.
    async fn attach(&self, subject: &str, ticket: TicketSnapshot) -> Result<bool, ProfileStoreError>;
}

#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<HashMap<String, Vec<TicketSnapshot>>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn tickets(&self, subject: &str) -> Result<Vec<TicketSnapshot>, ProfileStoreError> {
        let profiles = self
            .profiles
            .lock()
            .map_err(|_| ProfileStoreError::Unavailable("profile lock poisoned".to_string()))?;
        Ok(profiles.get(subject).cloned().unwrap_or_default())
    }

    async fn attach(&self, subject: &str, ticket: TicketSnapshot) -> Result<bool, ProfileStoreError> {
        let mut profiles = self
            .profiles
            .lock()
            .map_err(|_| ProfileStoreError::Unavailable("profile lock poisoned".to_string()))?;
        let tickets = profiles.entry(subject.to_string()).or_default();
        if tickets.iter().any(|t| t.code() == ticket.code()) {
            return Ok(false);
        }
        tickets.push(ticket);
        Ok(true)
    }
}
