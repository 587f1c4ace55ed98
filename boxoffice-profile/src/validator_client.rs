use async_trait::async_trait;
use boxoffice_core::protocol::{ValidateTicketRequest, ValidateTicketResponse};
use boxoffice_core::TicketCode;
use std::time::Duration;
use tracing::debug;

use crate::error::ValidatorError;

/// Remote `Validate(code)` call.
#[async_trait]
pub trait ValidatorClient: Send + Sync {
    /// `Ok(false)` only when the validator answered that the code is unknown.
    async fn validate(&self, code: &TicketCode, bearer_token: &str) -> Result<bool, ValidatorError>;
}

/// Calls `POST {base_url}/validate/ticket` on the inventory service.
#[derive(Clone)]
pub struct HttpValidatorClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpValidatorClient {
    /// `timeout` bounds the whole round trip, connect included.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ValidatorError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| ValidatorError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ValidatorClient for HttpValidatorClient {
    async fn validate(&self, code: &TicketCode, bearer_token: &str) -> Result<bool, ValidatorError> {
        let response = self
            .client
            .post(format!("{}/validate/ticket", self.base_url))
            .bearer_auth(bearer_token)
            .json(&ValidateTicketRequest { code: code.clone() })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ValidatorError::Status(status.as_u16()));
        }

        let body: ValidateTicketResponse = response.json().await?;
        debug!(%code, valid = body.valid, "validator answered");
        Ok(body.valid)
    }
}
