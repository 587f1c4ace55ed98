use boxoffice_core::TicketCode;

/// Why a validation round trip produced no answer.
#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    #[error("validator timed out")]
    Timeout,

    #[error("validator unreachable: {0}")]
    Transport(String),

    #[error("validator answered with status {0}")]
    Status(u16),

    #[error("malformed validator response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ValidatorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileStoreError {
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PurchaseError {
    #[error("ticket {0} is not valid")]
    TicketInvalid(TicketCode),

    /// Distinct from `TicketInvalid`: the answer is unknown, callers may retry.
    #[error("ticket validator unavailable: {0}")]
    ValidatorUnavailable(#[source] ValidatorError),

    #[error("ticket {0} is already on this profile")]
    AlreadyAttached(TicketCode),

    #[error("ticket {0} not found on this profile")]
    NotFound(TicketCode),

    #[error(transparent)]
    Store(#[from] ProfileStoreError),
}

impl PurchaseError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::TicketInvalid(_) => "TICKET_INVALID",
            Self::ValidatorUnavailable(_) => "VALIDATOR_UNAVAILABLE",
            Self::AlreadyAttached(_) => "ALREADY_ATTACHED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Store(_) => "INTERNAL",
        }
    }
}
