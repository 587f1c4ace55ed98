use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use boxoffice_core::InventoryError;
use boxoffice_profile::PurchaseError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    Inventory(InventoryError),
    Purchase(PurchaseError),
}

fn inventory_status(err: &InventoryError) -> StatusCode {
    match err {
        InventoryError::NotFound(_) => StatusCode::NOT_FOUND,
        InventoryError::Forbidden(_) => StatusCode::FORBIDDEN,
        InventoryError::DuplicateName(_)
        | InventoryError::SeatsLocked(_)
        | InventoryError::SoldOut(_) => StatusCode::CONFLICT,
        InventoryError::CapacityExceedsMembers { .. }
        | InventoryError::EventsNotFound(_)
        | InventoryError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        InventoryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn purchase_status(err: &PurchaseError) -> StatusCode {
    match err {
        PurchaseError::TicketInvalid(_) => StatusCode::BAD_REQUEST,
        PurchaseError::ValidatorUnavailable(_) => StatusCode::BAD_GATEWAY,
        PurchaseError::AlreadyAttached(_) => StatusCode::CONFLICT,
        PurchaseError::NotFound(_) => StatusCode::NOT_FOUND,
        PurchaseError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", msg),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            AppError::Inventory(err) => (inventory_status(&err), err.code(), err.to_string()),
            AppError::Purchase(err) => (purchase_status(&err), err.code(), err.to_string()),
        };

        let error_message = if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
            tracing::error!("Internal Server Error: {}", error_message);
            "Internal Server Error".to_string()
        } else {
            error_message
        };

        let body = Json(json!({
            "error": error_message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        Self::Inventory(err)
    }
}

impl From<PurchaseError> for AppError {
    fn from(err: PurchaseError) -> Self {
        Self::Purchase(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Inventory(InventoryError::InvalidRequest(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::Inventory(InventoryError::InvalidRequest(rejection.body_text()))
    }
}
