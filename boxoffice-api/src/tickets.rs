use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use boxoffice_core::protocol::{
    IssueTicketRequest, TicketResponse, ValidateTicketRequest, ValidateTicketResponse,
};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::middleware::Caller;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tickets", post(issue_ticket))
        .route("/validate/ticket", post(validate_ticket))
}

async fn issue_ticket(
    State(state): State<AppState>,
    Caller(caller): Caller,
    AppJson(req): AppJson<IssueTicketRequest>,
) -> Result<(StatusCode, Json<TicketResponse>), AppError> {
    let target = req.target()?;
    let ticket = state.engine.issue_ticket(&caller, target).await?;
    Ok((StatusCode::CREATED, Json(ticket.into())))
}

async fn validate_ticket(
    State(state): State<AppState>,
    _caller: Caller,
    AppJson(req): AppJson<ValidateTicketRequest>,
) -> Result<Json<ValidateTicketResponse>, AppError> {
    let valid = state.validator.validate(&req.code).await?;
    Ok(Json(ValidateTicketResponse { valid }))
}
