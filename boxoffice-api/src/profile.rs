use axum::{
    extract::State,
    routing::get,
    Extension, Json, Router,
};
use boxoffice_core::TicketCode;
use boxoffice_profile::{AttachedTicket, TicketDetails, TicketSnapshot};
use serde::Serialize;

use crate::error::AppError;
use crate::extract::{AppJson, AppPath};
use crate::middleware::{BearerToken, Caller};
use crate::state::ProfileState;

#[derive(Debug, Serialize)]
pub struct TicketList {
    pub tickets: Vec<TicketSnapshot>,
}

pub fn routes() -> Router<ProfileState> {
    Router::new()
        .route("/clients/me/tickets", get(list_tickets).post(attach_ticket))
        .route("/clients/me/tickets/{code}/details", get(ticket_details))
}

async fn attach_ticket(
    State(state): State<ProfileState>,
    Caller(caller): Caller,
    Extension(BearerToken(token)): Extension<BearerToken>,
    AppJson(ticket): AppJson<TicketSnapshot>,
) -> Result<Json<AttachedTicket>, AppError> {
    let attached = state
        .orchestrator
        .attach_ticket(&caller.subject, &token, ticket)
        .await?;
    Ok(Json(attached))
}

async fn list_tickets(
    State(state): State<ProfileState>,
    Caller(caller): Caller,
) -> Result<Json<TicketList>, AppError> {
    let tickets = state.orchestrator.tickets(&caller.subject).await?;
    Ok(Json(TicketList { tickets }))
}

async fn ticket_details(
    State(state): State<ProfileState>,
    Caller(caller): Caller,
    Extension(BearerToken(token)): Extension<BearerToken>,
    AppPath(code): AppPath<TicketCode>,
) -> Result<Json<TicketDetails>, AppError> {
    let details = state
        .orchestrator
        .ticket_details(&caller.subject, &token, &code)
        .await?;
    Ok(Json(details))
}
