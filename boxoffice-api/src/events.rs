use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use boxoffice_core::{Availability, Event, EventDraft, EventId, Package, TicketCode, TicketTarget};
use boxoffice_core::protocol::TicketResponse;

use crate::error::AppError;
use crate::extract::{AppJson, AppPath};
use crate::middleware::{Caller, EventOwner};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(create_event))
        .route("/events/{id}", get(get_event).put(update_event))
        .route("/events/{id}/packages", get(event_packages))
        .route("/events/{id}/tickets/{code}", get(event_ticket))
        .route("/events/{id}/availability", get(event_availability))
}

async fn create_event(
    State(state): State<AppState>,
    EventOwner(owner): EventOwner,
    AppJson(draft): AppJson<EventDraft>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let event = state.engine.create_event(&owner, draft).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn update_event(
    State(state): State<AppState>,
    EventOwner(owner): EventOwner,
    AppPath(id): AppPath<EventId>,
    AppJson(draft): AppJson<EventDraft>,
) -> Result<Json<Event>, AppError> {
    Ok(Json(state.engine.update_event(&owner, id, draft).await?))
}

async fn get_event(
    State(state): State<AppState>,
    _caller: Caller,
    AppPath(id): AppPath<EventId>,
) -> Result<Json<Event>, AppError> {
    Ok(Json(state.engine.event(id).await?))
}

async fn event_packages(
    State(state): State<AppState>,
    _caller: Caller,
    AppPath(id): AppPath<EventId>,
) -> Result<Json<Vec<Package>>, AppError> {
    Ok(Json(state.engine.packages_for_event(id).await?))
}

async fn event_ticket(
    State(state): State<AppState>,
    _caller: Caller,
    AppPath((id, code)): AppPath<(EventId, TicketCode)>,
) -> Result<Json<TicketResponse>, AppError> {
    let ticket = state.engine.ticket_for(TicketTarget::Event(id), &code).await?;
    Ok(Json(ticket.into()))
}

async fn event_availability(
    State(state): State<AppState>,
    _caller: Caller,
    AppPath(id): AppPath<EventId>,
) -> Result<Json<Availability>, AppError> {
    Ok(Json(state.engine.availability(TicketTarget::Event(id)).await?))
}
