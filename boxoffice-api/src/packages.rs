use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use boxoffice_core::{Availability, Event, Package, PackageDraft, PackageId, TicketCode, TicketTarget};
use boxoffice_core::protocol::TicketResponse;

use crate::error::AppError;
use crate::extract::{AppJson, AppPath};
use crate::middleware::{Caller, EventOwner};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/packages", post(create_package))
        .route("/packages/{id}", get(get_package))
        .route("/packages/{id}/events", get(package_events))
        .route("/packages/{id}/tickets/{code}", get(package_ticket))
        .route("/packages/{id}/availability", get(package_availability))
}

async fn create_package(
    State(state): State<AppState>,
    EventOwner(owner): EventOwner,
    AppJson(draft): AppJson<PackageDraft>,
) -> Result<(StatusCode, Json<Package>), AppError> {
    let package = state.engine.create_package(&owner, draft).await?;
    Ok((StatusCode::CREATED, Json(package)))
}

async fn get_package(
    State(state): State<AppState>,
    _caller: Caller,
    AppPath(id): AppPath<PackageId>,
) -> Result<Json<Package>, AppError> {
    Ok(Json(state.engine.package(id).await?))
}

async fn package_events(
    State(state): State<AppState>,
    _caller: Caller,
    AppPath(id): AppPath<PackageId>,
) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(state.engine.events_for_package(id).await?))
}

async fn package_ticket(
    State(state): State<AppState>,
    _caller: Caller,
    AppPath((id, code)): AppPath<(PackageId, TicketCode)>,
) -> Result<Json<TicketResponse>, AppError> {
    let ticket = state.engine.ticket_for(TicketTarget::Package(id), &code).await?;
    Ok(Json(ticket.into()))
}

async fn package_availability(
    State(state): State<AppState>,
    _caller: Caller,
    AppPath(id): AppPath<PackageId>,
) -> Result<Json<Availability>, AppError> {
    Ok(Json(state.engine.availability(TicketTarget::Package(id)).await?))
}
