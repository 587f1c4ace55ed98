use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod events;
pub mod extract;
pub mod middleware;
pub mod packages;
pub mod profile;
pub mod state;
pub mod tickets;

pub use state::{AppState, AuthConfig, ProfileState};

use crate::middleware::identity_middleware;

/// Router of the inventory service. Everything but `/health` requires a
/// verified identity.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(events::routes())
        .merge(packages::routes())
        .merge(tickets::routes())
        .layer(from_fn_with_state(state.auth.clone(), identity_middleware));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router of the client-profile service.
pub fn profile_app(state: ProfileState) -> Router {
    let protected = profile::routes()
        .layer(from_fn_with_state(state.auth.clone(), identity_middleware));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}
