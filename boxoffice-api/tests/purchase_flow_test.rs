mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use axum::Router;
use boxoffice_api::{app, profile_app, ProfileState};
use boxoffice_profile::{HttpValidatorClient, MemoryProfileStore, PurchaseOrchestrator};
use common::{auth, client, inventory_state, owner, send};
use serde_json::json;

/// Serves the inventory router on an ephemeral port and returns it alongside
/// a profile router whose validator points at that port.
async fn services() -> (Router, Router) {
    let inventory = app(inventory_state());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let served = inventory.clone();
    tokio::spawn(async move {
        axum::serve(listener, served).await.unwrap();
    });

    (inventory, profile_for(&format!("http://{}", addr)))
}

fn profile_for(base_url: &str) -> Router {
    let validator = HttpValidatorClient::new(base_url, Duration::from_secs(2)).unwrap();
    let orchestrator = PurchaseOrchestrator::new(Arc::new(validator), Arc::new(MemoryProfileStore::new()));
    profile_app(ProfileState {
        orchestrator: Arc::new(orchestrator),
        auth: auth(),
    })
}

async fn buy_event_ticket(inventory: &Router, buyer: &str) -> String {
    let (_, event) = send(
        inventory,
        Method::POST,
        "/events",
        Some(&owner(1)),
        Some(json!({ "name": "Untold", "location": "Cluj", "seats": 10 })),
    )
    .await;
    let (status, ticket) = send(
        inventory,
        Method::POST,
        "/tickets",
        Some(buyer),
        Some(json!({ "event_id": event["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    ticket["code"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_issued_ticket_lands_on_profile() {
    let (inventory, profile) = services().await;
    let buyer = client("ana@example.com");
    let code = buy_event_ticket(&inventory, &buyer).await;

    let snapshot = json!({ "kind": "event", "code": code, "name": "Untold", "location": "Cluj" });
    let (status, body) = send(&profile, Method::POST, "/clients/me/tickets", Some(&buyer), Some(snapshot.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "added": true, "code": code }));

    let (status, body) = send(&profile, Method::GET, "/clients/me/tickets", Some(&buyer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "tickets": [snapshot.clone()] }));

    let (status, details) = send(
        &profile,
        Method::GET,
        &format!("/clients/me/tickets/{}/details", code),
        Some(&buyer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details, json!({ "code": code, "valid": true, "ticket": snapshot }));
}

#[tokio::test]
async fn test_second_attach_is_rejected() {
    let (inventory, profile) = services().await;
    let buyer = client("ana@example.com");
    let code = buy_event_ticket(&inventory, &buyer).await;
    let snapshot = json!({ "kind": "event", "code": code, "name": "Untold" });

    let (status, _) = send(&profile, Method::POST, "/clients/me/tickets", Some(&buyer), Some(snapshot.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&profile, Method::POST, "/clients/me/tickets", Some(&buyer), Some(snapshot)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_ATTACHED");
}

#[tokio::test]
async fn test_forged_code_is_invalid_and_not_stored() {
    let (_, profile) = services().await;
    let buyer = client("ana@example.com");

    let (status, body) = send(
        &profile,
        Method::POST,
        "/clients/me/tickets",
        Some(&buyer),
        Some(json!({ "kind": "package", "code": "deadbeef0000", "name": "Weekend" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "TICKET_INVALID");

    let (_, body) = send(&profile, Method::GET, "/clients/me/tickets", Some(&buyer), None).await;
    assert_eq!(body, json!({ "tickets": [] }));
}

#[tokio::test]
async fn test_down_validator_is_unavailable_not_invalid() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let profile = profile_for(&format!("http://{}", addr));
    let buyer = client("ana@example.com");

    let (status, body) = send(
        &profile,
        Method::POST,
        "/clients/me/tickets",
        Some(&buyer),
        Some(json!({ "kind": "event", "code": "abcdef123456", "name": "Untold" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "VALIDATOR_UNAVAILABLE");

    let (_, body) = send(&profile, Method::GET, "/clients/me/tickets", Some(&buyer), None).await;
    assert_eq!(body, json!({ "tickets": [] }));
}

#[tokio::test]
async fn test_profiles_are_per_subject() {
    let (inventory, profile) = services().await;
    let ana = client("ana@example.com");
    let code = buy_event_ticket(&inventory, &ana).await;

    send(
        &profile,
        Method::POST,
        "/clients/me/tickets",
        Some(&ana),
        Some(json!({ "kind": "event", "code": code, "name": "Untold" })),
    )
    .await;

    let bob = client("bob@example.com");
    let (_, body) = send(&profile, Method::GET, "/clients/me/tickets", Some(&bob), None).await;
    assert_eq!(body, json!({ "tickets": [] }));

    let (status, body) = send(
        &profile,
        Method::GET,
        &format!("/clients/me/tickets/{}/details", code),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_profile_requires_identity() {
    let (_, profile) = services().await;
    let (status, _) = send(&profile, Method::GET, "/clients/me/tickets", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_snapshot_without_code_is_invalid_request() {
    let (_, profile) = services().await;
    let buyer = client("ana@example.com");

    let (status, body) = send(
        &profile,
        Method::POST,
        "/clients/me/tickets",
        Some(&buyer),
        Some(json!({ "kind": "event", "name": "Untold" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");
}
