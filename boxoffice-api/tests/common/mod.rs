#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use boxoffice_api::{app, AppState, AuthConfig};
use boxoffice_core::MemoryInventoryStore;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";

pub fn auth() -> AuthConfig {
    AuthConfig {
        secret: SECRET.to_string(),
    }
}

pub fn inventory_state() -> AppState {
    AppState::new(Arc::new(MemoryInventoryStore::new()), auth())
}

pub fn inventory_app() -> Router {
    app(inventory_state())
}

pub fn token(sub: &str, role: &str, uid: i64) -> String {
    let claims = json!({
        "sub": sub,
        "role": role,
        "uid": uid,
        "exp": (Utc::now() + Duration::hours(1)).timestamp(),
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

pub fn owner(uid: i64) -> String {
    token(&format!("owner{}@example.com", uid), "owner-event", uid)
}

pub fn client(sub: &str) -> String {
    token(sub, "client", 900)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
