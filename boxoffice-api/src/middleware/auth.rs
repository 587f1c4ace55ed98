use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use boxoffice_core::{Identity, OwnerId, Role};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AuthConfig;

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims minted by the identity service. `uid` is the subject's stable
/// numeric owner id.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub uid: i64,
    pub exp: usize,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Identity::new(claims.sub, claims.role, OwnerId(claims.uid))
    }
}

/// The raw bearer token of the current request, kept so it can be forwarded
/// to the inventory service.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

// ============================================================================
// Identity Middleware
// ============================================================================

pub async fn identity_middleware(
    State(auth): State<AuthConfig>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::AuthenticationError("missing bearer token".to_string()))?
        .to_string();

    let token_data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        AppError::AuthenticationError("invalid bearer token".to_string())
    })?;

    req.extensions_mut().insert(Identity::from(token_data.claims));
    req.extensions_mut().insert(BearerToken(token));

    Ok(next.run(req).await)
}

// ============================================================================
// Extractors
// ============================================================================

/// Any verified caller.
pub struct Caller(pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(Caller)
            .ok_or_else(|| AppError::AuthenticationError("no verified identity".to_string()))
    }
}

/// A verified caller holding the `owner-event` role.
pub struct EventOwner(pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for EventOwner {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Caller(identity) = Caller::from_request_parts(parts, state).await?;
        if !identity.has_role(Role::OwnerEvent) {
            return Err(AppError::AuthorizationError(
                "role owner-event required".to_string(),
            ));
        }
        Ok(EventOwner(identity))
    }
}
