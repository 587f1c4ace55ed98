pub mod auth;

pub use auth::{identity_middleware, BearerToken, Caller, Claims, EventOwner};
