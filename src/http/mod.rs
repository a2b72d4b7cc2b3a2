//! HTTP surface. Thin routing and JSON shaping over the rotation core;
//! all lifecycle invariants live below this layer.

pub mod handlers;

use crate::jwt::TokenCodec;
use crate::rotation::TokenRotator;
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub rotator: Arc<TokenRotator>,
    pub codec: Arc<TokenCodec>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/auth/user/:user_id", get(handlers::issue_tokens))
        .route("/auth/tokens/refresh", post(handlers::refresh_tokens))
        .route("/auth/refresh", delete(handlers::revoke_refresh_token))
        .route("/auth/user/refresh", delete(handlers::revoke_user_tokens))
        .with_state(state)
}
