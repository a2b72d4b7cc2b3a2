use crate::error::TokenError;
use crate::http::AppState;
use crate::jwt::TokenCodec;
use crate::rotation::record::TokenPair;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

#[derive(Debug, Deserialize)]
pub struct TokenPairRequest {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct UserRequest {
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

pub async fn health() -> &'static str {
    "App is running"
}

/// GET /auth/user/{user_id} — issue a fresh credential pair.
pub async fn issue_tokens(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Response {
    if user_id.trim().is_empty() {
        return bad_request("User id is empty");
    }

    match state.rotator.issue_pair(&user_id).await {
        Ok(pair) => pair_response(&pair),
        Err(err) => error_response(err),
    }
}

/// POST /auth/tokens/refresh — rotate a presented credential pair.
pub async fn refresh_tokens(
    State(state): State<AppState>,
    Json(req): Json<TokenPairRequest>,
) -> Response {
    if req.access_token.is_empty() {
        return bad_request("Access token is empty");
    }
    if req.refresh_token.is_empty() {
        return bad_request("Refresh token is empty");
    }

    match state.rotator.rotate(&req.access_token, &req.refresh_token).await {
        Ok(pair) => pair_response(&pair),
        Err(err) => error_response(err),
    }
}

/// DELETE /auth/refresh — revoke the presented refresh credential.
pub async fn revoke_refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> Response {
    if req.refresh_token.is_empty() {
        return bad_request("Refresh token is empty");
    }

    let claims = match TokenCodec::decode_transport(&req.refresh_token)
        .and_then(|signed| state.codec.verify_refresh(&signed))
    {
        Ok(claims) => claims,
        Err(err) => return error_response(err),
    };

    match state.rotator.revoke_one(&claims.user_id, &claims.id).await {
        Ok(()) => message_response("Refresh token was successfully revoked"),
        Err(err) => error_response(err),
    }
}

/// DELETE /auth/user/refresh — revoke every refresh credential of a user.
pub async fn revoke_user_tokens(
    State(state): State<AppState>,
    Json(req): Json<UserRequest>,
) -> Response {
    if req.user_id.is_empty() {
        return bad_request("User id is empty");
    }

    match state.rotator.revoke_all_for_user(&req.user_id).await {
        Ok(count) => {
            message_response(format!("{} refresh tokens were successfully revoked", count))
        }
        Err(err) => error_response(err),
    }
}

fn pair_response(pair: &TokenPair) -> Response {
    let body = TokenPairResponse {
        access_token: pair.access.token.clone(),
        refresh_token: pair.refresh_token.clone(),
    };
    (StatusCode::OK, Json(json!({ "data": body }))).into_response()
}

fn message_response(message: impl Into<String>) -> Response {
    (StatusCode::OK, Json(json!({ "message": message.into() }))).into_response()
}

fn bad_request(message: &str) -> Response {
    error_body(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
}

/// Maps the core error taxonomy onto status classes: unknown user or
/// unknown/consumed credential render as 404; signature, binding, and
/// store failures render as 500.
fn error_response(err: TokenError) -> Response {
    let status = match &err {
        TokenError::UnknownOrConsumed
        | TokenError::UserNotFound
        | TokenError::RecordNotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    // Operational failures get logged in full but rendered opaque.
    let message = match &err {
        TokenError::Persistence(_)
        | TokenError::Hashing(_)
        | TokenError::Config(_)
        | TokenError::Internal(_) => {
            error!(code = err.code(), "{}", err);
            "Internal error".to_string()
        }
        other => other.to_string(),
    };

    error_body(status, err.code(), &message)
}

fn error_body(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({ "error": { "code": code, "message": message } })),
    )
        .into_response()
}
