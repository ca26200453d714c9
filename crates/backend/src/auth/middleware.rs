//! Middleware layer guarding authenticated routes.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::AppState;

use super::jwt;

/// Middleware function that requires a valid session token.
///
/// Used with `axum::middleware::from_fn_with_state` to protect routes. On
/// success the decoded claims are attached to the request extensions, so a
/// handler that runs at all can rely on `Extension<Claims>` being present
/// and non-expired.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Some(t) => t,
        None => return ApiError::MissingToken.into_response(),
    };

    let claims = match jwt::validate_token(&state.auth_config, &token) {
        Ok(c) => c,
        Err(_) => return ApiError::InvalidToken.into_response(),
    };

    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub(super) fn bearer_token(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}
