//! Authentication HTTP handlers.

use axum::{extract::State, http::HeaderMap, Extension, Json};
use serde::Serialize;
use validator::Validate;

use shared_types::{LoginRequest, LoginResponse, PublicUser};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

use super::jwt;
use super::middleware::bearer_token;
use super::provider::ProviderError;
use super::types::Claims;

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: Claims,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: Claims,
}

/// Authenticate a member against the RétroBus identity API and mint a
/// session token.
///
/// Malformed credentials are rejected here, before the identity API is ever
/// contacted. The response carries the public user projection; the `role`
/// claim stays inside the token.
pub async fn auth_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let credentials = payload.normalized();
    credentials
        .validate()
        .map_err(|e| ApiError::Validation(violated_fields(&e)))?;

    let user = state
        .identity
        .authenticate(&credentials.email, &credentials.password)
        .await
        .map_err(|e| match e {
            ProviderError::Rejected => ApiError::InvalidCredentials,
            ProviderError::Unavailable(source) => ApiError::Upstream(source),
        })?;

    let token = jwt::create_token(&state.auth_config, &user)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("failed to create session token: {}", e)))?;

    tracing::info!("Successful login for: {}", user.email);

    Ok(Json(LoginResponse {
        success: true,
        token,
        user: PublicUser {
            id: user.id,
            email: user.email,
            name: user.name,
        },
    }))
}

fn violated_fields(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| field.to_string())
        .collect();
    fields.sort();
    fields
}

/// Check a previously issued session token and return its claims.
pub async fn auth_verify(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<VerifyResponse>> {
    let token = bearer_token(&headers).ok_or(ApiError::MissingToken)?;
    let claims =
        jwt::validate_token(&state.auth_config, &token).map_err(|_| ApiError::InvalidToken)?;

    Ok(Json(VerifyResponse {
        valid: true,
        user: claims,
    }))
}

/// Profile of the connected member, from the verified session context.
pub async fn auth_profile(Extension(claims): Extension<Claims>) -> Json<ProfileResponse> {
    Json(ProfileResponse { user: claims })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::provider::ProviderUser;
    use crate::auth::require_session;
    use crate::test_support::{
        test_auth_config, test_state_with_identity, test_user, ProviderScript,
        ScriptedIdentityProvider,
    };
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        middleware::from_fn_with_state,
        routing::{get, post},
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    fn auth_app(identity: Arc<ScriptedIdentityProvider>) -> Router {
        let state = test_state_with_identity(identity);

        let protected = Router::new()
            .route("/api/auth/profile", get(auth_profile))
            .route_layer(from_fn_with_state(state.clone(), require_session));

        Router::new()
            .route("/api/auth/login", post(auth_login))
            .route("/api/auth/verify", post(auth_verify))
            .merge(protected)
            .with_state(state)
    }

    async fn send_json(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
        auth_header: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = auth_header {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).expect("body")))
                .expect("request should build"),
            None => builder.body(Body::empty()).expect("request should build"),
        };

        let response = app.oneshot(request).await.expect("request should not fail");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_login_rejects_malformed_email_without_identity_call() {
        let identity = ScriptedIdentityProvider::new(ProviderScript::Accept(test_user()));
        let app = auth_app(identity.clone());

        let (status, body) = send_json(
            app,
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({"email": "not-an-email", "password": "secret"})),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        assert!(body["details"].as_str().expect("details").contains("email"));
        assert_eq!(identity.call_count(), 0);
    }

    #[tokio::test]
    async fn test_login_rejects_blank_password_without_identity_call() {
        let identity = ScriptedIdentityProvider::new(ProviderScript::Accept(test_user()));
        let app = auth_app(identity.clone());

        let (status, body) = send_json(
            app,
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({"email": "user@example.com", "password": "  "})),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"].as_str().expect("details").contains("password"));
        assert_eq!(identity.call_count(), 0);
    }

    #[tokio::test]
    async fn test_login_forwards_normalized_credentials() {
        let identity = ScriptedIdentityProvider::new(ProviderScript::Accept(test_user()));
        let app = auth_app(identity.clone());

        let (status, _) = send_json(
            app,
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({"email": "  User@Example.COM ", "password": " secret "})),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let seen = identity.seen_credentials();
        assert_eq!(seen, vec![("user@example.com".to_string(), "secret".to_string())]);
    }

    #[tokio::test]
    async fn test_login_returns_token_and_redacted_user() {
        let identity = ScriptedIdentityProvider::new(ProviderScript::Accept(test_user()));
        let app = auth_app(identity);

        let (status, body) = send_json(
            app,
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({"email": "user@example.com", "password": "secret"})),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(
            body["user"],
            serde_json::json!({"id": "42", "email": "user@example.com", "name": "User"})
        );
        assert!(body["user"].get("role").is_none());

        let token = body["token"].as_str().expect("token should be present");
        let claims = jwt::validate_token(&test_auth_config(), token).expect("token should verify");
        assert_eq!(claims.id, "42");
        assert_eq!(claims.role, "member");
    }

    #[tokio::test]
    async fn test_login_maps_rejection_to_invalid_credentials() {
        let identity = ScriptedIdentityProvider::new(ProviderScript::Reject);
        let app = auth_app(identity);

        let (status, body) = send_json(
            app,
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({"email": "user@example.com", "password": "wrong"})),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({"error": "Invalid credentials"}));
    }

    #[tokio::test]
    async fn test_login_hides_upstream_failure_detail() {
        let identity = ScriptedIdentityProvider::new(ProviderScript::Unavailable);
        let app = auth_app(identity);

        let (status, body) = send_json(
            app,
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({"email": "user@example.com", "password": "secret"})),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"error": "Authentication failed"}));
    }

    #[tokio::test]
    async fn test_verify_round_trips_login_claims() {
        let identity = ScriptedIdentityProvider::new(ProviderScript::Accept(test_user()));
        let app = auth_app(identity);

        let (_, login_body) = send_json(
            app.clone(),
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({"email": "user@example.com", "password": "secret"})),
            None,
        )
        .await;
        let token = login_body["token"].as_str().expect("token");

        let (status, body) = send_json(
            app,
            "POST",
            "/api/auth/verify",
            None,
            Some(&format!("Bearer {}", token)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], true);
        assert_eq!(body["user"]["id"], "42");
        assert_eq!(body["user"]["email"], "user@example.com");
        assert_eq!(body["user"]["name"], "User");
        assert_eq!(body["user"]["role"], "member");
    }

    #[tokio::test]
    async fn test_verify_without_token() {
        let identity = ScriptedIdentityProvider::new(ProviderScript::Reject);
        let app = auth_app(identity);

        let (status, body) = send_json(app, "POST", "/api/auth/verify", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({"error": "No token provided"}));
    }

    #[tokio::test]
    async fn test_verify_with_garbage_token() {
        let identity = ScriptedIdentityProvider::new(ProviderScript::Reject);
        let app = auth_app(identity);

        let (status, body) = send_json(
            app,
            "POST",
            "/api/auth/verify",
            None,
            Some("Bearer not.a.token"),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({"error": "Invalid token"}));
    }

    #[tokio::test]
    async fn test_profile_returns_session_claims() {
        let identity = ScriptedIdentityProvider::new(ProviderScript::Reject);
        let app = auth_app(identity);

        let user = ProviderUser {
            id: "7".to_string(),
            email: "president@retrobus-essonne.fr".to_string(),
            name: "Présidente".to_string(),
            role: "bureau".to_string(),
        };
        let token = jwt::create_token(&test_auth_config(), &user).expect("token");

        let (status, body) = send_json(
            app,
            "GET",
            "/api/auth/profile",
            None,
            Some(&format!("Bearer {}", token)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["id"], "7");
        assert_eq!(body["user"]["role"], "bureau");
    }

    #[tokio::test]
    async fn test_profile_denied_without_token() {
        let identity = ScriptedIdentityProvider::new(ProviderScript::Reject);
        let app = auth_app(identity);

        let (status, body) = send_json(app, "GET", "/api/auth/profile", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({"error": "No token provided"}));
    }
}
