use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::Utc;
use tower_http::cors::{AllowOrigin, CorsLayer};

mod auth;
mod config;
pub mod error;
mod handlers;
mod services;

use auth::provider::{HttpIdentityProvider, IdentityProvider};
use config::{AppConfig, AuthConfig};
use error::ErrorResponse;
use services::mailer::{Mailer, SmtpMailer};

/// Shared application state handed to every handler. Built once at startup;
/// nothing in it is mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub auth_config: AuthConfig,
    pub identity: Arc<dyn IdentityProvider>,
    pub mailer: Arc<dyn Mailer>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    let identity = Arc::new(HttpIdentityProvider::new(&config.provider)?);
    let mailer = Arc::new(SmtpMailer::new(&config.smtp)?);
    mailer.verify_connection().await;

    let state = AppState {
        auth_config: config.auth.clone(),
        identity,
        mailer,
    };

    let app = app(state, &config.frontend_url);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("RétroBus Mail API listening on {}", addr);
    tracing::info!("Allowed frontend origin: {}", config.frontend_url);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn app(state: AppState, frontend_url: &str) -> Router {
    let protected = Router::new()
        .route("/api/auth/profile", get(auth::auth_profile))
        // Mail routes
        .route("/api/mail/inbox", get(handlers::mail::inbox))
        .route("/api/mail/email/:id", get(handlers::mail::get_email))
        .route("/api/mail/email/:id", delete(handlers::mail::delete_email))
        .route("/api/mail/send", post(handlers::mail::send_email))
        .route("/api/mail/reply", post(handlers::mail::reply_email))
        .route("/api/mail/sync", post(handlers::mail::sync_mailbox))
        // Template routes
        .route("/api/templates", get(handlers::templates::list_templates))
        .route("/api/templates", post(handlers::templates::create_template))
        .route("/api/templates/:id", get(handlers::templates::get_template))
        .route("/api/templates/:id", put(handlers::templates::update_template))
        .route(
            "/api/templates/:id",
            delete(handlers::templates::delete_template),
        )
        .route_layer(from_fn_with_state(state.clone(), auth::require_session));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/login", post(auth::auth_login))
        .route("/api/auth/verify", post(auth::auth_verify))
        .merge(protected)
        .fallback(not_found)
        .layer(build_cors_layer(frontend_url))
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Route not found".to_string(),
            details: None,
        }),
    )
}

/// Build a CORS layer restricted to the configured front-end origin.
///
/// Credentials are allowed, so the origin has to be exact; if it does not
/// parse, fall back to permissive CORS rather than refusing to start.
fn build_cors_layer(frontend_url: &str) -> CorsLayer {
    match frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(origin))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
        Err(_) => {
            tracing::warn!(
                "FRONTEND_URL is not a valid origin, using permissive CORS (not recommended for production)"
            );
            CorsLayer::permissive()
        }
    }
}
