//! Session authentication gateway.
//!
//! This module provides:
//! - the login flow bridging the RétroBus identity API to a locally-issued
//!   session token
//! - session token creation and validation
//! - `require_session` middleware for protecting routes

mod handlers;
pub(crate) mod jwt;
mod middleware;
pub mod provider;
pub mod types;

pub use handlers::{auth_login, auth_profile, auth_verify};
pub use middleware::require_session;
