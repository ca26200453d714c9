//! Process configuration, loaded once at startup and passed through
//! application state. Handlers never read the environment directly.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Origin allowed by CORS, normally the front-end dev server.
    pub frontend_url: String,
    pub auth: AuthConfig,
    pub provider: ProviderConfig,
    pub smtp: SmtpConfig,
}

/// Session token configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiry_days: i64,
}

/// RétroBus identity API configuration. The API key authorizes this service
/// to the identity API; member passwords are only forwarded, never stored.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Implicit TLS instead of STARTTLS.
    pub secure: bool,
    pub user: String,
    pub password: String,
    /// Fallback `From` address when a message carries none.
    pub from_email: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let smtp_port: u16 = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .context("SMTP_PORT must be a valid number")?;

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5174".to_string()),
            auth: AuthConfig {
                jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
                token_expiry_days: env::var("TOKEN_EXPIRY_DAYS")
                    .unwrap_or_else(|_| "7".to_string())
                    .parse()
                    .context("TOKEN_EXPIRY_DAYS must be a valid number")?,
            },
            provider: ProviderConfig {
                base_url: env::var("RETROBUS_API_URL").context("RETROBUS_API_URL must be set")?,
                api_key: env::var("RETROBUS_API_KEY").context("RETROBUS_API_KEY must be set")?,
                timeout: Duration::from_secs(
                    env::var("RETROBUS_API_TIMEOUT_SECS")
                        .unwrap_or_else(|_| "10".to_string())
                        .parse()
                        .context("RETROBUS_API_TIMEOUT_SECS must be a valid number")?,
                ),
            },
            smtp: SmtpConfig {
                host: env::var("SMTP_HOST").context("SMTP_HOST must be set")?,
                port: smtp_port,
                secure: env::var("SMTP_SECURE").unwrap_or_default() == "true" || smtp_port == 465,
                user: env::var("SMTP_USER").context("SMTP_USER must be set")?,
                password: env::var("SMTP_PASSWORD").context("SMTP_PASSWORD must be set")?,
                from_email: env::var("SMTP_FROM_EMAIL").ok(),
            },
        })
    }
}
