//! Client for the RétroBus identity API.
//!
//! The identity API owns member credentials and profile data; this service
//! only forwards a normalized credential pair and repackages the answer. The
//! call is authorized by a static service key, never by member credentials.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::ProviderConfig;

/// Member record returned by the identity API on successful authentication.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The identity API answered and explicitly rejected the credentials.
    #[error("credentials rejected")]
    Rejected,

    /// Transport failure, non-2xx status, or a malformed response body.
    #[error("identity API unavailable")]
    Unavailable(#[source] anyhow::Error),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, ProviderError>;
}

/// Production provider talking to the identity API over HTTPS with a bounded
/// per-request timeout.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpIdentityProvider {
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[derive(serde::Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginReply {
    success: bool,
    user: Option<ProviderUser>,
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, ProviderError> {
        let response = self
            .client
            .post(format!("{}/auth/login", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&LoginBody { email, password })
            .send()
            .await
            .map_err(|e| {
                ProviderError::Unavailable(anyhow::anyhow!("identity request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Unavailable(anyhow::anyhow!(
                "identity API returned {}",
                status
            )));
        }

        let reply: LoginReply = response.json().await.map_err(|e| {
            ProviderError::Unavailable(anyhow::anyhow!("invalid identity response: {}", e))
        })?;

        if !reply.success {
            return Err(ProviderError::Rejected);
        }

        reply.user.ok_or_else(|| {
            ProviderError::Unavailable(anyhow::anyhow!("identity response missing user"))
        })
    }
}
