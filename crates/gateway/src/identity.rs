//! Bearer-token verification against the external identity provider.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity the provider attests for a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifiedIdentity {
    pub email: String,
}

/// Failures surfaced while verifying a bearer token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity provider rejected the token")]
    Rejected,
    #[error("identity provider transport failure: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchanges a bearer token for the identity it attests. `Rejected` means
    /// the provider refused the token; `Transport` covers everything that
    /// kept a verdict from being reached.
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError>;
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

/// Client for the identity provider's verification endpoint.
pub struct HttpIdentityProvider {
    http: reqwest::Client,
    verify_url: String,
}

impl HttpIdentityProvider {
    pub fn new(verify_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            verify_url: verify_url.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let response = self
            .http
            .post(&self.verify_url)
            .json(&VerifyRequest { token })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_failure(status));
        }

        Ok(response.json::<VerifiedIdentity>().await?)
    }
}

/// A 5xx from the provider is an outage, not a verdict on the token.
fn classify_failure(status: StatusCode) -> AuthError {
    if status.is_server_error() {
        AuthError::Transport(format!("http status {status}"))
    } else {
        AuthError::Rejected
    }
}
