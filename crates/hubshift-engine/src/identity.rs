//! Identity-provider verification
//!
//! Sign-in hands the engine an opaque credential from the client (a Google
//! ID token). An `IdentityVerifier` turns it into a verified identity or
//! refuses it.

use async_trait::async_trait;
use hubshift_core::errors::HubError;
use serde::Deserialize;
use std::time::Duration;

/// Google's token introspection endpoint
pub const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Identity asserted by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Provider-scoped subject id (Google `sub`)
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// # Errors
    ///
    /// `IdentityRejected` for a credential the provider refuses,
    /// `IdentityProviderUnavailable` when the provider cannot be reached.
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, HubError>;
}

/// Verifies Google ID tokens against the tokeninfo endpoint
#[derive(Debug, Clone)]
pub struct GoogleTokenVerifier {
    client: reqwest::Client,
    client_id: String,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    email: Option<String>,
    /// Google sends `"true"`; accept a JSON bool too
    #[serde(default)]
    email_verified: Option<serde_json::Value>,
    name: Option<String>,
}

impl TokenInfo {
    fn email_verified(&self) -> bool {
        match &self.email_verified {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => s == "true",
            _ => false,
        }
    }
}

impl GoogleTokenVerifier {
    pub fn new(client_id: impl Into<String>) -> Result<Self, HubError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| HubError::Internal {
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            client_id: client_id.into(),
            endpoint: GOOGLE_TOKENINFO_URL.to_string(),
        })
    }

    /// Point at a different tokeninfo endpoint (local fakes)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn check(&self, info: TokenInfo) -> Result<VerifiedIdentity, HubError> {
        if info.aud != self.client_id {
            return Err(HubError::IdentityRejected {
                reason: "token was issued for a different client".to_string(),
            });
        }
        if !info.email_verified() {
            return Err(HubError::IdentityRejected {
                reason: "email address is not verified".to_string(),
            });
        }
        let email = info.email.clone().ok_or_else(|| HubError::IdentityRejected {
            reason: "token carries no email address".to_string(),
        })?;
        Ok(VerifiedIdentity {
            subject: info.sub,
            email,
            name: info.name,
        })
    }
}

#[async_trait]
impl IdentityVerifier for GoogleTokenVerifier {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, HubError> {
        if credential.trim().is_empty() {
            return Err(HubError::IdentityRejected {
                reason: "empty credential".to_string(),
            });
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("id_token", credential)])
            .send()
            .await
            .map_err(|e| HubError::IdentityProviderUnavailable {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_client_error() {
            return Err(HubError::IdentityRejected {
                reason: format!("provider returned {}", status),
            });
        }
        if !status.is_success() {
            return Err(HubError::IdentityProviderUnavailable {
                message: format!("provider returned {}", status),
            });
        }

        let info: TokenInfo =
            response
                .json()
                .await
                .map_err(|e| HubError::IdentityProviderUnavailable {
                    message: format!("unreadable tokeninfo response: {}", e),
                })?;
        tracing::debug!(subject = %info.sub, "identity token introspected");
        self.check(info)
    }
}

/// Used when no client id is configured; every sign-in is refused
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledVerifier;

#[async_trait]
impl IdentityVerifier for DisabledVerifier {
    async fn verify(&self, _credential: &str) -> Result<VerifiedIdentity, HubError> {
        Err(HubError::IdentityProviderUnavailable {
            message: "Google sign-in is not configured".to_string(),
        })
    }
}
