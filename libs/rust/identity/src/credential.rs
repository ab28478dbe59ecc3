//! Access-token acquisition.
//!
//! Tokens are requested with the OAuth2 client-credentials grant and
//! reused until close to expiry, one cache slot per scope. Authorization
//! decisions are never cached here; only the identity session is.

use crate::error::{IdentityError, IdentityResult};
use async_trait::async_trait;
use portal_common::{HttpConfig, build_http_client};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Expiry margin subtracted from the provider-reported token lifetime.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// An acquired access token.
#[derive(Clone)]
pub struct AccessToken {
    token: SecretString,
    expires_at: Instant,
}

impl AccessToken {
    /// Create a token expiring after `expires_in`.
    #[must_use]
    pub fn new(token: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            token: SecretString::from(token.into()),
            expires_at: Instant::now() + expires_in,
        }
    }

    /// Expose the raw bearer token.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.token.expose_secret()
    }

    /// Whether the token has passed its expiry.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Supplier of on-demand access tokens, scoped per permission string.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Acquire a token for the given scope.
    async fn get_token(&self, scope: &str) -> IdentityResult<AccessToken>;
}

/// Client-credentials flow against the identity provider's token
/// endpoint (`{authority}/{tenant}/oauth2/v2.0/token`).
pub struct ClientSecretCredential {
    authority: String,
    tenant_id: String,
    client_id: String,
    client_secret: SecretString,
    http: reqwest::Client,
    cache: RwLock<HashMap<String, AccessToken>>,
}

impl ClientSecretCredential {
    /// Default authority host.
    pub const DEFAULT_AUTHORITY: &'static str = "https://login.microsoftonline.com";

    /// Create a credential for the given tenant and client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> IdentityResult<Self> {
        Self::with_authority(Self::DEFAULT_AUTHORITY, tenant_id, client_id, client_secret)
    }

    /// Create a credential against a non-default authority (sovereign
    /// clouds, local test servers).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_authority(
        authority: impl Into<String>,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> IdentityResult<Self> {
        let http = build_http_client(&HttpConfig::default())?;

        Ok(Self {
            authority: authority.into().trim_end_matches('/').to_string(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            http,
            cache: RwLock::new(HashMap::new()),
        })
    }

    #[instrument(skip(self), fields(scope))]
    async fn request_token(&self, scope: &str) -> IdentityResult<AccessToken> {
        let url = format!("{}/{}/oauth2/v2.0/token", self.authority, self.tenant_id);
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
            ("scope", scope),
            ("grant_type", "client_credentials"),
        ];

        let response = self.http.post(&url).form(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::TokenRejected {
                status: status.as_u16(),
                message,
            });
        }

        let payload: TokenResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::parse(e.to_string()))?;

        let lifetime = Duration::from_secs(u64::from(payload.expires_in.unwrap_or(3600)));
        let expires_in = lifetime
            .checked_sub(EXPIRY_MARGIN)
            .unwrap_or(Duration::from_secs(60));

        debug!(lifetime_secs = lifetime.as_secs(), "Acquired access token");
        Ok(AccessToken::new(payload.access_token, expires_in))
    }
}

#[async_trait]
impl TokenCredential for ClientSecretCredential {
    async fn get_token(&self, scope: &str) -> IdentityResult<AccessToken> {
        {
            let cache = self.cache.read().await;
            if let Some(token) = cache.get(scope) {
                if !token.is_expired() {
                    return Ok(token.clone());
                }
            }
        }

        let token = self.request_token(scope).await?;
        self.cache
            .write()
            .await
            .insert(scope.to_string(), token.clone());
        Ok(token)
    }
}

/// Fixed-token credential for tests and local development.
pub struct StaticTokenCredential {
    token: String,
}

impl StaticTokenCredential {
    /// Create a credential that always returns `token`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenCredential for StaticTokenCredential {
    async fn get_token(&self, _scope: &str) -> IdentityResult<AccessToken> {
        Ok(AccessToken::new(
            self.token.clone(),
            Duration::from_secs(3600),
        ))
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u32>,
}
