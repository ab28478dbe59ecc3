//! Profile-graph client.
//!
//! Retrieves the signed-in user's profile and photo from the graph API.
//! Failures here are [`IdentityError`]s and are meant to be re-raised,
//! not degraded into view messages.

use crate::credential::TokenCredential;
use crate::error::{IdentityError, IdentityResult};
use base64::{Engine, engine::general_purpose::STANDARD};
use portal_common::{HttpConfig, build_http_client};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Graph client configuration.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Graph API base URL
    pub base_url: String,
    /// Permission scope requested for graph tokens
    pub scope: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: "https://graph.microsoft.com/v1.0".to_string(),
            scope: "User.Read".to_string(),
        }
    }
}

impl GraphConfig {
    /// Set the graph base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the permission scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }
}

/// Subset of the user profile shown by the portal.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Object id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// User principal name
    #[serde(default)]
    pub user_principal_name: Option<String>,
    /// Primary mail address
    #[serde(default)]
    pub mail: Option<String>,
    /// Job title
    #[serde(default)]
    pub job_title: Option<String>,
}

/// Profile-graph HTTP client.
pub struct GraphClient {
    config: GraphConfig,
    http: reqwest::Client,
    credential: Arc<dyn TokenCredential>,
}

impl GraphClient {
    /// Create a new graph client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: GraphConfig, credential: Arc<dyn TokenCredential>) -> IdentityResult<Self> {
        let http = build_http_client(&HttpConfig::default())?;

        Ok(Self {
            config,
            http,
            credential,
        })
    }

    async fn get(&self, path: &str) -> IdentityResult<reqwest::Response> {
        let token = self.credential.get_token(&self.config.scope).await?;
        let url = format!("{}{path}", self.config.base_url);

        let response = self.http.get(&url).bearer_auth(token.expose()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::ProfileRequest {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// Retrieve the signed-in user's profile.
    #[instrument(skip(self))]
    pub async fn get_current_user(&self) -> IdentityResult<UserProfile> {
        debug!("Fetching current user profile");

        self.get("/me")
            .await?
            .json()
            .await
            .map_err(|e| IdentityError::parse(e.to_string()))
    }

    /// Retrieve the signed-in user's photo, base64-encoded for the view.
    #[instrument(skip(self))]
    pub async fn get_current_user_photo(&self) -> IdentityResult<String> {
        debug!("Fetching current user photo");

        let bytes = self.get("/me/photo/$value").await?.bytes().await?;
        Ok(STANDARD.encode(bytes))
    }
}
