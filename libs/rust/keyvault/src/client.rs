//! Vault HTTP client.

use crate::{
    config::KeyVaultConfig,
    error::{VaultError, VaultResult},
    provider::SecretStore,
    secrets::{SecretBundle, SecretListResponse, SecretSummary, SecretValue, VaultErrorResponse},
};
use async_trait::async_trait;
use identity_client::TokenCredential;
use portal_common::{HttpConfig, build_http_client};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Read-only Key Vault client.
///
/// The vault base URL is derived from the vault name on every call;
/// access tokens come from the supplied [`TokenCredential`]. The client
/// performs no writes against the vault.
pub struct KeyVaultClient {
    config: KeyVaultConfig,
    http: Client,
    credential: Arc<dyn TokenCredential>,
}

impl KeyVaultClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Http`] if the HTTP client cannot be built.
    pub fn new(config: KeyVaultConfig, credential: Arc<dyn TokenCredential>) -> VaultResult<Self> {
        let http = build_http_client(&HttpConfig::default().with_timeout(config.timeout))
            .map_err(VaultError::Http)?;

        Ok(Self {
            config,
            http,
            credential,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> VaultResult<T> {
        let token = self
            .credential
            .get_token(&self.config.token_scope)
            .await
            .map_err(|e| VaultError::auth_failed(e.to_string()))?;

        let response = self
            .http
            .get(url)
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(|e| VaultError::unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(VaultError::from);
        }

        let message = provider_message(response).await;
        Err(match status.as_u16() {
            401 => VaultError::auth_failed(message),
            403 => VaultError::forbidden(message),
            404 => VaultError::not_found(message),
            429 => VaultError::throttled(message),
            _ => VaultError::unavailable(format!("Status {status}: {message}")),
        })
    }
}

#[async_trait]
impl SecretStore for KeyVaultClient {
    #[instrument(skip(self), fields(vault = vault_name))]
    async fn list_secrets(&self, vault_name: &str) -> VaultResult<HashSet<SecretSummary>> {
        debug!(vault_name, "Listing secrets");

        let mut summaries = HashSet::new();
        let mut url = format!(
            "{}/secrets?api-version={}",
            self.config.vault_url(vault_name),
            self.config.api_version
        );

        loop {
            // nextLink already carries its own query string.
            let page: SecretListResponse = self.get_json(&url).await?;

            for item in &page.value {
                match SecretSummary::from_id(&item.id) {
                    Some(summary) => {
                        summaries.insert(summary);
                    }
                    None => warn!(id = %item.id, "Skipping unparseable secret id"),
                }
            }

            match page.next_link {
                Some(next) => url = next,
                None => break,
            }
        }

        debug!(count = summaries.len(), "Listed secrets");
        Ok(summaries)
    }

    #[instrument(skip(self), fields(vault = vault_name, secret = name))]
    async fn get_secret(&self, vault_name: &str, name: &str) -> VaultResult<SecretValue> {
        debug!(vault_name, name, "Getting secret");

        let url = format!(
            "{}/secrets/{name}?api-version={}",
            self.config.vault_url(vault_name),
            self.config.api_version
        );
        let bundle: SecretBundle = self.get_json(&url).await?;

        let name = SecretSummary::from_id(&bundle.id)
            .map_or_else(|| name.to_string(), |summary| summary.name);

        Ok(SecretValue::new(
            name,
            secrecy::ExposeSecret::expose_secret(&bundle.value),
        ))
    }
}

/// Extract the provider's message from an error response body.
async fn provider_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    serde_json::from_str::<VaultErrorResponse>(&body)
        .ok()
        .and_then(|parsed| parsed.error.message)
        .unwrap_or_else(|| format!("Status {status}: {body}"))
}
