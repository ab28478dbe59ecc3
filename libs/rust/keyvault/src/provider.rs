//! Generic secret store trait.

use crate::error::VaultResult;
use crate::secrets::{SecretSummary, SecretValue};
use async_trait::async_trait;
use std::collections::HashSet;

/// Read-only access to the secrets of a logically named vault.
///
/// Implemented by [`crate::KeyVaultClient`] for production use; the
/// orchestration layer depends on this trait so tests can substitute a
/// counting double.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// List the identifiers of all secrets visible under `vault_name`.
    async fn list_secrets(&self, vault_name: &str) -> VaultResult<HashSet<SecretSummary>>;

    /// Retrieve one named secret from `vault_name`.
    async fn get_secret(&self, vault_name: &str, name: &str) -> VaultResult<SecretValue>;
}
