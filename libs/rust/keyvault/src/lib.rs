//! Key Vault secrets client for secret-portal.
//!
//! Provides read-only secret listing and retrieval against the vault's
//! REST surface, addressed by logical vault name.

pub mod client;
pub mod config;
pub mod error;
pub mod provider;
pub mod secrets;

pub use client::KeyVaultClient;
pub use config::KeyVaultConfig;
pub use error::{VaultError, VaultResult};
pub use provider::SecretStore;
pub use secrets::{SecretSummary, SecretValue};
