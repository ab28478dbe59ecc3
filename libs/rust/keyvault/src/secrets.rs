//! Secret types and wire structures.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fmt;

/// Identifier of a secret known to exist in the vault. No value.
///
/// Equality and hashing are by name, so listing collects into a set
/// keyed by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SecretSummary {
    /// Secret name
    pub name: String,
}

impl SecretSummary {
    /// Create a summary for the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Parse a summary out of a secret `id` URL
    /// (`https://{vault}.../secrets/{name}[/{version}]`).
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        let (_, rest) = id.split_once("/secrets/")?;
        let name = rest.split('/').next()?;
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name))
    }
}

/// A retrieved secret: identifier plus plaintext value.
///
/// Transient; held only for the duration of one response. The value is
/// wrapped in [`SecretString`] so accidental `Debug` output stays
/// redacted.
#[derive(Clone)]
pub struct SecretValue {
    /// Secret name
    pub name: String,
    value: SecretString,
}

impl SecretValue {
    /// Create a secret value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: SecretString::from(value.into()),
        }
    }

    /// Expose the plaintext value.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretValue")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// One entry of the vault's secret list response.
#[derive(Debug, Deserialize)]
pub struct SecretListItem {
    /// Full secret id URL
    pub id: String,
    /// Secret attributes
    #[serde(default)]
    pub attributes: Option<SecretAttributes>,
}

/// Vault-side secret attributes.
#[derive(Debug, Deserialize)]
pub struct SecretAttributes {
    /// Whether the secret is enabled
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Creation time (unix seconds)
    #[serde(default)]
    pub created: Option<i64>,
    /// Last update time (unix seconds)
    #[serde(default)]
    pub updated: Option<i64>,
}

/// Secret list response page.
#[derive(Debug, Deserialize)]
pub struct SecretListResponse {
    /// Page entries
    #[serde(default)]
    pub value: Vec<SecretListItem>,
    /// Absolute URL of the next page, if any
    #[serde(rename = "nextLink")]
    pub next_link: Option<String>,
}

/// Secret bundle returned by a single-secret read.
#[derive(Debug, Deserialize)]
pub struct SecretBundle {
    /// Full secret id URL
    pub id: String,
    /// Plaintext value
    pub value: SecretString,
}

/// Vault error response body.
#[derive(Debug, Deserialize)]
pub struct VaultErrorResponse {
    /// Error detail
    pub error: VaultErrorDetail,
}

/// Vault error detail.
#[derive(Debug, Deserialize)]
pub struct VaultErrorDetail {
    /// Machine-readable error code
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable provider message
    #[serde(default)]
    pub message: Option<String>,
}
