//! Key Vault client configuration.

use std::time::Duration;

/// Key Vault client configuration.
///
/// The client is addressed by logical vault name; the base URL is derived
/// from the name and the DNS suffix on every call.
#[derive(Debug, Clone)]
pub struct KeyVaultConfig {
    /// Vault DNS suffix appended to the vault name
    pub dns_suffix: String,
    /// REST API version sent with every request
    pub api_version: String,
    /// OAuth2 scope requested for vault access tokens
    pub token_scope: String,
    /// Request timeout
    pub timeout: Duration,
    /// Endpoint override; replaces name-based address derivation when set
    /// (sovereign clouds, local test servers)
    pub endpoint: Option<String>,
}

impl Default for KeyVaultConfig {
    fn default() -> Self {
        Self {
            dns_suffix: "vault.azure.net".to_string(),
            api_version: "7.4".to_string(),
            token_scope: "https://vault.azure.net/.default".to_string(),
            timeout: Duration::from_secs(30),
            endpoint: None,
        }
    }
}

impl KeyVaultConfig {
    /// Create a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vault DNS suffix.
    #[must_use]
    pub fn with_dns_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.dns_suffix = suffix.into();
        self
    }

    /// Set the REST API version.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the token scope.
    #[must_use]
    pub fn with_token_scope(mut self, scope: impl Into<String>) -> Self {
        self.token_scope = scope.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the vault endpoint entirely.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Derive the vault base URL for the given vault name.
    ///
    /// Re-computed on every call; nothing is cached between requests.
    #[must_use]
    pub fn vault_url(&self, vault_name: &str) -> String {
        self.endpoint.as_ref().map_or_else(
            || format!("https://{vault_name}.{}", self.dns_suffix),
            |endpoint| endpoint.trim_end_matches('/').to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = KeyVaultConfig::default();
        assert_eq!(config.dns_suffix, "vault.azure.net");
        assert_eq!(config.api_version, "7.4");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn test_vault_url_from_name() {
        let config = KeyVaultConfig::default();
        assert_eq!(config.vault_url("contoso"), "https://contoso.vault.azure.net");
    }

    #[test]
    fn test_vault_url_sovereign_suffix() {
        let config = KeyVaultConfig::default().with_dns_suffix("vault.azure.cn");
        assert_eq!(config.vault_url("contoso"), "https://contoso.vault.azure.cn");
    }

    #[test]
    fn test_vault_url_endpoint_override() {
        let config = KeyVaultConfig::default().with_endpoint("http://127.0.0.1:8200/");
        assert_eq!(config.vault_url("ignored"), "http://127.0.0.1:8200");
    }
}
