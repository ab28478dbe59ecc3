//! Vault error types using thiserror 2.0.
//!
//! Provides vault-specific errors carrying the provider's own message
//! text, with retryability classification.

use thiserror::Error;

/// Vault-specific errors.
///
/// The `Display` text of a variant is what callers surface to the view
/// layer when they degrade a failed vault call into a message.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Vault server unavailable
    #[error("Vault unavailable: {0}")]
    Unavailable(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Access denied by the vault's own policy
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Secret not found
    #[error("Secret not found: {0}")]
    SecretNotFound(String),

    /// Request throttled by the vault
    #[error("Request throttled: {0}")]
    Throttled(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Any other unexpected failure during vault access
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

impl VaultError {
    /// Check if error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::Throttled(_) | Self::Http(_)
        )
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an authentication failed error.
    #[must_use]
    pub fn auth_failed(msg: impl Into<String>) -> Self {
        Self::AuthenticationFailed(msg.into())
    }

    /// Create a secret not found error from the provider's message.
    #[must_use]
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::SecretNotFound(msg.into())
    }

    /// Create an access denied error.
    #[must_use]
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create a throttled error.
    #[must_use]
    pub fn throttled(msg: impl Into<String>) -> Self {
        Self::Throttled(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VaultError::unavailable("connection refused");
        assert_eq!(err.to_string(), "Vault unavailable: connection refused");

        let err = VaultError::not_found("secret host1 was not found in this key vault");
        assert_eq!(
            err.to_string(),
            "Secret not found: secret host1 was not found in this key vault"
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(VaultError::unavailable("timeout").is_retryable());
        assert!(VaultError::throttled("slow down").is_retryable());
        assert!(!VaultError::not_found("path").is_retryable());
        assert!(!VaultError::forbidden("nope").is_retryable());
        assert!(!VaultError::auth_failed("bad credential").is_retryable());
    }

    #[test]
    fn test_from_anyhow() {
        let err: VaultError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, VaultError::Other(_)));
        assert_eq!(err.to_string(), "boom");
    }
}
