//! Identity error types.
//!
//! Token-acquisition and profile failures are not degraded into view
//! messages the way vault failures are; callers re-raise them so the
//! framework-level authentication layer can send the user back through
//! the identity provider.

use thiserror::Error;

/// Identity provider errors.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// The token endpoint rejected the request
    #[error("Token request rejected: status {status}: {message}")]
    TokenRejected {
        /// HTTP status returned by the token endpoint
        status: u16,
        /// Response body text
        message: String,
    },

    /// Profile service call failed
    #[error("Profile request failed: status {status}: {message}")]
    ProfileRequest {
        /// HTTP status returned by the profile service
        status: u16,
        /// Response body text
        message: String,
    },

    /// Transport-level failure
    #[error("Identity transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed response from the identity provider
    #[error("Failed to parse identity response: {0}")]
    Parse(String),
}

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

impl IdentityError {
    /// Create a parse error.
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IdentityError::TokenRejected {
            status: 401,
            message: "invalid_client".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Token request rejected: status 401: invalid_client"
        );
    }
}
