//! Principal extraction from the bearer token.
//!
//! The identity-provider integration attaches a signed bearer token to
//! each request; this module verifies it and flattens its claims. A
//! missing or invalid token yields an anonymous principal with an empty
//! claim set, never an error - the authorization gate then denies
//! deterministically.

use crate::claims::{Claim, claims_from_token};
use crate::config::{Config, ConfigError};
use crate::routes::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use secrecy::ExposeSecret;
use std::convert::Infallible;
use tracing::debug;

/// Verifier for the bearer tokens the identity layer hands over.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Build a verifier from the configured key material.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when no usable key material is
    /// configured or the RSA PEM fails to parse.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        if let Some(secret) = &config.jwt_hs256_secret {
            return Ok(Self::hs256(secret.expose_secret()));
        }

        let pem = config.jwt_rsa_pem.as_ref().ok_or_else(|| {
            ConfigError::MissingRequired("jwt verification key".to_string())
        })?;
        Self::rs256_pem(pem)
    }

    /// Verifier for HS256-signed tokens.
    #[must_use]
    pub fn hs256(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verifier for RS256-signed tokens from a public key PEM.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the PEM cannot be parsed.
    pub fn rs256_pem(pem: &str) -> Result<Self, ConfigError> {
        let decoding_key =
            DecodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| ConfigError::ParseError {
                name: "PORTAL_JWT_RSA_PEM".to_string(),
                reason: e.to_string(),
            })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_aud = false;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Decode and verify a token, returning its flattened claims.
    ///
    /// Any verification failure (bad signature, expired, malformed)
    /// yields `None`.
    #[must_use]
    pub fn decode(&self, token: &str) -> Option<Vec<Claim>> {
        match decode::<serde_json::Map<String, serde_json::Value>>(
            token,
            &self.decoding_key,
            &self.validation,
        ) {
            Ok(data) => Some(claims_from_token(&data.claims)),
            Err(e) => {
                debug!(error = %e, "Bearer token rejected, treating principal as anonymous");
                None
            }
        }
    }
}

/// The authenticated principal of the current request.
#[derive(Debug, Clone, Default)]
pub struct Principal {
    /// Flattened claim set; empty for anonymous requests
    pub claims: Vec<Claim>,
}

impl Principal {
    /// A principal with no claims.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl FromRequestParts<AppState> for Principal {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
            .and_then(|token| state.verifier.decode(token))
            .unwrap_or_default();

        Ok(Self { claims })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    fn sign_hs256(secret: &str, claims: &serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_yields_claims() {
        let verifier = TokenVerifier::hs256("test-key");
        let token = sign_hs256(
            "test-key",
            &json!({"groups": ["G1"], "name": "ada@contoso.com", "exp": 4102444800_i64}),
        );

        let claims = verifier.decode(&token).unwrap();
        assert!(claims.contains(&Claim::new("groups", "G1")));
        assert!(claims.contains(&Claim::new("name", "ada@contoso.com")));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let verifier = TokenVerifier::hs256("test-key");
        let token = sign_hs256("other-key", &json!({"exp": 4102444800_i64}));
        assert!(verifier.decode(&token).is_none());
    }

    #[test]
    fn test_expired_token_rejected() {
        let verifier = TokenVerifier::hs256("test-key");
        let token = sign_hs256("test-key", &json!({"exp": 1_000_000_000}));
        assert!(verifier.decode(&token).is_none());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let verifier = TokenVerifier::hs256("test-key");
        assert!(verifier.decode("not-a-token").is_none());
    }

    #[test]
    fn test_anonymous_principal_has_no_claims() {
        assert!(Principal::anonymous().claims.is_empty());
    }
}
