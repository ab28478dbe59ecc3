//! Type-safe configuration with validation.
//!
//! All request-independent settings (vault name, required-claim
//! template, credentials) are loaded and validated once at startup and
//! passed into the orchestration layer as immutable values; nothing here
//! is request-scoped.

use secrecy::SecretString;
use std::env;
use thiserror::Error;
use url::Url;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid URL format
    #[error("Invalid URL for {field}: {reason}")]
    InvalidUrl {
        /// Offending field
        field: String,
        /// Parse failure description
        reason: String,
    },

    /// Invalid port number
    #[error("Invalid port: must be between 1 and 65535")]
    InvalidPort,

    /// Missing required field
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    /// Environment variable parse error
    #[error("Failed to parse environment variable {name}: {reason}")]
    ParseError {
        /// Variable name
        name: String,
        /// Parse failure description
        reason: String,
    },
}

/// Service configuration with validation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port (1-65535)
    pub port: u16,
    /// Logical vault name secrets are read from
    pub vault_name: String,
    /// Vault DNS suffix
    pub vault_dns_suffix: String,
    /// Claim type of the required group claim
    pub required_claim_type: String,
    /// Claim value of the required group claim
    pub required_group: String,
    /// Advisory claim type used for the username
    pub name_claim_type: String,
    /// Identity tenant id
    pub tenant_id: String,
    /// Identity client id
    pub client_id: String,
    /// Identity client secret
    pub client_secret: SecretString,
    /// Profile graph base URL
    pub graph_api_url: Url,
    /// Permission scope requested for profile reads
    pub graph_scope: String,
    /// HS256 shared secret for bearer-token verification
    pub jwt_hs256_secret: Option<SecretString>,
    /// RSA public key PEM for bearer-token verification
    pub jwt_rsa_pem: Option<String>,
    /// Telemetry ingestion endpoint
    pub telemetry_endpoint: Option<Url>,
    /// Log level
    pub log_level: String,
    /// Emit JSON logs
    pub log_json: bool,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

impl Config {
    /// Loads configuration from environment variables with validation.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required variable is missing or a
    /// value fails to parse or validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Self {
            host: env::var("PORTAL_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env("PORTAL_PORT", 8080)?,
            vault_name: require_env("PORTAL_VAULT_NAME")?,
            vault_dns_suffix: env::var("PORTAL_VAULT_DNS_SUFFIX")
                .unwrap_or_else(|_| "vault.azure.net".to_string()),
            required_claim_type: env::var("PORTAL_REQUIRED_CLAIM_TYPE")
                .unwrap_or_else(|_| "groups".to_string()),
            required_group: require_env("PORTAL_REQUIRED_GROUP")?,
            name_claim_type: env::var("PORTAL_NAME_CLAIM_TYPE")
                .unwrap_or_else(|_| "name".to_string()),
            tenant_id: require_env("AZURE_TENANT_ID")?,
            client_id: require_env("AZURE_CLIENT_ID")?,
            client_secret: SecretString::from(require_env("AZURE_CLIENT_SECRET")?),
            graph_api_url: parse_url_env("GRAPH_API_URL", "https://graph.microsoft.com/v1.0")?,
            graph_scope: env::var("GRAPH_SCOPE").unwrap_or_else(|_| "User.Read".to_string()),
            jwt_hs256_secret: env::var("PORTAL_JWT_HS256_SECRET")
                .ok()
                .map(SecretString::from),
            jwt_rsa_pem: env::var("PORTAL_JWT_RSA_PEM").ok(),
            telemetry_endpoint: parse_optional_url_env("PORTAL_TELEMETRY_ENDPOINT")?,
            log_level: env::var("PORTAL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_json: parse_env("PORTAL_LOG_JSON", false)?,
            shutdown_timeout_seconds: parse_env("PORTAL_SHUTDOWN_TIMEOUT", 30)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.vault_name.is_empty() {
            return Err(ConfigError::MissingRequired("vault_name".to_string()));
        }
        if self.required_group.is_empty() {
            return Err(ConfigError::MissingRequired("required_group".to_string()));
        }
        if self.jwt_hs256_secret.is_none() && self.jwt_rsa_pem.is_none() {
            return Err(ConfigError::MissingRequired(
                "jwt verification key (PORTAL_JWT_HS256_SECRET or PORTAL_JWT_RSA_PEM)".to_string(),
            ));
        }
        Ok(())
    }

    /// Gets the graph base URL as a string.
    #[must_use]
    pub fn graph_api_url_str(&self) -> &str {
        self.graph_api_url.as_str()
    }
}

/// Parse an environment variable with a default value.
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val.parse().map_err(|e: T::Err| ConfigError::ParseError {
            name: name.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Read a required environment variable.
fn require_env(name: &str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::MissingRequired(name.to_string()))
}

/// Parse a URL environment variable with a default value.
fn parse_url_env(name: &str, default: &str) -> Result<Url, ConfigError> {
    let url_str = env::var(name).unwrap_or_else(|_| default.to_string());
    Url::parse(&url_str).map_err(|e| ConfigError::InvalidUrl {
        field: name.to_string(),
        reason: e.to_string(),
    })
}

/// Parse an optional URL environment variable.
fn parse_optional_url_env(name: &str) -> Result<Option<Url>, ConfigError> {
    match env::var(name) {
        Ok(url_str) => Url::parse(&url_str)
            .map(Some)
            .map_err(|e| ConfigError::InvalidUrl {
                field: name.to_string(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
