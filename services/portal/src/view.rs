//! View payloads.
//!
//! The response layer is a pure sink: it receives these flat structures
//! and renders them. Nothing here reaches back into request state.

use serde::Serialize;
use std::collections::BTreeSet;

/// Flat payload for the index/search views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPayload {
    /// Whether the principal passed the authorization gate
    pub has_access: bool,
    /// Names of the secrets visible in the vault, sorted
    pub secrets: BTreeSet<String>,
    /// Tenant name extracted from the advisory username claim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    /// Hostname the principal searched for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Fetched secret value or provider error text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ViewPayload {
    /// The default payload: no access, nothing disclosed.
    #[must_use]
    pub fn denied() -> Self {
        Self {
            has_access: false,
            secrets: BTreeSet::new(),
            tenant_name: None,
            hostname: None,
            message: None,
        }
    }

    /// Payload for a principal that passed the gate.
    #[must_use]
    pub fn authorized(secrets: BTreeSet<String>, tenant_name: Option<String>) -> Self {
        Self {
            has_access: true,
            secrets,
            tenant_name,
            hostname: None,
            message: None,
        }
    }

    /// Attach the searched hostname.
    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Attach the message (secret value or error text).
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Profile view: the subset of the user's profile the portal shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    /// Display name
    pub display_name: Option<String>,
    /// User principal name
    pub user_principal_name: Option<String>,
    /// Primary mail address
    pub mail: Option<String>,
    /// Job title
    pub job_title: Option<String>,
    /// Base64-encoded photo bytes
    pub photo: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_payload() {
        let payload = ViewPayload::denied();
        assert!(!payload.has_access);
        assert!(payload.secrets.is_empty());
        assert!(payload.message.is_none());
    }

    #[test]
    fn test_json_key_casing() {
        let payload = ViewPayload::authorized(
            BTreeSet::from(["db-pass".to_string()]),
            Some("contoso.com".to_string()),
        )
        .with_hostname("host1")
        .with_message("s3cr3t");

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["hasAccess"], true);
        assert_eq!(json["tenantName"], "contoso.com");
        assert_eq!(json["hostname"], "host1");
        assert_eq!(json["message"], "s3cr3t");
        assert_eq!(json["secrets"][0], "db-pass");
    }

    #[test]
    fn test_absent_fields_not_serialized() {
        let json = serde_json::to_value(ViewPayload::denied()).unwrap();
        assert!(json.get("tenantName").is_none());
        assert!(json.get("hostname").is_none());
        assert!(json.get("message").is_none());
    }
}
