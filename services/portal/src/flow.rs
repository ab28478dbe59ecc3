//! Search/orchestration flow.
//!
//! Every request starts unauthorized; the gate is re-evaluated on each
//! call and nothing about the decision is cached. Vault failures degrade
//! into the view message and a telemetry event - they never abort the
//! response, and a listing failure does not revoke access.

use crate::authz::{claim_value, match_by_type_and_value, tenant_from_upn};
use crate::claims::Claim;
use crate::view::ViewPayload;
use keyvault_client::{SecretStore, VaultError};
use portal_common::telemetry::{EventRecord, EventSink};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Immutable, request-independent policy for the portal.
///
/// Constructed once at startup and shared read-only across requests.
#[derive(Debug, Clone)]
pub struct PortalPolicy {
    /// Logical vault name secrets are read from
    pub vault_name: String,
    /// Claim type required for access
    pub required_claim_type: String,
    /// Claim value required for access
    pub required_group: String,
    /// Advisory claim type holding the username
    pub name_claim_type: String,
}

impl PortalPolicy {
    /// Build the policy from service configuration.
    #[must_use]
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            vault_name: config.vault_name.clone(),
            required_claim_type: config.required_claim_type.clone(),
            required_group: config.required_group.clone(),
            name_claim_type: config.name_claim_type.clone(),
        }
    }
}

/// The portal orchestrator.
pub struct Portal {
    policy: PortalPolicy,
    store: Arc<dyn SecretStore>,
    telemetry: Arc<dyn EventSink>,
}

impl Portal {
    /// Create a portal over the given secret store and telemetry sink.
    #[must_use]
    pub fn new(policy: PortalPolicy, store: Arc<dyn SecretStore>, telemetry: Arc<dyn EventSink>) -> Self {
        Self {
            policy,
            store,
            telemetry,
        }
    }

    /// The portal policy.
    #[must_use]
    pub fn policy(&self) -> &PortalPolicy {
        &self.policy
    }

    fn gate(&self, claims: &[Claim]) -> bool {
        match_by_type_and_value(
            claims,
            &self.policy.required_claim_type,
            &self.policy.required_group,
        )
    }

    fn tenant_name(&self, claims: &[Claim]) -> Option<String> {
        claim_value(claims, &self.policy.name_claim_type)
            .map(|upn| tenant_from_upn(upn).to_string())
    }

    /// Compose the index view for the given principal.
    pub async fn index(&self, claims: &[Claim]) -> ViewPayload {
        if !self.gate(claims) {
            return ViewPayload::denied();
        }

        let (secrets, failure) = self.list_secrets_degraded().await;
        let mut payload = ViewPayload::authorized(secrets, self.tenant_name(claims));
        if let Some(message) = failure {
            payload = payload.with_message(message);
        }
        payload
    }

    /// Compose the search view for the given principal and hostname.
    ///
    /// A search by a principal that fails the gate is silently ignored;
    /// neither fetch nor list executes. An empty hostname falls back to
    /// the index flow.
    pub async fn search(&self, claims: &[Claim], hostname: &str) -> ViewPayload {
        if !self.gate(claims) {
            return ViewPayload::denied();
        }

        let hostname = hostname.trim();
        if hostname.is_empty() {
            return self.index(claims).await;
        }

        let user = claim_value(claims, &self.policy.name_claim_type).unwrap_or("unknown");
        self.telemetry
            .track_event(
                EventRecord::new(format!("Search for hostname {hostname} made by {user}"))
                    .with_property("hostname", hostname),
            )
            .await;
        self.telemetry.flush().await;

        let message = match self.store.get_secret(&self.policy.vault_name, hostname).await {
            Ok(secret) => {
                info!(hostname, "Secret retrieved");
                secret.expose().to_string()
            }
            Err(e) => {
                self.track_vault_failure(&e).await;
                e.to_string()
            }
        };

        let (secrets, _list_failure) = self.list_secrets_degraded().await;

        ViewPayload::authorized(secrets, self.tenant_name(claims))
            .with_hostname(hostname)
            .with_message(message)
    }

    /// List the vault's secrets, degrading failure into an empty set and
    /// a message. The listing is re-derived on every call.
    async fn list_secrets_degraded(&self) -> (BTreeSet<String>, Option<String>) {
        match self.store.list_secrets(&self.policy.vault_name).await {
            Ok(summaries) => {
                let names = summaries.into_iter().map(|summary| summary.name).collect();
                (names, None)
            }
            Err(e) => {
                self.track_vault_failure(&e).await;
                (BTreeSet::new(), Some(e.to_string()))
            }
        }
    }

    async fn track_vault_failure(&self, error: &VaultError) {
        warn!(error = %error, "Vault call failed, degrading to view message");

        let event = if matches!(error, VaultError::Other(_)) {
            format!("General error reaching vault: {error}")
        } else {
            format!("Could not reach vault: {error}")
        };
        self.telemetry.track_event(EventRecord::new(event)).await;
    }
}
