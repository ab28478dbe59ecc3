//! Mock implementations for testing.
//!
//! The mocks count every invocation so tests can assert that gated
//! operations never ran for unauthorized principals, and that telemetry
//! recorded exactly the expected number of events.

use async_trait::async_trait;
use keyvault_client::{SecretStore, SecretSummary, SecretValue, VaultError, VaultResult};
use portal_common::telemetry::{EventRecord, EventSink};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

type ErrorFactory = Box<dyn Fn() -> VaultError + Send + Sync>;

/// Counting in-memory secret store.
#[derive(Default)]
pub struct MockSecretStore {
    secrets: HashMap<String, HashMap<String, String>>,
    list_error: Option<ErrorFactory>,
    get_error: Option<ErrorFactory>,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
}

impl MockSecretStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a secret into the named vault.
    #[must_use]
    pub fn with_secret(
        mut self,
        vault: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.secrets
            .entry(vault.into())
            .or_default()
            .insert(name.into(), value.into());
        self
    }

    /// Make every list call fail with the produced error.
    #[must_use]
    pub fn with_list_error(
        mut self,
        factory: impl Fn() -> VaultError + Send + Sync + 'static,
    ) -> Self {
        self.list_error = Some(Box::new(factory));
        self
    }

    /// Make every get call fail with the produced error.
    #[must_use]
    pub fn with_get_error(
        mut self,
        factory: impl Fn() -> VaultError + Send + Sync + 'static,
    ) -> Self {
        self.get_error = Some(Box::new(factory));
        self
    }

    /// Number of list invocations so far.
    #[must_use]
    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of get invocations so far.
    #[must_use]
    pub fn get_call_count(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for MockSecretStore {
    async fn list_secrets(&self, vault_name: &str) -> VaultResult<HashSet<SecretSummary>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(factory) = &self.list_error {
            return Err(factory());
        }

        Ok(self
            .secrets
            .get(vault_name)
            .map(|vault| vault.keys().map(SecretSummary::new).collect())
            .unwrap_or_default())
    }

    async fn get_secret(&self, vault_name: &str, name: &str) -> VaultResult<SecretValue> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(factory) = &self.get_error {
            return Err(factory());
        }

        self.secrets
            .get(vault_name)
            .and_then(|vault| vault.get(name))
            .map(|value| SecretValue::new(name, value))
            .ok_or_else(|| {
                VaultError::not_found(format!(
                    "A secret with (name/id) {name} was not found in this key vault"
                ))
            })
    }
}

/// Event sink that records every tracked event.
#[derive(Default)]
pub struct RecordingSink {
    events: Arc<RwLock<Vec<EventRecord>>>,
    flushes: AtomicUsize,
}

impl RecordingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events.
    pub async fn events(&self) -> Vec<EventRecord> {
        self.events.read().await.clone()
    }

    /// Recorded event names, in order.
    pub async fn event_names(&self) -> Vec<String> {
        self.events
            .read()
            .await
            .iter()
            .map(|event| event.name.clone())
            .collect()
    }

    /// Number of recorded events.
    pub async fn count(&self) -> usize {
        self.events.read().await.len()
    }

    /// Number of flush invocations.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn track_event(&self, event: EventRecord) {
        self.events.write().await.push(event);
    }

    async fn flush(&self) {
        self.flushes.fetch_add(1, Ordering::SeqCst);
    }
}
