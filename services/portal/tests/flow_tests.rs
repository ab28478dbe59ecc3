//! Orchestration flow tests against counting doubles.

use keyvault_client::VaultError;
use portal::claims::Claim;
use portal::{Portal, PortalPolicy};
use std::sync::Arc;
use test_utils::{MockSecretStore, RecordingSink};

fn policy() -> PortalPolicy {
    PortalPolicy {
        vault_name: "contoso".to_string(),
        required_claim_type: "groups".to_string(),
        required_group: "G1".to_string(),
        name_claim_type: "name".to_string(),
    }
}

fn member_claims() -> Vec<Claim> {
    vec![
        Claim::new("groups", "G1"),
        Claim::new("name", "ada@contoso.com"),
    ]
}

fn stranger_claims() -> Vec<Claim> {
    vec![
        Claim::new("groups", "G2"),
        Claim::new("name", "mallory@evil.test"),
    ]
}

fn seeded_store() -> MockSecretStore {
    MockSecretStore::new()
        .with_secret("contoso", "db-pass", "pg-password")
        .with_secret("contoso", "api-key", "key-value")
        .with_secret("contoso", "host1", "s3cr3t")
}

#[tokio::test]
async fn index_denies_empty_claim_set() {
    let store = Arc::new(seeded_store());
    let portal = Portal::new(policy(), store.clone(), Arc::new(RecordingSink::new()));

    let payload = portal.index(&[]).await;

    assert!(!payload.has_access);
    assert!(payload.secrets.is_empty());
    assert_eq!(store.list_call_count(), 0);
}

#[tokio::test]
async fn index_denies_wrong_group() {
    let store = Arc::new(seeded_store());
    let portal = Portal::new(policy(), store.clone(), Arc::new(RecordingSink::new()));

    let payload = portal.index(&stranger_claims()).await;

    assert!(!payload.has_access);
    assert!(payload.secrets.is_empty());
    assert_eq!(store.list_call_count(), 0);
}

#[tokio::test]
async fn index_lists_secrets_for_member() {
    let store = Arc::new(seeded_store());
    let portal = Portal::new(policy(), store.clone(), Arc::new(RecordingSink::new()));

    let payload = portal.index(&member_claims()).await;

    assert!(payload.has_access);
    let names: Vec<&str> = payload.secrets.iter().map(String::as_str).collect();
    assert!(names.contains(&"db-pass"));
    assert!(names.contains(&"api-key"));
    assert_eq!(payload.tenant_name.as_deref(), Some("contoso.com"));
    assert!(payload.message.is_none());
}

#[tokio::test]
async fn gate_is_reevaluated_on_every_request() {
    let store = Arc::new(seeded_store());
    let portal = Portal::new(policy(), store.clone(), Arc::new(RecordingSink::new()));

    assert!(portal.index(&member_claims()).await.has_access);
    assert!(!portal.index(&stranger_claims()).await.has_access);
    assert!(!portal.index(&[]).await.has_access);
}

#[tokio::test]
async fn search_returns_secret_value_and_relists() {
    let store = Arc::new(seeded_store());
    let portal = Portal::new(policy(), store.clone(), Arc::new(RecordingSink::new()));

    let payload = portal.search(&member_claims(), "host1").await;

    assert!(payload.has_access);
    assert_eq!(payload.hostname.as_deref(), Some("host1"));
    assert!(payload.message.as_deref().unwrap().contains("s3cr3t"));
    assert!(!payload.secrets.is_empty());
    assert_eq!(store.get_call_count(), 1);
    assert_eq!(store.list_call_count(), 1);
}

#[tokio::test]
async fn search_by_unauthorized_principal_is_silently_ignored() {
    let store = Arc::new(seeded_store());
    let sink = Arc::new(RecordingSink::new());
    let portal = Portal::new(policy(), store.clone(), sink.clone());

    let payload = portal.search(&stranger_claims(), "host1").await;

    assert!(!payload.has_access);
    assert!(payload.secrets.is_empty());
    assert!(payload.message.is_none());
    assert_eq!(store.get_call_count(), 0);
    assert_eq!(store.list_call_count(), 0);
    assert_eq!(sink.count().await, 0);
}

#[tokio::test]
async fn search_with_blank_hostname_falls_back_to_index() {
    let store = Arc::new(seeded_store());
    let sink = Arc::new(RecordingSink::new());
    let portal = Portal::new(policy(), store.clone(), sink.clone());

    let payload = portal.search(&member_claims(), "   ").await;

    assert!(payload.has_access);
    assert!(payload.hostname.is_none());
    assert_eq!(store.get_call_count(), 0);
    assert_eq!(store.list_call_count(), 1);
    assert_eq!(sink.count().await, 0);
}

#[tokio::test]
async fn list_failure_keeps_access_and_surfaces_provider_text() {
    let provider_text = "A secret with (name/id) db-pass was not found in this key vault";
    let store = Arc::new(
        MockSecretStore::new()
            .with_list_error(move || VaultError::not_found(provider_text)),
    );
    let sink = Arc::new(RecordingSink::new());
    let portal = Portal::new(policy(), store, sink.clone());

    let payload = portal.index(&member_claims()).await;

    assert!(payload.has_access);
    assert!(payload.secrets.is_empty());
    assert_eq!(
        payload.message.as_deref(),
        Some(VaultError::not_found(provider_text).to_string().as_str())
    );
    assert_eq!(sink.count().await, 1);
    assert!(sink.event_names().await[0].starts_with("Could not reach vault"));
}

#[tokio::test]
async fn search_records_search_event_with_username() {
    let store = Arc::new(seeded_store());
    let sink = Arc::new(RecordingSink::new());
    let portal = Portal::new(policy(), store, sink.clone());

    portal.search(&member_claims(), "host1").await;

    let names = sink.event_names().await;
    assert_eq!(names.len(), 1);
    assert_eq!(
        names[0],
        "Search for hostname host1 made by ada@contoso.com"
    );
}

#[tokio::test]
async fn search_fetch_failure_degrades_to_error_message() {
    let store = Arc::new(
        seeded_store().with_get_error(|| VaultError::throttled("Too many requests, retry later")),
    );
    let sink = Arc::new(RecordingSink::new());
    let portal = Portal::new(policy(), store.clone(), sink.clone());

    let payload = portal.search(&member_claims(), "host1").await;

    assert!(payload.has_access);
    assert_eq!(payload.hostname.as_deref(), Some("host1"));
    assert_eq!(
        payload.message.as_deref(),
        Some("Request throttled: Too many requests, retry later")
    );
    // Search event plus exactly one failure event; the list still ran.
    assert_eq!(sink.count().await, 2);
    assert_eq!(store.list_call_count(), 1);
}

#[tokio::test]
async fn unexpected_failure_is_classified_as_general_error() {
    let store = Arc::new(
        MockSecretStore::new()
            .with_list_error(|| VaultError::Other(anyhow::anyhow!("connection pool poisoned"))),
    );
    let sink = Arc::new(RecordingSink::new());
    let portal = Portal::new(policy(), store, sink.clone());

    let payload = portal.index(&member_claims()).await;

    assert!(payload.has_access);
    assert_eq!(payload.message.as_deref(), Some("connection pool poisoned"));
    let names = sink.event_names().await;
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("General error reaching vault"));
}
