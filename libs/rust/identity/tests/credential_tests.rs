//! Token endpoint tests against a mock identity provider.

use identity_client::{ClientSecretCredential, IdentityError, TokenCredential};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credential_for(server: &MockServer) -> ClientSecretCredential {
    ClientSecretCredential::with_authority(server.uri(), "tenant-1", "client-1", "client-secret")
        .unwrap()
}

#[tokio::test]
async fn acquires_token_via_client_credentials_grant() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=client-1"))
        .and(body_string_contains("scope=https"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "access_token": "token-abc",
            "expires_in": 3600
        })))
        .mount(&server)
        .await;

    let token = credential_for(&server)
        .get_token("https://vault.azure.net/.default")
        .await
        .unwrap();

    assert_eq!(token.expose(), "token-abc");
    assert!(!token.is_expired());
}

#[tokio::test]
async fn reuses_cached_token_until_expiry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "token-abc",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credential = credential_for(&server);
    let first = credential.get_token("scope-a").await.unwrap();
    let second = credential.get_token("scope-a").await.unwrap();

    assert_eq!(first.expose(), second.expose());
}

#[tokio::test]
async fn caches_per_scope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "token-abc",
            "expires_in": 3600
        })))
        .expect(2)
        .mount(&server)
        .await;

    let credential = credential_for(&server);
    credential.get_token("scope-a").await.unwrap();
    credential.get_token("scope-b").await.unwrap();
}

#[tokio::test]
async fn missing_expiry_defaults_to_an_hour() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "token-abc"
        })))
        .mount(&server)
        .await;

    let token = credential_for(&server).get_token("scope").await.unwrap();
    assert!(!token.is_expired());
}

#[tokio::test]
async fn rejected_request_surfaces_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"error":"invalid_client"}"#),
        )
        .mount(&server)
        .await;

    let err = credential_for(&server).get_token("scope").await.unwrap_err();

    match err {
        IdentityError::TokenRejected { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("invalid_client"));
        }
        other => panic!("expected TokenRejected, got {other:?}"),
    }
}
