//! Secret portal service - main entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use portal::auth::TokenVerifier;
use portal::routes::{AppState, build_router};
use portal::shutdown::wait_for_signal;
use portal::{Config, Portal, PortalPolicy};

use identity_client::{ClientSecretCredential, GraphClient, GraphConfig, TokenCredential};
use keyvault_client::{KeyVaultClient, KeyVaultConfig};
use portal_common::telemetry::{EventSink, TelemetryClient, TelemetryConfig};
use portal_common::tracing_config::{TracingConfig, init_tracing};
use secrecy::ExposeSecret;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let tracing_config = TracingConfig::default()
        .with_service_name("portal-service")
        .with_log_level(config.log_level.clone());
    let tracing_config = if config.log_json {
        tracing_config.with_json_output()
    } else {
        tracing_config
    };
    init_tracing(&tracing_config);

    info!("Starting secret portal");

    let credential: Arc<dyn TokenCredential> = Arc::new(ClientSecretCredential::new(
        config.tenant_id.clone(),
        config.client_id.clone(),
        config.client_secret.expose_secret(),
    )?);

    let vault = KeyVaultClient::new(
        KeyVaultConfig::default().with_dns_suffix(config.vault_dns_suffix.clone()),
        credential.clone(),
    )?;

    let graph = GraphClient::new(
        GraphConfig::default()
            .with_base_url(config.graph_api_url_str())
            .with_scope(config.graph_scope.clone()),
        credential,
    )?;

    let mut telemetry_config = TelemetryConfig::default().with_service_id("portal-service");
    if let Some(endpoint) = &config.telemetry_endpoint {
        telemetry_config = telemetry_config.with_endpoint(endpoint.as_str());
    }
    let telemetry: Arc<TelemetryClient> = Arc::new(TelemetryClient::new(telemetry_config)?);

    let portal = Portal::new(
        PortalPolicy::from_config(&config),
        Arc::new(vault),
        telemetry.clone(),
    );

    let state = AppState {
        portal: Arc::new(portal),
        graph: Arc::new(graph),
        verifier: Arc::new(TokenVerifier::from_config(&config)?),
    };

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Secret portal listening on {addr}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(wait_for_signal())
        .await?;

    // Last chance for buffered telemetry before the process exits.
    let flush_timeout = Duration::from_secs(config.shutdown_timeout_seconds);
    if tokio::time::timeout(flush_timeout, telemetry.flush()).await.is_err() {
        info!("Telemetry flush timed out during shutdown");
    }

    info!("Secret portal stopped");
    Ok(())
}
