//! Telemetry event sink with buffering and fire-and-forget delivery.
//!
//! This module provides a client for recording free-text event records
//! (searches performed, vault failures) with batching and a local tracing
//! fallback. Delivery is fire-and-forget: a failing sink must never
//! affect the request that produced the event.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// A single telemetry event record.
#[derive(Debug, Clone, serde::Serialize)]
pub struct EventRecord {
    /// Event name (free text)
    pub name: String,
    /// Additional string properties
    pub properties: HashMap<String, String>,
    /// Timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl EventRecord {
    /// Create a new event record.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: HashMap::new(),
            timestamp: chrono::Utc::now(),
        }
    }

    /// Add a string property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Sink for telemetry events.
///
/// Implemented by [`TelemetryClient`] for production use and by counting
/// doubles in tests.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Record an event (buffered, fire-and-forget).
    async fn track_event(&self, event: EventRecord);

    /// Flush buffered events to the configured backend.
    async fn flush(&self);
}

/// Telemetry client configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Optional HTTP ingestion endpoint; events are only logged locally
    /// when unset
    pub endpoint: Option<String>,
    /// Batch size that triggers an automatic flush
    pub batch_size: usize,
    /// Maximum buffer size; further events are dropped
    pub buffer_size: usize,
    /// Service identifier attached to every event
    pub service_id: String,
    /// Ingestion request timeout
    pub timeout: Duration,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            batch_size: 50,
            buffer_size: 5000,
            service_id: "secret-portal".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

impl TelemetryConfig {
    /// Create config with an ingestion endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Create config with a custom service ID.
    #[must_use]
    pub fn with_service_id(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = service_id.into();
        self
    }

    /// Create config with a custom batch size.
    #[must_use]
    pub const fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }
}

/// Buffered telemetry client.
///
/// Events are appended to an in-memory buffer and shipped in batches.
/// Every event is also emitted through `tracing` so operators retain
/// visibility when no ingestion endpoint is configured or reachable.
pub struct TelemetryClient {
    config: TelemetryConfig,
    http: reqwest::Client,
    buffer: Arc<RwLock<VecDeque<EventRecord>>>,
}

impl TelemetryClient {
    /// Create a new telemetry client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: TelemetryConfig) -> Result<Self, reqwest::Error> {
        let http = crate::http::build_http_client(
            &crate::http::HttpConfig::default().with_timeout(config.timeout),
        )?;

        Ok(Self {
            http,
            buffer: Arc::new(RwLock::new(VecDeque::with_capacity(config.batch_size))),
            config,
        })
    }

    /// Get the current buffer size.
    pub async fn buffer_len(&self) -> usize {
        self.buffer.read().await.len()
    }

    /// Get the service ID.
    #[must_use]
    pub fn service_id(&self) -> &str {
        &self.config.service_id
    }

    fn log_locally(&self, event: &EventRecord) {
        info!(
            service = %self.config.service_id,
            properties = ?event.properties,
            "telemetry: {}",
            event.name
        );
    }

    async fn ship(&self, entries: &[EventRecord]) {
        let Some(endpoint) = &self.config.endpoint else {
            return;
        };

        // Best effort only; a failing sink never fails the caller.
        if let Err(e) = self.http.post(endpoint).json(entries).send().await {
            warn!(error = %e, "Failed to ship telemetry batch, events logged locally only");
        }
    }
}

#[async_trait]
impl EventSink for TelemetryClient {
    async fn track_event(&self, event: EventRecord) {
        self.log_locally(&event);

        let should_flush = {
            let mut buffer = self.buffer.write().await;
            if buffer.len() < self.config.buffer_size {
                buffer.push_back(event);
            } else {
                warn!("Telemetry buffer full, dropping event");
            }
            buffer.len() >= self.config.batch_size
        };

        if should_flush {
            self.flush().await;
        }
    }

    async fn flush(&self) {
        let entries: Vec<EventRecord> = {
            let mut buffer = self.buffer.write().await;
            buffer.drain(..).collect()
        };

        if entries.is_empty() {
            return;
        }

        self.ship(&entries).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_client() {
        let client = TelemetryClient::new(TelemetryConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_event_record_builder() {
        let event = EventRecord::new("Search performed")
            .with_property("hostname", "host1")
            .with_property("user", "user@contoso.com");

        assert_eq!(event.name, "Search performed");
        assert_eq!(event.properties.get("hostname"), Some(&"host1".to_string()));
        assert_eq!(
            event.properties.get("user"),
            Some(&"user@contoso.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_buffering_below_batch_size() {
        let config = TelemetryConfig::default().with_batch_size(10);
        let client = TelemetryClient::new(config).unwrap();

        for i in 0..5 {
            client.track_event(EventRecord::new(format!("event {i}"))).await;
        }

        assert_eq!(client.buffer_len().await, 5);
    }

    #[tokio::test]
    async fn test_flush_clears_buffer() {
        let client = TelemetryClient::new(TelemetryConfig::default()).unwrap();

        client.track_event(EventRecord::new("event")).await;
        assert_eq!(client.buffer_len().await, 1);

        client.flush().await;
        assert_eq!(client.buffer_len().await, 0);
    }

    #[tokio::test]
    async fn test_batch_size_triggers_flush() {
        let config = TelemetryConfig::default().with_batch_size(2);
        let client = TelemetryClient::new(config).unwrap();

        client.track_event(EventRecord::new("one")).await;
        client.track_event(EventRecord::new("two")).await;

        assert_eq!(client.buffer_len().await, 0);
    }
}
