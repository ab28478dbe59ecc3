//! Shared library for cross-cutting concerns in secret-portal Rust crates.
//!
//! This crate provides centralized implementations for:
//! - Error types with retryability classification
//! - HTTP client configuration and building
//! - Telemetry event sink with buffering and fire-and-forget delivery
//! - Tracing initialization

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod http;
pub mod telemetry;
pub mod tracing_config;

pub use error::PortalError;
pub use http::{HttpConfig, build_http_client};
pub use telemetry::{EventRecord, EventSink, TelemetryClient, TelemetryConfig};
pub use tracing_config::{TracingConfig, init_tracing};
