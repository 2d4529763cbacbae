//! Chain-head metrics exporter for nodeos-style nodes.
//!
//! This crate provides the building blocks of a Prometheus exporter
//! that polls a node's chain API and tracks head-of-chain progression:
//!
//! - wire and domain types for the status feed (`types`),
//! - an HTTP client for the node's status endpoint (`upstream`),
//! - producer rotation tracking (`rotation`),
//! - Prometheus series and the `/metrics` server (`metrics`),
//! - the periodic poll loop (`poller`),
//! - and top-level configuration (`config`).
//!
//! The binary in `main.rs` composes these pieces into the stock
//! exporter process; they stay independently usable for tests and
//! custom setups.

pub mod config;
pub mod metrics;
pub mod poller;
pub mod rotation;
pub mod types;
pub mod upstream;

// Re-export top-level configuration types.
pub use config::{ConfigError, ExporterConfig, MetricsConfig, PollConfig, UpstreamConfig};

// Re-export the poll loop and its source seam.
pub use poller::{FetchError, StatusPoller, StatusSource};

// Re-export rotation tracking.
pub use rotation::{Rotation, RotationTracker};

// Re-export the stock HTTP status client.
pub use upstream::HttpStatusClient;

// Re-export metrics registry and the exposition server.
pub use metrics::{ChainMetrics, MetricsRegistry, run_prometheus_http_server};

// Re-export domain types at the crate root for convenience.
pub use types::{HeadSnapshot, InvalidStatus, StatusRecord};

/// Type alias for the poller stack used by the stock exporter binary.
pub type DefaultStatusPoller = StatusPoller<HttpStatusClient>;
