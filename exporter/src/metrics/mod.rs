//! Metrics and exposition for the exporter.
//!
//! This module defines the Prometheus series fed by the poll loop and
//! a small HTTP server that serves `/metrics` in Prometheus text
//! format.
//!
//! Typical usage:
//!
//! ```ignore
//! use std::sync::Arc;
//! use nodeos_exporter::metrics::{MetricsRegistry, run_prometheus_http_server};
//!
//! let metrics = Arc::new(MetricsRegistry::new()?);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//!
//! // Spawn the HTTP exposition server in the background:
//! tokio::spawn(run_prometheus_http_server(listener, metrics.clone()));
//!
//! // Elsewhere in the code, one lock hold per update batch:
//! let chain = metrics.chain.lock().await;
//! chain.head_block_number.set(head_num);
//! ```

pub mod prometheus;

pub use prometheus::{ChainMetrics, MetricsRegistry, run_prometheus_http_server};
