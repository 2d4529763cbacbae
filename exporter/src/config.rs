//! Exporter configuration.
//!
//! This module aggregates configuration for:
//!
//! - the upstream node endpoint (`UpstreamConfig`),
//! - the poll cadence (`PollConfig`),
//! - the metrics exposition server (`MetricsConfig`).
//!
//! Defaults match the stock container deployment; every field can be
//! overridden through environment variables, which is how the exporter
//! is configured when it runs as a sidecar next to the node.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

/// Configuration for the upstream node endpoint.
#[derive(Clone, Debug)]
pub struct UpstreamConfig {
    /// Base URL of the node's chain API, e.g. `"http://node:8888"`.
    pub base_url: String,
    /// Request timeout for status fetches.
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://node:8888".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Configuration for the poll loop.
#[derive(Clone, Debug)]
pub struct PollConfig {
    /// Delay between poll cycles, applied after each cycle completes.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
        }
    }
}

/// Configuration for the Prometheus exposition server.
#[derive(Clone, Debug)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP server to.
    pub listen_addr: SocketAddr,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        // Safe to unwrap: this is a fixed, valid address literal.
        // Bind-all so container port mappings work unchanged.
        let addr: SocketAddr = "0.0.0.0:8000"
            .parse()
            .expect("hard-coded metrics listen address should parse");
        Self { listen_addr: addr }
    }
}

/// Top-level configuration for the exporter.
#[derive(Clone, Debug, Default)]
pub struct ExporterConfig {
    pub upstream: UpstreamConfig,
    pub poll: PollConfig,
    pub metrics: MetricsConfig,
}

/// Error raised when an environment override cannot be parsed.
#[derive(Debug)]
pub struct ConfigError {
    var: &'static str,
    value: String,
    reason: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}={:?}: {}", self.var, self.value, self.reason)
    }
}

impl std::error::Error for ConfigError {}

impl ExporterConfig {
    /// Builds a configuration from defaults plus environment overrides.
    ///
    /// Recognised variables:
    ///
    /// - `NODEOS_URL`: upstream node base URL,
    /// - `EXPORTER_LISTEN_ADDR`: exposition listen address,
    /// - `EXPORTER_POLL_INTERVAL_SECS`: poll cadence in seconds,
    /// - `EXPORTER_FETCH_TIMEOUT_SECS`: upstream request timeout in seconds.
    ///
    /// Sub-second values are not supported; intervals and timeouts are
    /// floored to one second.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Ok(url) = env::var("NODEOS_URL") {
            cfg.upstream.base_url = url;
        }
        if let Ok(raw) = env::var("EXPORTER_LISTEN_ADDR") {
            cfg.metrics.listen_addr = raw.parse().map_err(|e| ConfigError {
                var: "EXPORTER_LISTEN_ADDR",
                value: raw.clone(),
                reason: format!("{e}"),
            })?;
        }
        if let Ok(raw) = env::var("EXPORTER_POLL_INTERVAL_SECS") {
            cfg.poll.interval = parse_secs("EXPORTER_POLL_INTERVAL_SECS", &raw)?;
        }
        if let Ok(raw) = env::var("EXPORTER_FETCH_TIMEOUT_SECS") {
            cfg.upstream.timeout = parse_secs("EXPORTER_FETCH_TIMEOUT_SECS", &raw)?;
        }

        Ok(cfg)
    }
}

fn parse_secs(var: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw.parse().map_err(|e| ConfigError {
        var,
        value: raw.to_string(),
        reason: format!("{e}"),
    })?;
    Ok(Duration::from_secs(secs.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_deployment() {
        let cfg = ExporterConfig::default();
        assert_eq!(cfg.upstream.base_url, "http://node:8888");
        assert_eq!(cfg.upstream.timeout, Duration::from_secs(5));
        assert_eq!(cfg.poll.interval, Duration::from_secs(1));
        assert_eq!(cfg.metrics.listen_addr.port(), 8000);
    }

    #[test]
    fn parse_secs_floors_to_one_second() {
        assert_eq!(
            parse_secs("TEST_SECS", "0").expect("parse"),
            Duration::from_secs(1)
        );
        assert_eq!(
            parse_secs("TEST_SECS", "30").expect("parse"),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn parse_secs_rejects_garbage() {
        let err = parse_secs("TEST_SECS", "soon").expect_err("should fail");
        let msg = err.to_string();
        assert!(msg.contains("TEST_SECS"), "message: {msg}");
        assert!(msg.contains("soon"), "message: {msg}");
    }
}
