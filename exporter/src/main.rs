// src/main.rs
//
// Stock exporter binary that wires up the library:
//
// - env-derived configuration
// - Prometheus registry + /metrics exposition server
// - HTTP status client against the node's chain API
// - poll loop driving the chain-head metrics at a fixed interval.

use std::sync::Arc;

use nodeos_exporter::{
    DefaultStatusPoller, ExporterConfig, HttpStatusClient, MetricsRegistry, StatusPoller,
    run_prometheus_http_server,
};

#[tokio::main]
async fn main() {
    // Basic tracing setup.
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "nodeos_exporter=info".to_string()),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cfg = ExporterConfig::from_env().map_err(|e| format!("invalid configuration: {e}"))?;

    // ---------------------------
    // Metrics registry + exposition
    // ---------------------------

    let metrics = Arc::new(
        MetricsRegistry::new()
            .map_err(|e| format!("failed to initialise metrics registry: {e}"))?,
    );

    // Bind before the poll loop starts: a bad listen address must be
    // fatal, not a silently dead /metrics endpoint.
    let listener = tokio::net::TcpListener::bind(cfg.metrics.listen_addr)
        .await
        .map_err(|e| format!("failed to bind {}: {e}", cfg.metrics.listen_addr))?;

    tracing::info!(
        "metrics exporter listening on http://{}/metrics",
        cfg.metrics.listen_addr
    );
    tokio::spawn(run_prometheus_http_server(listener, metrics.clone()));

    // ---------------------------
    // Upstream client + poll loop
    // ---------------------------

    let client = HttpStatusClient::new(cfg.upstream.base_url.clone(), cfg.upstream.timeout)
        .map_err(|e| format!("failed to create status client: {e}"))?;

    tracing::info!(
        url = %cfg.upstream.base_url,
        interval_secs = cfg.poll.interval.as_secs(),
        "polling node status"
    );

    let poller: DefaultStatusPoller = StatusPoller::new(client, metrics, cfg.poll.interval);
    poller.run().await;

    Ok(())
}
