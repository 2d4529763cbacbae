//! Prometheus-backed metrics and HTTP exposition.
//!
//! This module defines a [`MetricsRegistry`] that owns a Prometheus
//! registry and the strongly-typed chain-head metrics, and an async
//! HTTP server that serves `/metrics` using `hyper`.

use std::{convert::Infallible, sync::Arc};

use bytes::Bytes;
use http_body_util::Full;
use hyper::{
    Method, Request, Response, StatusCode, body::Incoming, header, server::conn::http1,
    service::service_fn,
};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::warn;

use prometheus::{self, Encoder, Gauge, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};

/// Chain-head metrics fed by the poll loop.
///
/// These are registered into a [`Registry`] and rewritten once per
/// successful poll cycle. Series names and help strings match what
/// fleet dashboards already scrape.
pub struct ChainMetrics {
    /// Current head block number.
    pub head_block_number: IntGauge,
    /// Head block timestamp as fractional Unix seconds.
    pub head_block_time: Gauge,
    /// Active head producer; exactly one label entry carries 1, stale
    /// entries are removed rather than zeroed.
    pub head_block_producer: IntGaugeVec,
    /// Last irreversible block number.
    pub last_irreversible_block_number: IntGauge,
    /// Last irreversible block timestamp as fractional Unix seconds.
    pub last_irreversible_block_time: Gauge,
    /// Rounds begun per producer since the exporter started.
    pub producer_rounds: IntGaugeVec,
}

impl ChainMetrics {
    /// Registers the chain-head metrics into the given `Registry`.
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        // Head block progression.
        let head_block_number =
            IntGauge::with_opts(Opts::new("head_block_number", "Head block number"))?;
        registry.register(Box::new(head_block_number.clone()))?;

        let head_block_time = Gauge::with_opts(Opts::new(
            "head_block_time",
            "Head block time as Unix timestamp",
        ))?;
        registry.register(Box::new(head_block_time.clone()))?;

        // Active producer, one label entry at a time.
        let head_block_producer = IntGaugeVec::new(
            Opts::new("head_block_producer", "Head block producer"),
            &["producer"],
        )?;
        registry.register(Box::new(head_block_producer.clone()))?;

        // Irreversibility watermark.
        let last_irreversible_block_number = IntGauge::with_opts(Opts::new(
            "last_irreversible_block_number",
            "Last irreversible block number",
        ))?;
        registry.register(Box::new(last_irreversible_block_number.clone()))?;

        let last_irreversible_block_time = Gauge::with_opts(Opts::new(
            "last_irreversible_block_time",
            "Last irreversible block time as Unix timestamp",
        ))?;
        registry.register(Box::new(last_irreversible_block_time.clone()))?;

        // Rotation counts, one monotone entry per producer.
        let producer_rounds = IntGaugeVec::new(
            Opts::new(
                "producer_rounds",
                "Number of rounds completed by each producer",
            ),
            &["producer"],
        )?;
        registry.register(Box::new(producer_rounds.clone()))?;

        Ok(Self {
            head_block_number,
            head_block_time,
            head_block_producer,
            last_irreversible_block_number,
            last_irreversible_block_time,
            producer_rounds,
        })
    }
}

/// Wrapper around a Prometheus registry and the chain-head metrics.
///
/// The main handle shared between the poll loop and the exposition
/// server, typically inside an [`Arc`]. The [`Mutex`] around
/// [`ChainMetrics`] makes each poll cycle's writes atomic with respect
/// to scrapes: a reader sees the registry before or after a cycle,
/// never mid-update (the producer series in particular is cleared and
/// re-set as one step).
pub struct MetricsRegistry {
    registry: Registry,
    pub chain: Mutex<ChainMetrics>,
}

impl MetricsRegistry {
    /// Creates a new `MetricsRegistry` with a fresh underlying `Registry`
    /// and registers the chain-head metrics under the `nodeos` namespace.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("nodeos".to_string()), None)?;
        let chain = ChainMetrics::register(&registry)?;
        Ok(Self {
            registry,
            chain: Mutex::new(chain),
        })
    }

    /// Encodes all metrics in this registry into the Prometheus text format.
    ///
    /// Read-only and idempotent. Takes the chain lock, so it cannot
    /// interleave with a poll cycle's writes.
    pub async fn gather_text(&self) -> String {
        let _chain = self.chain.lock().await;
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            warn!(error = %e, "failed to encode Prometheus metrics");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

/// Runs an HTTP server that exposes Prometheus metrics.
///
/// Serves `GET /metrics` with the Prometheus text exposition format on
/// an already-bound listener; all other paths return 404. Binding is
/// left to the caller so that a bad listen address fails startup
/// instead of leaving a silently dead exporter. Intended to be spawned
/// onto a Tokio runtime, e.g.:
///
/// ```ignore
/// let metrics = Arc::new(MetricsRegistry::new()?);
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
/// tokio::spawn(run_prometheus_http_server(listener, metrics.clone()));
/// ```
pub async fn run_prometheus_http_server(listener: TcpListener, metrics: Arc<MetricsRegistry>) {
    loop {
        let (stream, _) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "failed to accept metrics connection");
                continue;
            }
        };
        let io = TokioIo::new(stream);
        let metrics = metrics.clone();

        tokio::spawn(async move {
            let svc = service_fn(move |req| {
                let metrics = metrics.clone();
                handle_request(req, metrics)
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, svc).await {
                warn!(error = %err, "metrics connection error");
            }
        });
    }
}

async fn handle_request(
    req: Request<Incoming>,
    metrics: Arc<MetricsRegistry>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, "/metrics") => {
            let body = metrics.gather_text().await;
            Ok(Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
                .body(Full::new(Bytes::from(body)))
                .unwrap())
        }
        _ => Ok(Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from("not found")))
            .unwrap()),
    }
}
