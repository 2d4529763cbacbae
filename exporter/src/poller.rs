//! Periodic status polling.
//!
//! [`StatusPoller`] drives the fetch, decode, rotate, record cycle at a
//! fixed cadence. The upstream node is reached through the
//! [`StatusSource`] seam so tests can script responses without a
//! network.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::metrics::MetricsRegistry;
use crate::rotation::{Rotation, RotationTracker};
use crate::types::{HeadSnapshot, StatusRecord};

/// Errors that can occur while fetching the node status.
#[derive(Debug)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, IO).
    Transport(String),
    /// The node answered with a non-success HTTP status.
    Status(u16),
    /// The response body was not a valid status record.
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "transport error: {msg}"),
            FetchError::Status(code) => write!(f, "node returned HTTP status {code}"),
            FetchError::Decode(msg) => write!(f, "malformed status response: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Abstract source of node status records.
///
/// Implementations contact the node (e.g. over HTTP) and produce one
/// [`StatusRecord`] per call. Failures are returned, never panicked.
pub trait StatusSource: Send + Sync {
    fn fetch_status(&self) -> impl Future<Output = Result<StatusRecord, FetchError>> + Send;
}

/// Drives the poll cycle against a [`StatusSource`].
///
/// One instance is the sole writer of both the rotation tracker and
/// the metrics registry; scrapes only ever read.
pub struct StatusPoller<S> {
    source: S,
    metrics: Arc<MetricsRegistry>,
    tracker: RotationTracker,
    interval: Duration,
}

impl<S: StatusSource> StatusPoller<S> {
    pub fn new(source: S, metrics: Arc<MetricsRegistry>, interval: Duration) -> Self {
        Self {
            source,
            metrics,
            tracker: RotationTracker::new(),
            interval,
        }
    }

    /// Rotation state accumulated so far.
    pub fn tracker(&self) -> &RotationTracker {
        &self.tracker
    }

    /// Runs one fetch/record cycle.
    ///
    /// Any failure is logged and swallowed: the registry keeps serving
    /// the last good values and the next cycle retries from scratch.
    pub async fn poll_once(&mut self) {
        let record = match self.source.fetch_status().await {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "status fetch failed, keeping previous metrics");
                return;
            }
        };

        let head = match HeadSnapshot::from_record(&record) {
            Ok(head) => head,
            Err(e) => {
                warn!(error = %e, "invalid status record, keeping previous metrics");
                return;
            }
        };

        let rotation = self.tracker.observe(&head.producer);

        // One lock hold covers the whole cycle's writes, so a scrape
        // sees either none or all of them.
        {
            let chain = self.metrics.chain.lock().await;
            chain.head_block_number.set(head.head_block_num as i64);
            chain.head_block_time.set(head.head_block_time);
            if let Rotation::NewRound { rounds } = rotation {
                chain
                    .producer_rounds
                    .with_label_values(&[head.producer.as_str()])
                    .set(rounds as i64);
                // Remove the previous producer's entry rather than zero it.
                chain.head_block_producer.reset();
            }
            chain
                .head_block_producer
                .with_label_values(&[head.producer.as_str()])
                .set(1);
            chain
                .last_irreversible_block_number
                .set(head.last_irreversible_block_num as i64);
            chain
                .last_irreversible_block_time
                .set(head.last_irreversible_block_time);
        }

        debug!(
            head = head.head_block_num,
            producer = %head.producer,
            "recorded node status"
        );
    }

    /// Polls forever. Sleeps after each cycle completes, so the
    /// effective period is the interval plus processing time.
    pub async fn run(mut self) {
        info!(
            interval_secs = self.interval.as_secs(),
            "status poller running"
        );
        loop {
            self.poll_once().await;
            tokio::time::sleep(self.interval).await;
        }
    }
}
