//! HTTP status client.
//!
//! This implementation of [`crate::poller::StatusSource`] talks to the
//! node's chain API over HTTP. It assumes the node exposes a JSON API
//! of the form:
//!
//! ```json
//! GET /v1/chain/get_info
//!
//! Response:
//! {
//!   "head_block_num": 286843,
//!   "head_block_time": "2024-01-01T00:00:00.500",
//!   "head_block_producer": "eosio",
//!   "last_irreversible_block_num": 286518,
//!   "last_irreversible_block_time": "2024-01-01T00:00:00.000",
//!   ...
//! }
//! ```
//!
//! Fields beyond the [`StatusRecord`] subset are ignored, so the client
//! stays compatible as the node adds response fields.

use std::time::Duration;

use reqwest::Client;

use crate::poller::{FetchError, StatusSource};
use crate::types::StatusRecord;

/// Path of the chain status endpoint, relative to the node base URL.
const STATUS_PATH: &str = "/v1/chain/get_info";

/// HTTP client for the node's status endpoint.
///
/// Thread-safe and cheap to share; the inner reqwest client pools
/// connections. The timeout bounds the whole request, connect
/// included.
pub struct HttpStatusClient {
    base_url: String,
    client: Client,
}

impl HttpStatusClient {
    /// Constructs a new status client pointing at `base_url`.
    ///
    /// `base_url` should be the root of the node's chain API, e.g.
    /// `"http://node:8888"` (without a trailing slash).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        // Avoid accidental double slashes.
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl StatusSource for HttpStatusClient {
    async fn fetch_status(&self) -> Result<StatusRecord, FetchError> {
        let url = self.endpoint(STATUS_PATH);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(format!("HTTP GET {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        resp.json::<StatusRecord>()
            .await
            .map_err(|e| FetchError::Decode(format!("failed to parse JSON response: {e}")))
    }
}
