//! I/O boundary traits for testability
//!
//! These traits abstract the network and the clock, allowing the resolver
//! to be tested with in-memory implementations.

use std::time::Duration;

use thiserror::Error;
use tracing::trace;

/// Failure to obtain a response body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Synchronous HTTP GET.
pub trait HttpClient: Send + Sync {
    /// Fetch `url` and return the body of a 2xx response.
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

/// Blocking delay used for upstream rate limiting.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

const USER_AGENT: &str = concat!("regiontree/", env!("CARGO_PKG_VERSION"));

/// HTTP client backed by `reqwest::blocking`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::Request(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        trace!(status = status.as_u16(), "geonames response");
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: response.url().path().to_string(),
            });
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| TransportError::Body(e.to_string()))
    }
}

/// Real sleeper: parks the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}
