//! Probe attempt types
//!
//! A probe is one outbound HTTP request issued for verification. It either
//! yields a captured response or a typed failure carrying no response data.

use reqwest::header::{HeaderMap, CONTENT_TYPE};

/// Response captured from a single probe attempt.
///
/// Body bytes are carried raw; JSON decoding is deferred until a check
/// asks for it, so a malformed payload surfaces as [`BodyDecodeError`]
/// rather than a transport failure.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    /// HTTP status code
    pub status: u16,

    /// Response headers
    pub headers: HeaderMap,

    /// Wall-clock delta from issue to response-head completion
    pub latency_ms: u64,

    /// Raw body bytes
    pub body: Vec<u8>,
}

impl ProbeResponse {
    /// Content-type header value, or the empty string when the header is
    /// absent or not valid UTF-8.
    pub fn content_type(&self) -> &str {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
    }

    /// Decode the body as JSON on demand.
    pub fn json(&self) -> Result<serde_json::Value, BodyDecodeError> {
        serde_json::from_slice(&self.body).map_err(BodyDecodeError)
    }
}

/// Probe attempt that produced no usable response.
#[derive(Debug, thiserror::Error)]
pub enum ProbeFailure {
    /// The deadline fired before the response head arrived; the in-flight
    /// request was aborted.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The transport failed before the deadline (DNS, connect, TLS).
    #[error("network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },
}

/// Body bytes that could not be decoded as JSON.
#[derive(Debug, thiserror::Error)]
#[error("body is not valid JSON: {0}")]
pub struct BodyDecodeError(pub serde_json::Error);
