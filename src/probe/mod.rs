//! Probe execution
//!
//! Issues a single HTTP GET bound to a [`Deadline`] and measures wall-clock
//! latency. Exactly one attempt per invocation; retry policy, if any,
//! belongs to the caller.

mod timeout;

pub use timeout::Deadline;

use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, USER_AGENT};

use crate::config::HealthCheckConfig;
use crate::contracts::{ProbeFailure, ProbeResponse};

/// Issues probes against remote endpoints.
///
/// One `reqwest` client is shared across the probes of a run; the deadline
/// is armed fresh per probe.
pub struct ProbeExecutor {
    client: reqwest::Client,
    timeout: Duration,
    user_agent: String,
    accept: String,
}

impl ProbeExecutor {
    /// Build an executor from the run configuration.
    pub fn new(config: &HealthCheckConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            timeout: Duration::from_millis(config.timeout_ms),
            user_agent: config.user_agent.clone(),
            accept: config.accept.clone(),
        })
    }

    /// Issue one GET against `url`.
    ///
    /// `User-Agent` and `Accept` are always set; `extra_headers` are applied
    /// on top (the auth verifier passes the bearer credential this way).
    /// The send is race-joined against the deadline: if the timer fires
    /// first the in-flight request is aborted and a timeout failure is
    /// returned, never a partial response. The loser of the race is
    /// discarded on both paths.
    pub async fn execute(
        &self,
        url: &str,
        extra_headers: &[(&str, String)],
    ) -> Result<ProbeResponse, ProbeFailure> {
        let mut request = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, &self.accept);
        for (name, value) in extra_headers {
            request = request.header(*name, value.as_str());
        }

        let timeout_ms = self.timeout.as_millis() as u64;
        let mut deadline = Deadline::arm(self.timeout);
        let started = Instant::now();

        tracing::debug!(url = %url, timeout_ms, "issuing probe");

        // Race the send against the deadline; the losing future is dropped
        // when the select ends, before either branch is acted on.
        let raced = tokio::select! {
            result = request.send() => Some(result),
            _ = deadline.fired() => None,
        };

        let response = match raced {
            Some(result) => {
                deadline.release();
                result?
            }
            None => {
                tracing::warn!(url = %url, timeout_ms, "probe aborted by deadline");
                return Err(ProbeFailure::Timeout { timeout_ms });
            }
        };

        // Latency is issue-to-response-head; body bytes are read afterwards
        // and decoded lazily by the pipeline.
        let latency_ms = started.elapsed().as_millis() as u64;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(url = %url, status, latency_ms, "probe completed");

        Ok(ProbeResponse {
            status,
            headers,
            latency_ms,
            body,
        })
    }
}
