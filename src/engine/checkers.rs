//! Assertion checkers
//!
//! The individual verification stages run by the pipeline, in the order
//! they are wired: status, latency, content-type, body shape. Each check
//! is a pure function of the captured response and the run configuration.

use crate::config::HealthCheckConfig;
use crate::contracts::{FailureCause, ProbeResponse};

/// A single verification stage.
pub trait Check: Send + Sync {
    /// Checker identifier, used in logs
    fn id(&self) -> &'static str;

    /// Evaluate the stage against a captured response
    fn evaluate(
        &self,
        response: &ProbeResponse,
        config: &HealthCheckConfig,
    ) -> Result<(), CheckFailure>;
}

/// A failed stage with its observed-vs-expected detail.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckFailure {
    pub cause: FailureCause,
    pub detail: String,
}

impl CheckFailure {
    fn new(cause: FailureCause, detail: impl Into<String>) -> Self {
        Self {
            cause,
            detail: detail.into(),
        }
    }
}

/// Status must equal 200 exactly; any other value, including other 2xx,
/// fails.
pub struct StatusCheck;

impl Check for StatusCheck {
    fn id(&self) -> &'static str {
        "status"
    }

    fn evaluate(
        &self,
        response: &ProbeResponse,
        _config: &HealthCheckConfig,
    ) -> Result<(), CheckFailure> {
        if response.status == 200 {
            Ok(())
        } else {
            Err(CheckFailure::new(
                FailureCause::UnexpectedStatus,
                format!("expected status 200, got {}", response.status),
            ))
        }
    }
}

/// Probe-measured latency must stay within the configured budget. Uses the
/// latency recorded during the probe; nothing is re-measured here.
pub struct LatencyCheck;

impl Check for LatencyCheck {
    fn id(&self) -> &'static str {
        "latency"
    }

    fn evaluate(
        &self,
        response: &ProbeResponse,
        config: &HealthCheckConfig,
    ) -> Result<(), CheckFailure> {
        if response.latency_ms <= config.max_latency_ms {
            Ok(())
        } else {
            Err(CheckFailure::new(
                FailureCause::LatencyExceeded,
                format!(
                    "latency {}ms exceeded the {}ms budget",
                    response.latency_ms, config.max_latency_ms
                ),
            ))
        }
    }
}

/// Content-type header, lower-cased, must contain the expected substring.
/// An absent header is treated as the empty string.
pub struct ContentTypeCheck;

impl Check for ContentTypeCheck {
    fn id(&self) -> &'static str {
        "content_type"
    }

    fn evaluate(
        &self,
        response: &ProbeResponse,
        config: &HealthCheckConfig,
    ) -> Result<(), CheckFailure> {
        let observed = response.content_type();
        let matches = observed
            .to_lowercase()
            .contains(&config.expected_content_type.to_lowercase());
        if matches {
            Ok(())
        } else {
            let shown = if observed.is_empty() { "(none)" } else { observed };
            Err(CheckFailure::new(
                FailureCause::ContentTypeMismatch,
                format!(
                    "expected content-type to include \"{}\", got \"{}\"",
                    config.expected_content_type, shown
                ),
            ))
        }
    }
}

/// Body must decode as JSON and contain the expected top-level field. The
/// field's value may be anything, including null.
pub struct BodyShapeCheck;

impl Check for BodyShapeCheck {
    fn id(&self) -> &'static str {
        "body_shape"
    }

    fn evaluate(
        &self,
        response: &ProbeResponse,
        config: &HealthCheckConfig,
    ) -> Result<(), CheckFailure> {
        let value = match response.json() {
            Ok(value) => value,
            Err(err) => {
                return Err(CheckFailure::new(FailureCause::BodyDecodeError, err.to_string()))
            }
        };

        match value.as_object() {
            Some(map) if map.contains_key(&config.expected_field) => Ok(()),
            _ => Err(CheckFailure::new(
                FailureCause::MissingField,
                format!(
                    "missing expected top-level field \"{}\"",
                    config.expected_field
                ),
            )),
        }
    }
}
