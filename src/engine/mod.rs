//! Health check engine
//!
//! Ordered assertion pipeline over a captured probe attempt. Checks run in
//! a fixed sequence and evaluation stops at the first failure, so a 5xx is
//! never reported as slow or wrong-shaped.

pub mod auth;
mod checkers;

pub use checkers::*;

use crate::config::HealthCheckConfig;
use crate::contracts::{CheckOutcome, ProbeFailure, ProbeResponse};

/// The fixed-order assertion pipeline.
pub struct AssertionPipeline {
    checks: Vec<Box<dyn Check>>,
}

impl Default for AssertionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl AssertionPipeline {
    /// Create the pipeline with its fixed stage order: status, latency,
    /// content-type, body shape.
    pub fn new() -> Self {
        Self {
            checks: vec![
                Box::new(StatusCheck),
                Box::new(LatencyCheck),
                Box::new(ContentTypeCheck),
                Box::new(BodyShapeCheck),
            ],
        }
    }

    /// Evaluate a probe attempt against the configured assertions.
    ///
    /// A probe-level failure maps straight to a failed outcome without
    /// running any check. Pure: the same attempt and config always produce
    /// the same outcome.
    pub fn evaluate(
        &self,
        attempt: &Result<ProbeResponse, ProbeFailure>,
        config: &HealthCheckConfig,
    ) -> CheckOutcome {
        let response = match attempt {
            Ok(response) => response,
            Err(failure) => return CheckOutcome::from_probe_failure(failure),
        };

        for check in &self.checks {
            if let Err(failure) = check.evaluate(response, config) {
                tracing::debug!(check = check.id(), detail = %failure.detail, "assertion failed");
                return CheckOutcome::failing(
                    failure.cause,
                    failure.detail,
                    Some(response.status),
                    Some(response.latency_ms),
                );
            }
        }

        CheckOutcome::passing(response.status, response.latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawConfig;
    use crate::contracts::FailureCause;
    use proptest::prelude::*;
    use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

    fn test_config() -> HealthCheckConfig {
        HealthCheckConfig::resolve(RawConfig {
            target_url: Some("https://svc.example.com".to_string()),
            expected_field: Some("current_user_url".to_string()),
            max_latency_ms: Some(1000),
            ..RawConfig::default()
        })
        .unwrap()
    }

    fn json_response(status: u16, latency_ms: u64, body: &str) -> ProbeResponse {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        ProbeResponse {
            status,
            headers,
            latency_ms,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_all_assertions_held() {
        let config = test_config();
        let attempt = Ok(json_response(
            200,
            300,
            r#"{"current_user_url":"https://api.github.com/user"}"#,
        ));
        let outcome = AssertionPipeline::new().evaluate(&attempt, &config);
        assert!(outcome.passed);
        assert_eq!(outcome.status, Some(200));
        assert_eq!(outcome.latency_ms, Some(300));
    }

    #[test]
    fn test_status_failure_short_circuits_everything_else() {
        let config = test_config();
        // Slow, wrong content type, garbage body: only the status failure
        // may be reported.
        let mut response = json_response(500, 9999, "not json");
        response.headers.remove(CONTENT_TYPE);
        let outcome = AssertionPipeline::new().evaluate(&Ok(response), &config);
        assert!(!outcome.passed);
        assert_eq!(outcome.failed_assertion, Some(FailureCause::UnexpectedStatus));
    }

    #[test]
    fn test_latency_failure_reported_before_body_checks() {
        let config = test_config();
        let response = json_response(200, 1500, "not json");
        let outcome = AssertionPipeline::new().evaluate(&Ok(response), &config);
        assert_eq!(outcome.failed_assertion, Some(FailureCause::LatencyExceeded));
        // The probe's measurements survive into the outcome.
        assert_eq!(outcome.status, Some(200));
        assert_eq!(outcome.latency_ms, Some(1500));
    }

    #[test]
    fn test_probe_timeout_bypasses_all_checks() {
        let config = test_config();
        let attempt = Err(ProbeFailure::Timeout { timeout_ms: 5000 });
        let outcome = AssertionPipeline::new().evaluate(&attempt, &config);
        assert!(!outcome.passed);
        assert_eq!(outcome.failed_assertion, Some(FailureCause::Timeout));
        assert_eq!(outcome.status, None);
    }

    proptest! {
        // Evaluating the same attempt twice always yields the same outcome.
        #[test]
        fn test_evaluate_is_deterministic(
            status in 100u16..600,
            latency_ms in 0u64..5000,
            has_field in any::<bool>(),
        ) {
            let config = test_config();
            let body = if has_field {
                r#"{"current_user_url":"x"}"#
            } else {
                r#"{"something_else":"x"}"#
            };
            let attempt = Ok(json_response(status, latency_ms, body));
            let pipeline = AssertionPipeline::new();
            let first = pipeline.evaluate(&attempt, &config);
            let second = pipeline.evaluate(&attempt, &config);
            prop_assert_eq!(first, second);
        }
    }
}
