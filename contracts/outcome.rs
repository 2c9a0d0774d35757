//! Verification outcomes
//!
//! One [`CheckOutcome`] per run from the assertion pipeline, plus the
//! [`AuthOutcome`] of the optional two-sided authentication probe.

use serde::Serialize;
use std::fmt;

use super::ProbeFailure;

/// Cause of a failed verification stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCause {
    /// Status was not exactly 200
    UnexpectedStatus,
    /// Measured latency exceeded the configured budget
    LatencyExceeded,
    /// Content-type header did not contain the expected substring
    ContentTypeMismatch,
    /// Body bytes were not valid JSON
    BodyDecodeError,
    /// Decoded body lacked the expected top-level field
    MissingField,
    /// Probe aborted by the deadline
    Timeout,
    /// Probe failed at the transport layer
    NetworkError,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::UnexpectedStatus => write!(f, "unexpected_status"),
            FailureCause::LatencyExceeded => write!(f, "latency_exceeded"),
            FailureCause::ContentTypeMismatch => write!(f, "content_type_mismatch"),
            FailureCause::BodyDecodeError => write!(f, "body_decode_error"),
            FailureCause::MissingField => write!(f, "missing_field"),
            FailureCause::Timeout => write!(f, "timeout"),
            FailureCause::NetworkError => write!(f, "network_error"),
        }
    }
}

/// Result of running the assertion pipeline against one probe attempt.
///
/// Constructed once per run and never mutated afterwards; consumed exactly
/// once by the reporter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    /// Every configured assertion held
    pub passed: bool,

    /// First failing assertion, when not passed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_assertion: Option<FailureCause>,

    /// Observed-vs-expected detail for the summary
    pub detail: String,

    /// Status observed by the probe; absent when the probe itself failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Latency observed by the probe; absent when the probe itself failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl CheckOutcome {
    /// Create a passing outcome.
    pub fn passing(status: u16, latency_ms: u64) -> Self {
        Self {
            passed: true,
            failed_assertion: None,
            detail: "all assertions held".to_string(),
            status: Some(status),
            latency_ms: Some(latency_ms),
        }
    }

    /// Create a failing outcome attributed to one assertion.
    pub fn failing(
        cause: FailureCause,
        detail: impl Into<String>,
        status: Option<u16>,
        latency_ms: Option<u64>,
    ) -> Self {
        Self {
            passed: false,
            failed_assertion: Some(cause),
            detail: detail.into(),
            status,
            latency_ms,
        }
    }

    /// Map a probe-level failure into an outcome without running any check.
    pub fn from_probe_failure(failure: &ProbeFailure) -> Self {
        let cause = match failure {
            ProbeFailure::Timeout { .. } => FailureCause::Timeout,
            ProbeFailure::Network { .. } => FailureCause::NetworkError,
        };
        Self::failing(cause, failure.to_string(), None, None)
    }
}

/// Result of the two-sided authentication verification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthOutcome {
    /// Both the authorized and the unauthorized probe behaved as required
    pub passed: bool,

    /// Failing path, when not passed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<AuthFailure>,

    /// Status observed on the authorized probe, when one arrived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized_status: Option<u16>,

    /// Status observed on the unauthorized probe, when one arrived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unauthorized_status: Option<u16>,
}

impl AuthOutcome {
    /// Create a passing outcome with the observed statuses.
    pub fn passing(authorized_status: u16, unauthorized_status: u16) -> Self {
        Self {
            passed: true,
            failure: None,
            authorized_status: Some(authorized_status),
            unauthorized_status: Some(unauthorized_status),
        }
    }

    /// Create a failing outcome attributed to one path.
    pub fn failing(
        failure: AuthFailure,
        authorized_status: Option<u16>,
        unauthorized_status: Option<u16>,
    ) -> Self {
        Self {
            passed: false,
            failure: Some(failure),
            authorized_status,
            unauthorized_status,
        }
    }
}

/// Which side of the authentication verification failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "path", rename_all = "snake_case")]
pub enum AuthFailure {
    /// The authorized request did not succeed
    HappyPath { detail: String },

    /// The unauthorized request was not rejected
    SadPath { detail: String },
}

impl AuthFailure {
    /// Observed-vs-expected detail for the summary.
    pub fn detail(&self) -> &str {
        match self {
            AuthFailure::HappyPath { detail } | AuthFailure::SadPath { detail } => detail,
        }
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthFailure::HappyPath { detail } => write!(f, "auth happy path failed: {}", detail),
            AuthFailure::SadPath { detail } => write!(f, "auth sad path failed: {}", detail),
        }
    }
}
