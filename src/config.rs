//! Run configuration
//!
//! Resolves raw CLI/environment input into an immutable [`HealthCheckConfig`].
//! Cross-field invariants are enforced here, before any network activity:
//! a run that would need auth material it does not have must fail during
//! resolution, not mid-probe.

use reqwest::header::HeaderValue;
use reqwest::Url;
use thiserror::Error;

/// Default primary endpoint.
pub const DEFAULT_TARGET_URL: &str = "https://api.github.com";

/// Default top-level field expected in the response body.
pub const DEFAULT_EXPECTED_FIELD: &str = "current_user_url";

/// Default per-request abort deadline.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Default inclusive latency budget.
pub const DEFAULT_MAX_LATENCY_MS: u64 = 1_000;

/// Default content-type substring expectation.
pub const DEFAULT_EXPECTED_CONTENT_TYPE: &str = "application/json";

/// User-Agent sent on every probe.
pub const DEFAULT_USER_AGENT: &str = "ci-healthcheck";

/// Accept header sent on every probe.
pub const DEFAULT_ACCEPT: &str = "application/vnd.github+json";

/// Raw, unvalidated input for one run.
///
/// Absent fields fall back to the documented defaults during resolution.
#[derive(Debug, Clone, Default)]
pub struct RawConfig {
    pub target_url: Option<String>,
    pub expected_field: Option<String>,
    pub timeout_ms: Option<u64>,
    pub max_latency_ms: Option<u64>,
    pub expected_content_type: Option<String>,
    pub auth_enabled: bool,
    pub auth_url: Option<String>,
    pub auth_token: Option<String>,
}

/// Immutable configuration for one verification run.
#[derive(Debug, Clone)]
pub struct HealthCheckConfig {
    /// Absolute URL of the primary endpoint
    pub target_url: String,

    /// Top-level key that must exist in the primary response body
    pub expected_field: String,

    /// Per-request abort deadline in milliseconds
    pub timeout_ms: u64,

    /// Inclusive upper bound on observed latency in milliseconds
    pub max_latency_ms: u64,

    /// Substring matched case-insensitively against the content-type header
    pub expected_content_type: String,

    /// Whether the two-sided authentication verification runs
    pub auth_enabled: bool,

    /// Authenticated endpoint, present whenever `auth_enabled`
    pub auth_url: Option<String>,

    /// Bearer credential, present whenever `auth_enabled`
    pub auth_token: Option<String>,

    /// User-Agent sent on every probe
    pub user_agent: String,

    /// Accept header sent on every probe
    pub accept: String,
}

impl HealthCheckConfig {
    /// Validate raw input and apply defaults.
    pub fn resolve(raw: RawConfig) -> Result<Self, ConfigError> {
        let target_url = raw
            .target_url
            .unwrap_or_else(|| DEFAULT_TARGET_URL.to_string());
        require_absolute_http_url("target_url", &target_url)?;

        let timeout_ms = raw.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(ConfigError::NonPositiveDuration {
                field: "timeout_ms",
            });
        }

        let max_latency_ms = raw.max_latency_ms.unwrap_or(DEFAULT_MAX_LATENCY_MS);
        if max_latency_ms == 0 {
            return Err(ConfigError::NonPositiveDuration {
                field: "max_latency_ms",
            });
        }

        let expected_field = raw
            .expected_field
            .unwrap_or_else(|| DEFAULT_EXPECTED_FIELD.to_string());
        if expected_field.is_empty() {
            return Err(ConfigError::MissingField {
                field: "expected_field",
            });
        }

        let (auth_url, auth_token) = if raw.auth_enabled {
            let auth_url = match raw.auth_url {
                Some(url) if !url.is_empty() => url,
                _ => return Err(ConfigError::MissingAuthField { field: "auth_url" }),
            };
            require_absolute_http_url("auth_url", &auth_url)?;

            let auth_token = match raw.auth_token {
                Some(token) if !token.is_empty() => token,
                _ => {
                    return Err(ConfigError::MissingAuthField {
                        field: "auth_token",
                    })
                }
            };
            // The credential ends up in a request header; reject values a
            // header cannot carry before any probe is attempted.
            let bearer = format!("Bearer {}", auth_token);
            if HeaderValue::from_str(&bearer).is_err() {
                return Err(ConfigError::InvalidHeaderValue {
                    field: "auth_token",
                });
            }

            (Some(auth_url), Some(auth_token))
        } else {
            (None, None)
        };

        Ok(Self {
            target_url,
            expected_field,
            timeout_ms,
            max_latency_ms,
            expected_content_type: raw
                .expected_content_type
                .unwrap_or_else(|| DEFAULT_EXPECTED_CONTENT_TYPE.to_string()),
            auth_enabled: raw.auth_enabled,
            auth_url,
            auth_token,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
        })
    }
}

fn require_absolute_http_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
        }),
    }
}

/// Pre-flight configuration error. Never network-related.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required field is missing or empty
    #[error("{field} is required but missing or empty")]
    MissingField { field: &'static str },

    /// Auth verification was enabled without its required material
    #[error("auth checks enabled but {field} not set")]
    MissingAuthField { field: &'static str },

    /// A duration field must be a positive number of milliseconds
    #[error("{field} must be a positive number of milliseconds")]
    NonPositiveDuration { field: &'static str },

    /// A URL field did not parse as an absolute http(s) URL
    #[error("{field} is not an absolute http(s) URL: \"{value}\"")]
    InvalidUrl { field: &'static str, value: String },

    /// A field destined for a request header holds bytes a header cannot carry
    #[error("{field} contains characters not permitted in a request header")]
    InvalidHeaderValue { field: &'static str },
}
