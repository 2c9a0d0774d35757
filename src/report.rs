//! Run reporting
//!
//! Pure aggregation of the pipeline and auth outcomes into a single
//! process-level result, plus its rendering. The reporter produces
//! strings; the binary decides where they go and maps success to the
//! exit code.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use uuid::Uuid;

use crate::config::HealthCheckConfig;
use crate::contracts::{AuthOutcome, CheckOutcome};

/// Output format for the run summary.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable summary with colors
    #[default]
    Text,
    /// JSON for machine processing
    Json,
}

/// Aggregated result of one verification run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Run identifier for correlation
    pub run_id: Uuid,

    /// Primary endpoint that was verified
    pub target_url: String,

    /// Overall result: primary outcome passed and, when enabled, both
    /// auth paths passed
    pub success: bool,

    /// Primary pipeline outcome
    pub check: CheckOutcome,

    /// Auth verification outcome, present only when auth was enabled and
    /// reached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthOutcome>,

    /// Configured per-request deadline
    pub timeout_ms: u64,

    /// Configured latency budget
    pub max_latency_ms: u64,

    /// Expected top-level body field
    pub expected_field: String,

    /// Expected content-type substring
    pub expected_content_type: String,

    /// Completion timestamp
    pub completed_at: DateTime<Utc>,
}

impl RunReport {
    /// Aggregate outcomes into the process-level result.
    pub fn aggregate(
        config: &HealthCheckConfig,
        check: CheckOutcome,
        auth: Option<AuthOutcome>,
    ) -> Self {
        let success = check.passed && auth.as_ref().map_or(true, |outcome| outcome.passed);
        Self {
            run_id: Uuid::new_v4(),
            target_url: config.target_url.clone(),
            success,
            check,
            auth,
            timeout_ms: config.timeout_ms,
            max_latency_ms: config.max_latency_ms,
            expected_field: config.expected_field.clone(),
            expected_content_type: config.expected_content_type.clone(),
            completed_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Single-line cause for the error channel; present iff the run failed.
    pub fn failure_cause(&self) -> Option<String> {
        if self.success {
            return None;
        }
        if let Some(cause) = self.check.failed_assertion {
            return Some(format!("{}: {}", cause, self.check.detail));
        }
        if let Some(outcome) = &self.auth {
            if let Some(failure) = &outcome.failure {
                return Some(failure.to_string());
            }
        }
        // Aggregation invariant: a failed run names its cause above.
        Some("verification failed".to_string())
    }

    /// Render the report in the requested format.
    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(self),
            OutputFormat::Text => Ok(self.render_text()),
        }
    }

    fn render_text(&self) -> String {
        let mut lines = Vec::new();

        if self.success {
            lines.push(format!("{} {}", "+".green(), "health check passed".green().bold()));
        } else {
            lines.push(format!("{} {}", "x".red(), "health check failed".red().bold()));
        }

        lines.push(format!("  {} {}", "url:".dimmed(), self.target_url));

        if let Some(cause) = self.failure_cause() {
            lines.push(format!("  {} {}", "cause:".dimmed(), cause.red()));
        }

        if let Some(status) = self.check.status {
            lines.push(format!("  {} {}", "status:".dimmed(), status));
        }
        if let Some(latency_ms) = self.check.latency_ms {
            lines.push(format!(
                "  {} {}ms (budget {}ms)",
                "latency:".dimmed(),
                latency_ms,
                self.max_latency_ms
            ));
        }
        if self.check.passed {
            lines.push(format!(
                "  {} \"{}\" present",
                "field:".dimmed(),
                self.expected_field
            ));
        }
        lines.push(format!("  {} {}ms", "timeout:".dimmed(), self.timeout_ms));

        if let Some(auth) = &self.auth {
            if auth.passed {
                if let Some(status) = auth.authorized_status {
                    lines.push(format!(
                        "  {} auth happy path OK ({} with credential)",
                        "+".green(),
                        status
                    ));
                }
                if let Some(status) = auth.unauthorized_status {
                    lines.push(format!(
                        "  {} auth sad path OK ({} without credential)",
                        "+".green(),
                        status
                    ));
                }
            } else if let Some(failure) = &auth.failure {
                lines.push(format!("  {} {}", "x".red(), failure));
            }
        }

        lines.push(format!(
            "  {} {}",
            "completed:".dimmed(),
            self.completed_at.to_rfc3339()
        ));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawConfig;
    use crate::contracts::{AuthFailure, FailureCause};

    fn test_config(auth: bool) -> HealthCheckConfig {
        HealthCheckConfig::resolve(RawConfig {
            target_url: Some("https://svc.example.com".to_string()),
            auth_enabled: auth,
            auth_url: auth.then(|| "https://svc.example.com/user".to_string()),
            auth_token: auth.then(|| "t0k3n".to_string()),
            ..RawConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_success_requires_primary_and_auth() {
        let config = test_config(true);

        let both_pass = RunReport::aggregate(
            &config,
            CheckOutcome::passing(200, 100),
            Some(AuthOutcome::passing(200, 401)),
        );
        assert!(both_pass.is_success());

        let auth_fails = RunReport::aggregate(
            &config,
            CheckOutcome::passing(200, 100),
            Some(AuthOutcome::failing(
                AuthFailure::SadPath {
                    detail: "expected status 401 or 403 without credential, got 200".to_string(),
                },
                Some(200),
                Some(200),
            )),
        );
        assert!(!auth_fails.is_success());
        assert!(auth_fails.failure_cause().unwrap().contains("sad path"));
    }

    #[test]
    fn test_auth_disabled_success_is_primary_only() {
        let config = test_config(false);
        let report = RunReport::aggregate(&config, CheckOutcome::passing(200, 100), None);
        assert!(report.is_success());
        assert_eq!(report.failure_cause(), None);
    }

    #[test]
    fn test_failure_cause_names_the_first_failed_stage() {
        let config = test_config(false);
        let report = RunReport::aggregate(
            &config,
            CheckOutcome::failing(
                FailureCause::LatencyExceeded,
                "latency 1500ms exceeded the 1000ms budget",
                Some(200),
                Some(1500),
            ),
            None,
        );
        let cause = report.failure_cause().unwrap();
        assert!(cause.starts_with("latency_exceeded"));
        assert!(cause.contains("1500ms"));
    }

    #[test]
    fn test_json_rendering_round_trips() {
        let config = test_config(false);
        let report = RunReport::aggregate(&config, CheckOutcome::passing(200, 100), None);
        let rendered = report.render(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["success"], serde_json::json!(true));
        assert_eq!(value["check"]["status"], serde_json::json!(200));
        assert_eq!(value["target_url"], serde_json::json!("https://svc.example.com"));
    }

    #[test]
    fn test_text_rendering_names_observed_values() {
        let config = test_config(false);
        let report = RunReport::aggregate(
            &config,
            CheckOutcome::failing(
                FailureCause::UnexpectedStatus,
                "expected status 200, got 503",
                Some(503),
                Some(88),
            ),
            None,
        );
        let rendered = report.render(OutputFormat::Text).unwrap();
        assert!(rendered.contains("health check failed"));
        assert!(rendered.contains("503"));
        assert!(rendered.contains("https://svc.example.com"));
    }
}
