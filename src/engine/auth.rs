//! Two-sided authentication verification
//!
//! Confirms the authenticated endpoint both admits the credentialed
//! request and rejects the bare one. The probes run sequentially,
//! authorized first, so a failure is attributable to exactly one path.

use crate::config::HealthCheckConfig;
use crate::contracts::{AuthFailure, AuthOutcome};
use crate::probe::ProbeExecutor;

use super::checkers::{Check, ContentTypeCheck};

/// Runs the happy/sad path probes against the configured auth URL.
pub struct AuthVerifier<'a> {
    executor: &'a ProbeExecutor,
}

impl<'a> AuthVerifier<'a> {
    pub fn new(executor: &'a ProbeExecutor) -> Self {
        Self { executor }
    }

    /// Verify authentication enforcement. Invoked only when the config
    /// enabled auth; the resolver guarantees the material is present.
    pub async fn verify(&self, config: &HealthCheckConfig) -> AuthOutcome {
        let (auth_url, auth_token) = match (&config.auth_url, &config.auth_token) {
            (Some(url), Some(token)) => (url.as_str(), token.as_str()),
            _ => {
                // Unreachable for a resolved config.
                return AuthOutcome::failing(
                    AuthFailure::HappyPath {
                        detail: "auth material missing from configuration".to_string(),
                    },
                    None,
                    None,
                );
            }
        };

        // Happy path: the credentialed request must succeed and look like
        // the API it claims to be.
        let bearer = [("authorization", format!("Bearer {}", auth_token))];
        let happy = self.executor.execute(auth_url, &bearer).await;

        let authorized_status = match happy {
            Ok(response) if response.status == 200 => {
                if let Err(failure) = ContentTypeCheck.evaluate(&response, config) {
                    return AuthOutcome::failing(
                        AuthFailure::HappyPath {
                            detail: failure.detail,
                        },
                        Some(response.status),
                        None,
                    );
                }
                tracing::info!(url = %auth_url, "auth happy path OK (200 with credential)");
                response.status
            }
            Ok(response) => {
                return AuthOutcome::failing(
                    AuthFailure::HappyPath {
                        detail: format!(
                            "expected status 200 with credential, got {}",
                            response.status
                        ),
                    },
                    Some(response.status),
                    None,
                );
            }
            Err(failure) => {
                return AuthOutcome::failing(
                    AuthFailure::HappyPath {
                        detail: failure.to_string(),
                    },
                    None,
                    None,
                );
            }
        };

        // Sad path: the identical request without the credential must be
        // rejected. A 200 here means the endpoint is not enforcing auth.
        let sad = self.executor.execute(auth_url, &[]).await;

        match sad {
            Ok(response) if matches!(response.status, 401 | 403) => {
                tracing::info!(
                    url = %auth_url,
                    status = response.status,
                    "auth sad path OK (rejected without credential)"
                );
                AuthOutcome::passing(authorized_status, response.status)
            }
            Ok(response) => AuthOutcome::failing(
                AuthFailure::SadPath {
                    detail: format!(
                        "expected status 401 or 403 without credential, got {}",
                        response.status
                    ),
                },
                Some(authorized_status),
                Some(response.status),
            ),
            Err(failure) => AuthOutcome::failing(
                AuthFailure::SadPath {
                    detail: failure.to_string(),
                },
                Some(authorized_status),
                None,
            ),
        }
    }
}
