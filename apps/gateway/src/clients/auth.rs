//! Delegate client for the remote credential authority.
//!
//! The gateway never inspects tokens itself; it asks the auth service via
//! `GET /validate` and collapses everything that can happen on that call
//! into a three-way outcome. Remote internals (status text, error bodies,
//! connection errors) stop at this boundary.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use tracing::warn;

use crate::error::AppError;

/// Result of asking the authority about one credential. Exactly one tag per
/// call, never partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    InvalidCredential,
    AuthorityUnavailable,
}

/// Seam between the authentication filter and the remote authority, so
/// tests can substitute a stub.
#[async_trait]
pub trait CredentialAuthority: Send + Sync {
    async fn check(&self, token: &str) -> ValidationOutcome;
}

/// HTTP client for the auth service. Built once at startup; the inner
/// reqwest client carries the bounded timeout and connection pool and is
/// safe for concurrent use across request tasks.
pub struct AuthorityClient {
    http: reqwest::Client,
    base_url: String,
}

impl AuthorityClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build auth client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn map_status(status: StatusCode) -> ValidationOutcome {
        if status.is_success() {
            ValidationOutcome::Valid
        } else if status.is_client_error() {
            ValidationOutcome::InvalidCredential
        } else {
            ValidationOutcome::AuthorityUnavailable
        }
    }
}

#[async_trait]
impl CredentialAuthority for AuthorityClient {
    /// One outbound call per invocation, no retries. Retry policy, if any,
    /// belongs to the caller.
    async fn check(&self, token: &str) -> ValidationOutcome {
        let url = format!("{}/validate", self.base_url);

        let result = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await;

        match result {
            Ok(resp) => Self::map_status(resp.status()),
            Err(e) => {
                warn!(error = %e, "Authority call failed");
                ValidationOutcome::AuthorityUnavailable
            }
        }
    }
}
