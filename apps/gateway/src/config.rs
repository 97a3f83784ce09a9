use std::env;
use std::time::Duration;

use crate::error::AppError;

/// Immutable gateway configuration, read from the environment once at
/// startup and passed by reference to whoever needs it.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the credential authority (auth service).
    pub auth_service_url: String,
    /// Base URL of the patient service behind the filter.
    pub patient_service_url: String,
    /// Bound on every outbound call (authority and upstream alike).
    pub outbound_timeout: Duration,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let auth_service_url = must_var("AUTH_SERVICE_URL")?;
        let patient_service_url = must_var("PATIENT_SERVICE_URL")?;

        let timeout_ms = env::var("OUTBOUND_TIMEOUT_MS")
            .unwrap_or_else(|_| "2000".to_string())
            .parse::<u64>()
            .map_err(|_| AppError::config("OUTBOUND_TIMEOUT_MS must be a number".to_string()))?;

        Ok(Self {
            auth_service_url,
            patient_service_url,
            outbound_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::config(format!("{name} must be set")))
}
