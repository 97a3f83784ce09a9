use std::sync::Arc;
use std::time::Duration;

use crate::clients::auth::{AuthorityClient, CredentialAuthority};
use crate::config::GatewayConfig;
use crate::error::AppError;

/// Shared gateway state: the authority delegate and the upstream forwarding
/// client. Both are constructed once and reused by every request task.
#[derive(Clone)]
pub struct GatewayState {
    pub authority: Arc<dyn CredentialAuthority>,
    /// Client used to forward validated requests to upstream services.
    pub http: reqwest::Client,
    pub auth_upstream: String,
    pub patient_upstream: String,
}

impl GatewayState {
    pub fn from_config(config: &GatewayConfig) -> Result<Self, AppError> {
        let authority = AuthorityClient::new(
            config.auth_service_url.clone(),
            config.outbound_timeout,
        )?;

        let http = reqwest::Client::builder()
            .timeout(config.outbound_timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build upstream client: {e}")))?;

        Ok(Self {
            authority: Arc::new(authority),
            http,
            auth_upstream: config.auth_service_url.trim_end_matches('/').to_string(),
            patient_upstream: config.patient_service_url.trim_end_matches('/').to_string(),
        })
    }

    /// State with an injected authority, for tests that stub the remote.
    pub fn with_authority(
        authority: Arc<dyn CredentialAuthority>,
        auth_upstream: String,
        patient_upstream: String,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(500))
            .build()
            .map_err(|e| AppError::config(format!("Failed to build upstream client: {e}")))?;

        Ok(Self {
            authority,
            http,
            auth_upstream: auth_upstream.trim_end_matches('/').to_string(),
            patient_upstream: patient_upstream.trim_end_matches('/').to_string(),
        })
    }
}
