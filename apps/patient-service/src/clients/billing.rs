//! Billing service client seam and its gRPC implementation.
//!
//! Account provisioning happens synchronously inside the onboarding flow,
//! so the call carries a bounded timeout. The orchestrator decides what a
//! failure means; this module only classifies it.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Request};
use tracing::info;
use uuid::Uuid;

use mesh_proto::billing::billing_service_client::BillingServiceClient;
use mesh_proto::billing::BillingRequest;

/// Reference to the account the billing service provisioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingAccountRef {
    pub account_id: String,
    pub status: String,
}

#[derive(Error, Debug)]
pub enum BillingError {
    /// The billing service could not be reached or did not answer in time.
    #[error("billing service unavailable: {0}")]
    Unavailable(String),
    /// The billing service answered with a non-OK status.
    #[error("billing request rejected: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait BillingAccounts: Send + Sync {
    async fn create_account(
        &self,
        patient_id: Uuid,
        name: &str,
        email: &str,
    ) -> Result<BillingAccountRef, BillingError>;
}

/// gRPC client over a lazily connected channel. Cloning the inner tonic
/// client is cheap, so one instance serves all requests.
pub struct GrpcBillingClient {
    client: BillingServiceClient<Channel>,
}

impl GrpcBillingClient {
    pub fn connect_lazy(address: &str, timeout: Duration) -> Result<Self, BillingError> {
        let endpoint = Endpoint::from_shared(address.to_string())
            .map_err(|e| BillingError::Unavailable(format!("invalid billing address: {e}")))?
            .timeout(timeout)
            .connect_timeout(timeout);
        let channel = endpoint.connect_lazy();
        Ok(Self {
            client: BillingServiceClient::new(channel),
        })
    }
}

#[async_trait]
impl BillingAccounts for GrpcBillingClient {
    async fn create_account(
        &self,
        patient_id: Uuid,
        name: &str,
        email: &str,
    ) -> Result<BillingAccountRef, BillingError> {
        let request = Request::new(BillingRequest {
            patient_id: patient_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        });

        let mut client = self.client.clone();
        let response = client.create_billing_account(request).await.map_err(|s| {
            match s.code() {
                Code::Unavailable | Code::DeadlineExceeded | Code::Cancelled => {
                    BillingError::Unavailable(s.message().to_string())
                }
                _ => BillingError::Rejected(format!("{}: {}", s.code(), s.message())),
            }
        })?;

        let body = response.into_inner();
        info!(
            account_id = %body.account_id,
            status = %body.status,
            "Billing account provisioned"
        );
        Ok(BillingAccountRef {
            account_id: body.account_id,
            status: body.status,
        })
    }
}
