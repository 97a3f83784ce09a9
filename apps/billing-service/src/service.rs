//! BillingService RPC implementation.
//!
//! Provisioning is a stub over a generated account id: every request gets
//! a fresh ACTIVE account. Real ledger integration sits behind this
//! surface without changing the RPC contract.

use tonic::{Request, Response, Status};
use tracing::info;
use uuid::Uuid;

use mesh_proto::billing::billing_service_server::BillingService;
use mesh_proto::billing::{BillingRequest, BillingResponse};

pub const ACCOUNT_STATUS_ACTIVE: &str = "ACTIVE";

#[derive(Debug, Default)]
pub struct BillingAccountProvisioner;

#[tonic::async_trait]
impl BillingService for BillingAccountProvisioner {
    async fn create_billing_account(
        &self,
        request: Request<BillingRequest>,
    ) -> Result<Response<BillingResponse>, Status> {
        let body = request.into_inner();
        if body.patient_id.is_empty() {
            return Err(Status::invalid_argument("patient_id is required"));
        }

        let account_id = Uuid::new_v4().to_string();
        info!(
            patient_id = %body.patient_id,
            account_id = %account_id,
            "Billing account created"
        );

        Ok(Response::new(BillingResponse {
            account_id,
            status: ACCOUNT_STATUS_ACTIVE.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_active_account_with_fresh_id() {
        let svc = BillingAccountProvisioner;
        let request = Request::new(BillingRequest {
            patient_id: "7b61c9a1-9a06-4c5e-bd32-1f5a1f2a5b10".to_string(),
            name: "Jane Roe".to_string(),
            email: "jane@example.com".to_string(),
        });

        let response = svc.create_billing_account(request).await.unwrap();
        let body = response.into_inner();
        assert_eq!(body.status, ACCOUNT_STATUS_ACTIVE);
        assert!(Uuid::parse_str(&body.account_id).is_ok());
    }

    #[tokio::test]
    async fn ids_are_unique_per_request() {
        let svc = BillingAccountProvisioner;
        let mut seen = std::collections::HashSet::new();
        for _ in 0..3 {
            let request = Request::new(BillingRequest {
                patient_id: "7b61c9a1-9a06-4c5e-bd32-1f5a1f2a5b10".to_string(),
                name: "Jane Roe".to_string(),
                email: "jane@example.com".to_string(),
            });
            let body = svc
                .create_billing_account(request)
                .await
                .unwrap()
                .into_inner();
            assert!(seen.insert(body.account_id));
        }
    }

    #[tokio::test]
    async fn rejects_missing_patient_id() {
        let svc = BillingAccountProvisioner;
        let request = Request::new(BillingRequest {
            patient_id: String::new(),
            name: "Jane Roe".to_string(),
            email: "jane@example.com".to_string(),
        });

        let status = svc.create_billing_account(request).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }
}
