//! Patient onboarding and lifecycle orchestration.
//!
//! `create` is the interesting path: once the row is persisted, the
//! billing call and the event publish are follow-ups whose failure must
//! not undo or fail the onboarding. Both are logged and swallowed; the
//! caller always gets the persisted record back.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::clients::billing::BillingAccounts;
use crate::errors::domain::DomainError;
use crate::events::publisher::EventPublisher;
use crate::repos::patients::{Patient, PatientCreate, PatientRepo, PatientUpdate};

pub struct PatientService {
    repo: Arc<dyn PatientRepo>,
    billing: Arc<dyn BillingAccounts>,
    events: Arc<dyn EventPublisher>,
}

impl PatientService {
    pub fn new(
        repo: Arc<dyn PatientRepo>,
        billing: Arc<dyn BillingAccounts>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repo,
            billing,
            events,
        }
    }

    pub async fn list(&self) -> Result<Vec<Patient>, DomainError> {
        self.repo.find_all().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Patient, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::patient_not_found(id))
    }

    pub async fn create(&self, data: PatientCreate) -> Result<Patient, DomainError> {
        if self.repo.exists_by_email(&data.email).await? {
            return Err(DomainError::email_already_exists(&data.email));
        }

        // The unique index on email backs up this check under concurrency;
        // the insert itself can still surface the same conflict.
        let patient = self.repo.insert(data).await?;
        info!(patient_id = %patient.id, "Patient created");

        match self
            .billing
            .create_account(patient.id, &patient.name, &patient.email)
            .await
        {
            Ok(account) => {
                info!(
                    patient_id = %patient.id,
                    account_id = %account.account_id,
                    status = %account.status,
                    "Billing account linked"
                );
            }
            Err(e) => {
                // The patient row stays; billing can be reconciled later.
                error!(patient_id = %patient.id, error = %e, "Billing account creation failed");
            }
        }

        if let Err(e) = self
            .events
            .publish_patient_created(patient.id, &patient.name, &patient.email)
            .await
        {
            warn!(patient_id = %patient.id, error = %e, "Patient event publish failed");
        }

        Ok(patient)
    }

    pub async fn update(&self, id: Uuid, changes: PatientUpdate) -> Result<Patient, DomainError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(DomainError::patient_not_found(id));
        }
        if self
            .repo
            .exists_by_email_excluding(&changes.email, id)
            .await?
        {
            return Err(DomainError::email_already_exists(&changes.email));
        }
        let patient = self.repo.update(id, changes).await?;
        info!(patient_id = %patient.id, "Patient updated");
        Ok(patient)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.repo.delete_by_id(id).await?;
        info!(patient_id = %id, "Patient deleted");
        Ok(())
    }
}
