//! Patient repository seam.
//!
//! The service layer depends on this trait only; the SeaORM adapter lives
//! in `crate::adapters::patients_sea` and tests use an in-memory double.

use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::errors::domain::DomainError;

/// Domain view of a patient record.
#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub date_of_birth: Date,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Fields accepted when onboarding a new patient. The id and timestamps
/// are assigned by the repository.
#[derive(Debug, Clone)]
pub struct PatientCreate {
    pub name: String,
    pub email: String,
    pub address: String,
    pub date_of_birth: Date,
}

/// Full replacement payload for an update. Every field is overwritten.
#[derive(Debug, Clone)]
pub struct PatientUpdate {
    pub name: String,
    pub email: String,
    pub address: String,
    pub date_of_birth: Date,
}

#[async_trait]
pub trait PatientRepo: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Patient>, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Patient>, DomainError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError>;

    /// Uniqueness probe for updates: ignores the row being updated so a
    /// patient can keep their own email.
    async fn exists_by_email_excluding(
        &self,
        email: &str,
        exclude_id: Uuid,
    ) -> Result<bool, DomainError>;

    async fn insert(&self, data: PatientCreate) -> Result<Patient, DomainError>;

    /// Overwrites all mutable fields of an existing row. Returns
    /// `NotFound` when the id does not exist.
    async fn update(&self, id: Uuid, changes: PatientUpdate) -> Result<Patient, DomainError>;

    /// Deletes the row if present. Succeeds without error when the id is
    /// already gone.
    async fn delete_by_id(&self, id: Uuid) -> Result<(), DomainError>;
}
