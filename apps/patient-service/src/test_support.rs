//! In-memory doubles for the repository, billing client, and event
//! publisher. Used by service and route tests to pin orchestration
//! behavior without a database or network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::clients::billing::{BillingAccountRef, BillingAccounts, BillingError};
use crate::errors::domain::DomainError;
use crate::events::publisher::{EventPublisher, PublishError};
use crate::repos::patients::{Patient, PatientCreate, PatientRepo, PatientUpdate};

#[derive(Default)]
pub struct InMemoryPatientRepo {
    rows: Mutex<Vec<Patient>>,
}

impl InMemoryPatientRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Patient>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

/// Builds a patient row with fixed timestamps for assertions.
pub fn sample_patient(name: &str, email: &str) -> Patient {
    let now = OffsetDateTime::now_utc();
    Patient {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        address: "1 Test Lane".to_string(),
        date_of_birth: time::macros::date!(1990 - 01 - 15),
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl PatientRepo for InMemoryPatientRepo {
    async fn find_all(&self) -> Result<Vec<Patient>, DomainError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Patient>, DomainError> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.rows.lock().unwrap().iter().any(|p| p.email == email))
    }

    async fn exists_by_email_excluding(
        &self,
        email: &str,
        exclude_id: Uuid,
    ) -> Result<bool, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.email == email && p.id != exclude_id))
    }

    async fn insert(&self, data: PatientCreate) -> Result<Patient, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        // Mirrors the unique index on email.
        if rows.iter().any(|p| p.email == data.email) {
            return Err(DomainError::email_already_exists(&data.email));
        }
        let now = OffsetDateTime::now_utc();
        let patient = Patient {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            address: data.address,
            date_of_birth: data.date_of_birth,
            created_at: now,
            updated_at: now,
        };
        rows.push(patient.clone());
        Ok(patient)
    }

    async fn update(&self, id: Uuid, changes: PatientUpdate) -> Result<Patient, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|p| p.email == changes.email && p.id != id)
        {
            return Err(DomainError::email_already_exists(&changes.email));
        }
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::patient_not_found(id))?;
        row.name = changes.name;
        row.email = changes.email;
        row.address = changes.address;
        row.date_of_birth = changes.date_of_birth;
        row.updated_at = OffsetDateTime::now_utc();
        Ok(row.clone())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), DomainError> {
        self.rows.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }
}

/// Billing double that records calls and can be told to fail.
#[derive(Default)]
pub struct RecordingBilling {
    calls: AtomicUsize,
    failure: Mutex<Option<&'static str>>,
}

impl RecordingBilling {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failure: Mutex::new(Some("unavailable")),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failure: Mutex::new(Some("rejected")),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BillingAccounts for RecordingBilling {
    async fn create_account(
        &self,
        patient_id: Uuid,
        _name: &str,
        _email: &str,
    ) -> Result<BillingAccountRef, BillingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match *self.failure.lock().unwrap() {
            Some("unavailable") => Err(BillingError::Unavailable("connect refused".to_string())),
            Some(_) => Err(BillingError::Rejected("invalid request".to_string())),
            None => Ok(BillingAccountRef {
                account_id: format!("acct-{patient_id}"),
                status: "ACTIVE".to_string(),
            }),
        }
    }
}

/// Publisher double that records calls and can be told to fail.
#[derive(Default)]
pub struct RecordingPublisher {
    calls: AtomicUsize,
    fail: bool,
}

impl RecordingPublisher {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish_patient_created(
        &self,
        _patient_id: Uuid,
        _name: &str,
        _email: &str,
    ) -> Result<(), PublishError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(PublishError::Unavailable("broker down".to_string()))
        } else {
            Ok(())
        }
    }
}
