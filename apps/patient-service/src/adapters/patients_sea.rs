//! SeaORM-backed implementation of [`PatientRepo`].

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::patients::{self, Entity as Patients};
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;
use crate::repos::patients::{Patient, PatientCreate, PatientRepo, PatientUpdate};

pub struct SeaPatientRepo {
    db: DatabaseConnection,
}

impl SeaPatientRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: patients::Model) -> Patient {
    Patient {
        id: model.id,
        name: model.name,
        email: model.email,
        address: model.address,
        date_of_birth: model.date_of_birth,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[async_trait]
impl PatientRepo for SeaPatientRepo {
    async fn find_all(&self) -> Result<Vec<Patient>, DomainError> {
        let rows = Patients::find()
            .order_by_asc(patients::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Patient>, DomainError> {
        let row = Patients::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(row.map(to_domain))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let count = Patients::find()
            .filter(patients::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(count > 0)
    }

    async fn exists_by_email_excluding(
        &self,
        email: &str,
        exclude_id: Uuid,
    ) -> Result<bool, DomainError> {
        let count = Patients::find()
            .filter(patients::Column::Email.eq(email))
            .filter(patients::Column::Id.ne(exclude_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(count > 0)
    }

    async fn insert(&self, data: PatientCreate) -> Result<Patient, DomainError> {
        let now = OffsetDateTime::now_utc();
        let active = patients::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(data.name),
            email: Set(data.email),
            address: Set(data.address),
            date_of_birth: Set(data.date_of_birth),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = active.insert(&self.db).await.map_err(map_db_err)?;
        Ok(to_domain(model))
    }

    async fn update(&self, id: Uuid, changes: PatientUpdate) -> Result<Patient, DomainError> {
        let existing = Patients::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| DomainError::patient_not_found(id))?;

        let mut active: patients::ActiveModel = existing.into();
        active.name = Set(changes.name);
        active.email = Set(changes.email);
        active.address = Set(changes.address);
        active.date_of_birth = Set(changes.date_of_birth);
        active.updated_at = Set(OffsetDateTime::now_utc());

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(to_domain(model))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), DomainError> {
        // Idempotent: deleting an absent row is not an error.
        Patients::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }
}
