use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {detail}")]
    BadRequest { code: &'static str, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: &'static str, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: &'static str, detail: String },
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    fn code(&self) -> String {
        match self {
            AppError::BadRequest { code, .. } => code.to_string(),
            AppError::NotFound { code, .. } => code.to_string(),
            AppError::Conflict { code, .. } => code.to_string(),
            AppError::Db { .. } => "DB_ERROR".to_string(),
            AppError::Internal { .. } => "INTERNAL".to_string(),
            AppError::Config { .. } => "CONFIG_ERROR".to_string(),
        }
    }

    fn detail(&self) -> String {
        match self {
            AppError::BadRequest { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::Conflict { detail, .. }
            | AppError::Db { detail }
            | AppError::Internal { detail }
            | AppError::Config { detail } => detail.clone(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Db { .. } | AppError::Internal { .. } | AppError::Config { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn bad_request(code: &'static str, detail: String) -> Self {
        Self::BadRequest { code, detail }
    }

    pub fn not_found(code: &'static str, detail: String) -> Self {
        Self::NotFound { code, detail }
    }

    pub fn conflict(code: &'static str, detail: String) -> Self {
        Self::Conflict { code, detail }
    }

    pub fn db(detail: String) -> Self {
        Self::Db { detail }
    }

    pub fn internal(detail: String) -> Self {
        Self::Internal { detail }
    }

    pub fn config(detail: String) -> Self {
        Self::Config { detail }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(detail) => AppError::bad_request("VALIDATION", detail),
            DomainError::Conflict(ConflictKind::UniqueEmail, detail) => {
                AppError::conflict("EMAIL_ALREADY_EXISTS", detail)
            }
            DomainError::Conflict(_, detail) => AppError::conflict("CONFLICT", detail),
            DomainError::NotFound(NotFoundKind::Patient, detail) => {
                AppError::not_found("PATIENT_NOT_FOUND", detail)
            }
            DomainError::NotFound(_, detail) => AppError::not_found("NOT_FOUND", detail),
            DomainError::Infra(_, detail) => AppError::db(detail),
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::db(format!("db error: {e}"))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        mesh_web::problem::respond(self.status(), &self.code(), self.detail())
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;

    use super::AppError;
    use crate::errors::domain::DomainError;

    #[test]
    fn domain_conflict_maps_to_409_with_stable_code() {
        let app: AppError = DomainError::email_already_exists("jane@x.com").into();
        assert_eq!(app.status(), StatusCode::CONFLICT);
        assert_eq!(app.code(), "EMAIL_ALREADY_EXISTS");
    }

    #[test]
    fn domain_not_found_maps_to_404() {
        let app: AppError = DomainError::patient_not_found(uuid::Uuid::new_v4()).into();
        assert_eq!(app.status(), StatusCode::NOT_FOUND);
        assert_eq!(app.code(), "PATIENT_NOT_FOUND");
    }

    #[test]
    fn infra_errors_stay_server_side() {
        use crate::errors::domain::InfraErrorKind;
        let app: AppError =
            DomainError::infra(InfraErrorKind::DbUnavailable, "pool exhausted").into();
        assert_eq!(app.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
