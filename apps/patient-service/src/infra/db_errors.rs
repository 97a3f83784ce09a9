//! SeaORM -> DomainError translation helpers.
//!
//! Adapters convert `sea_orm::DbErr` into `DomainError` here so higher
//! layers can map `DomainError` to `AppError` via `From`. The unique-index
//! matching is what turns a constraint violation on `patients.email` into
//! the same `EmailAlreadyExists` conflict the advisory pre-check raises,
//! closing the checked-then-act race under concurrent onboarding.

use sea_orm::DbErr;
use tracing::error;

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind};

/// Extract table.column from SQLite "UNIQUE constraint failed: table.column"
/// error messages.
fn extract_sqlite_table_column(error_msg: &str) -> Option<&str> {
    let prefix = "UNIQUE constraint failed: ";
    let start = error_msg.find(prefix)?;
    error_msg[start + prefix.len()..].split_whitespace().next()
}

fn unique_email_violation(error_msg: &str) -> bool {
    // PostgreSQL reports the constraint name, SQLite the table.column pair.
    if error_msg.contains("patients_email_key") {
        return true;
    }
    matches!(extract_sqlite_table_column(error_msg), Some("patients.email"))
}

pub fn map_db_err(err: DbErr) -> DomainError {
    let msg = err.to_string();

    if unique_email_violation(&msg) {
        return DomainError::conflict(ConflictKind::UniqueEmail, "Email already registered");
    }

    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            error!(error = %msg, "Database unavailable");
            DomainError::infra(InfraErrorKind::DbUnavailable, msg)
        }
        _ => {
            error!(error = %msg, "Database operation failed");
            DomainError::infra(InfraErrorKind::Other("db".to_string()), msg)
        }
    }
}
