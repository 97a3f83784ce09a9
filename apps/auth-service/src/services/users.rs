use std::time::SystemTime;

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::jwt::mint_access_token;
use crate::entities::users;
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Redacts an email for logging purposes. Shows only the first 2 characters
/// of the local part.
fn redact_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, _)) if local.len() > 2 => format!("{}***@***", &local[..2]),
        _ => "***@***".to_string(),
    }
}

/// Authenticate a user by email + password and mint an access token.
///
/// Returns `AppError::Unauthorized` for both unknown email and wrong
/// password so callers cannot distinguish the two.
pub async fn authenticate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
    password: &str,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let user = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await?;

    let Some(user) = user else {
        warn!(email = %redact_email(email), "Login attempt for unknown email");
        return Err(AppError::unauthorized());
    };

    let matches = bcrypt::verify(password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Password hash verification failed: {e}")))?;

    if !matches {
        warn!(email = %redact_email(email), "Login attempt with wrong password");
        return Err(AppError::unauthorized());
    }

    debug!(email = %redact_email(email), role = %user.role, "Login succeeded");
    mint_access_token(&user.email, &user.role, SystemTime::now(), security)
}

/// Idempotently provision a user with the given credentials. Used by the
/// startup seed path; an existing row for the email wins.
pub async fn ensure_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
    password: &str,
    role: &str,
) -> Result<users::Model, AppError> {
    let existing = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await?;

    if let Some(user) = existing {
        debug!(email = %redact_email(email), "User already provisioned");
        return Ok(user);
    }

    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let now = time::OffsetDateTime::now_utc();
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        role: Set(role.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?;

    info!(email = %redact_email(email), role = %role, "Provisioned user");
    Ok(user)
}
