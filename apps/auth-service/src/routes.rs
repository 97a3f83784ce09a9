use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::services::users::authenticate;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Exchange email + password for a signed access token.
async fn login(
    req: web::Json<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if req.email.trim().is_empty() {
        return Err(AppError::bad_request(
            "INVALID_EMAIL",
            "Email cannot be empty".to_string(),
        ));
    }
    if req.password.is_empty() {
        return Err(AppError::bad_request(
            "INVALID_PASSWORD",
            "Password cannot be empty".to_string(),
        ));
    }

    let db = app_state
        .db
        .as_ref()
        .ok_or_else(|| AppError::internal("Database connection not available".to_string()))?;

    let token = authenticate(db, &req.email, &req.password, &app_state.security).await?;

    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}

/// Validate the bearer token presented in the Authorization header.
/// 200 with no body when valid, 401 otherwise. The gateway calls this once
/// per proxied request.
async fn validate(req: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let token = extract_bearer(&req)?;
    verify_access_token(token, &app_state.security)?;
    Ok(HttpResponse::Ok().finish())
}

fn extract_bearer(req: &HttpRequest) -> Result<&str, AppError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(AppError::unauthorized_missing_bearer)?;

    let auth_str = header_value
        .to_str()
        .map_err(|_| AppError::unauthorized_missing_bearer())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AppError::unauthorized_missing_bearer()),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login))
        .route("/validate", web::get().to(validate))
        .configure(crate::health::configure_routes);
}
