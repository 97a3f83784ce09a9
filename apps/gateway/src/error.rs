use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Authorization header absent or not of the "Bearer <token>" form.
    #[error("UnauthorizedMissingBearer")]
    UnauthorizedMissingBearer,
    /// The authority examined the credential and rejected it.
    #[error("UnauthorizedInvalidToken")]
    UnauthorizedInvalidToken,
    /// The authority could not be reached or failed server-side. Distinct
    /// from a client auth failure: surfaces as 500, never 401.
    #[error("Authority unavailable")]
    AuthorityUnavailable,
    /// The proxied-to service could not be reached.
    #[error("Upstream unavailable: {detail}")]
    UpstreamUnavailable { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    fn code(&self) -> String {
        match self {
            AppError::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER".to_string(),
            AppError::UnauthorizedInvalidToken => "UNAUTHORIZED_INVALID_TOKEN".to_string(),
            AppError::AuthorityUnavailable => "AUTHORITY_UNAVAILABLE".to_string(),
            AppError::UpstreamUnavailable { .. } => "UPSTREAM_UNAVAILABLE".to_string(),
            AppError::Internal { .. } => "INTERNAL".to_string(),
            AppError::Config { .. } => "CONFIG_ERROR".to_string(),
        }
    }

    fn detail(&self) -> String {
        match self {
            AppError::UnauthorizedMissingBearer => "Missing or malformed Bearer token".to_string(),
            AppError::UnauthorizedInvalidToken => "Invalid credential".to_string(),
            AppError::AuthorityUnavailable => "Authentication service unavailable".to_string(),
            AppError::UpstreamUnavailable { detail } => detail.clone(),
            AppError::Internal { detail } => detail.clone(),
            AppError::Config { detail } => detail.clone(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UnauthorizedMissingBearer | AppError::UnauthorizedInvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            AppError::AuthorityUnavailable
            | AppError::UpstreamUnavailable { .. }
            | AppError::Internal { .. }
            | AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn unauthorized_missing_bearer() -> Self {
        Self::UnauthorizedMissingBearer
    }

    pub fn unauthorized_invalid_token() -> Self {
        Self::UnauthorizedInvalidToken
    }

    pub fn authority_unavailable() -> Self {
        Self::AuthorityUnavailable
    }

    pub fn upstream_unavailable(detail: String) -> Self {
        Self::UpstreamUnavailable { detail }
    }

    pub fn internal(detail: String) -> Self {
        Self::Internal { detail }
    }

    pub fn config(detail: String) -> Self {
        Self::Config { detail }
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
