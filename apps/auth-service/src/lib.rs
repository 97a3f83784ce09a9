#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod health;
pub mod routes;
pub mod services;
pub mod state;

// Re-exports for public API
pub use auth::jwt::{mint_access_token, verify_access_token, Claims};
pub use error::AppError;
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;
