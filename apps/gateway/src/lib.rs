#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod clients;
pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod proxy;
pub mod state;

// Re-exports for public API
pub use clients::auth::{AuthorityClient, CredentialAuthority, ValidationOutcome};
pub use error::AppError;
pub use middleware::jwt_validation::JwtValidation;
pub use state::GatewayState;
