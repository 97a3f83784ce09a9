#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod clients;
pub mod config;
pub mod entities;
pub mod error;
pub mod errors;
pub mod events;
pub mod health;
pub mod infra;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
pub mod test_support;

// Re-exports for public API
pub use error::AppError;
pub use errors::domain::DomainError;
pub use state::app_state::AppState;
