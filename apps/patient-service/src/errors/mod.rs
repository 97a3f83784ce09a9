//! Error handling for the patient service.

pub mod domain;

pub use domain::DomainError;
