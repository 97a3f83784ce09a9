pub mod jwt_validation;

pub use jwt_validation::JwtValidation;
