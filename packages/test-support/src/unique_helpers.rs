//! Test helpers for generating unique test data
//!
//! ULID-based uniqueness keeps concurrently-running tests from colliding on
//! the shared `patients.email` / `users.email` unique indexes.

use ulid::Ulid;

/// Generate a unique string in the format `{prefix}-{ulid}`.
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique email address in the format `{prefix}-{ulid}@example.test`.
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new())
}
