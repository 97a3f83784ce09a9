//! Shared test support utilities for the mesh services.
//!
//! Provides unique test-data generation, Problem Details assertions, and
//! unified logging initialization for unit and integration tests.

pub mod problem_details;
pub mod test_logging;
pub mod unique_helpers;
