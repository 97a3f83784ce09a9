use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::services::patients::PatientService;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    pub db: Option<DatabaseConnection>,
    /// Orchestrator behind every /patients route
    pub patients: Arc<PatientService>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, patients: Arc<PatientService>) -> Self {
        Self {
            db: Some(db),
            patients,
        }
    }

    /// Create an AppState without a database connection (for testing)
    pub fn without_db(patients: Arc<PatientService>) -> Self {
        Self { db: None, patients }
    }
}
