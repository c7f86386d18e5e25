// Data access over the managed database

pub mod diagnostics_service;
pub mod health_service;
pub mod profile_service;
pub mod training_service;

pub use diagnostics_service::{CheckResult, DiagnosticReport, DiagnosticsService, REQUIRED_TABLES};
pub use health_service::HealthService;
pub use profile_service::ProfileService;
pub use training_service::TrainingService;

use anyhow::{anyhow, Result};

/// Inserts and updates answer with the affected rows; most callers want the
/// single row they wrote
fn first_row<T>(rows: Vec<T>, table: &str) -> Result<T> {
    rows.into_iter()
        .next()
        .ok_or_else(|| anyhow!("No row returned from {}", table))
}
