//! Config Migrator Library
//!
//! Imports FreeSWITCH XML configuration into PostgreSQL. This library provides
//! the command line settings, the XML handlers for every job kind, error
//! handling and the dependency wiring used by the binary.

pub mod config;
pub mod errors;

pub use config::{Dependencies, Settings};
pub use errors::AppError;

use config_migrator_pipeline::orchestrator::MigrationReport;

/// Wires the dependencies for `settings` and runs every selected job.
///
/// Per-file failures are part of the report. Only configuration, connection
/// and tenant errors are returned as `Err`.
pub async fn run(settings: &Settings) -> Result<MigrationReport, AppError> {
    let dependencies = Dependencies::new(settings).await?;
    let report = dependencies.orchestrator.run(dependencies.jobs).await?;
    Ok(report)
}
