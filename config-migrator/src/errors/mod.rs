//! Error types for the config migrator application.
//! Consolidates the errors of the pipeline and the repository with the ones
//! raised while wiring the application together.
use config_migrator_pipeline::errors::OrchestratorError;
use config_migrator_repository::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("DATABASE_URL must be set unless --dry-run is given")]
    MissingDatabaseUrl,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Orchestrator error: {0}")]
    Orchestrator(#[from] OrchestratorError),
    #[error("{0} source file(s) failed to import")]
    FailedFiles(usize),
}
