//! Error types for the loader module of the Config Migrator Pipeline.
//! Defines specific errors that can occur during the persistence of
//! changesets.
use config_migrator_repository::RepositoryError;
use thiserror::Error;

/// Represents errors that can occur within the config loader.
///
/// This enum consolidates errors propagated from the config repository.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Config repository error: {0}")]
    Repository(#[from] RepositoryError),
}
