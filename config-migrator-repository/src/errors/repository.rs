//! Error types for the config repository.
//! Defines specific errors that can occur while resolving the tenant or
//! persisting a changeset.
use thiserror::Error;

/// Represents errors that can occur within the config repository.
///
/// This enum consolidates the error conditions of database interactions,
/// such as SQLx errors, and the lookup of the target tenant.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Tenant '{0}' not found")]
    TenantNotFound(String),
}
