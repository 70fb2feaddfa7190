//! This module defines the `ConfigLoader` struct responsible for persisting
//! changesets to a repository.
//! It acts as an interface between the processing pipeline and the data storage.
pub use config_migrator_repository::{ConfigRepository, PersistSummary, RepositoryError};
pub use config_migrator_shared::types::Changeset;
pub use crate::errors::LoaderError;
use std::sync::Arc;
use uuid::Uuid;

/// `ConfigLoader` is responsible for persisting changesets.
///
/// It utilizes a `ConfigRepository` to interact with the underlying data
/// store, ensuring that every changeset lands atomically.
pub struct ConfigLoader {
    pub repository: Arc<dyn ConfigRepository>,
}

impl ConfigLoader {
    /// Creates a new `ConfigLoader` instance.
    ///
    /// # Arguments
    ///
    /// * `repository` - An `Arc` trait object that implements
    ///   `ConfigRepository`, providing the interface for data persistence.
    pub fn new(repository: Arc<dyn ConfigRepository>) -> Self {
        Self { repository }
    }

    /// Looks up the tenant every imported row is scoped to.
    pub async fn resolve_tenant(&self, name: &str) -> Result<Uuid, LoaderError> {
        Ok(self.repository.resolve_tenant(name).await?)
    }

    /// Persists a given `Changeset` for `tenant`.
    ///
    /// # Returns
    ///
    /// The rows written and skipped, or a `LoaderError` if the persistence
    /// fails.
    pub async fn persist_changeset(
        &self,
        tenant: Uuid,
        changeset: &Changeset,
    ) -> Result<PersistSummary, LoaderError> {
        Ok(self.repository.persist_changeset(tenant, changeset).await?)
    }
}
