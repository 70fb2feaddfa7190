//! This module defines the `ConfigRepository` trait, which provides an interface
//! for writing migrated configuration into the destination store.
use crate::errors::RepositoryError;
use config_migrator_shared::types::Changeset;
use std::ops::AddAssign;
use uuid::Uuid;

/// Row counts produced by persisting one changeset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PersistSummary {
    /// Rows inserted or updated.
    pub rows_written: usize,
    /// Rows intentionally not written: duplicates ignored by the target
    /// table, or references to parents that do not exist.
    pub rows_skipped: usize,
}

impl PersistSummary {
    pub fn written(&mut self, rows: usize) {
        self.rows_written += rows;
    }

    pub fn skipped(&mut self, rows: usize) {
        self.rows_skipped += rows;
    }
}

impl AddAssign for PersistSummary {
    fn add_assign(&mut self, other: Self) {
        self.rows_written += other.rows_written;
        self.rows_skipped += other.rows_skipped;
    }
}

/// A trait that defines the interface for the configuration data repository.
///
/// Implementors resolve the tenant every row is scoped to and persist whole
/// changesets atomically.
#[async_trait::async_trait]
pub trait ConfigRepository: Send + Sync {
    /// Looks up the identifier of the tenant with the given name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::TenantNotFound` if no such tenant exists.
    async fn resolve_tenant(&self, name: &str) -> Result<Uuid, RepositoryError>;

    /// Persists a `Changeset` for the given tenant.
    ///
    /// All rows of the changeset are written in a single transaction. Parents
    /// are upserted by their natural key and their children replaced, so
    /// persisting the same changeset twice leaves the store unchanged.
    ///
    /// # Arguments
    ///
    /// * `tenant` - The tenant every tenant-scoped row belongs to.
    /// * `changeset` - The records extracted from one source file.
    ///
    /// # Returns
    ///
    /// A `PersistSummary` with the row counts, or a `RepositoryError` if the
    /// transaction failed and was rolled back.
    async fn persist_changeset(
        &self,
        tenant: Uuid,
        changeset: &Changeset,
    ) -> Result<PersistSummary, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_accumulates() {
        let mut total = PersistSummary::default();
        let mut first = PersistSummary::default();
        first.written(3);
        first.skipped(1);
        total += first;
        total += PersistSummary { rows_written: 2, rows_skipped: 0 };
        assert_eq!(total, PersistSummary { rows_written: 5, rows_skipped: 1 });
    }
}
