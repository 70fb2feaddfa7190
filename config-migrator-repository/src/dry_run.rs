//! A repository that accepts changesets without writing them anywhere.
//!
//! Backs the `--dry-run` mode of the migrator and the pipeline tests.
use crate::{ConfigRepository, PersistSummary, RepositoryError};
use async_trait::async_trait;
use config_migrator_shared::types::Changeset;
use std::sync::Mutex;
use uuid::Uuid;

/// Repository that only counts what it is asked to persist.
///
/// Tenant resolution succeeds with the nil UUID for any name unless the
/// repository was built with an explicit list of known tenants. Changesets
/// are kept in memory only after [`DryRunRepository::recording`].
#[derive(Debug, Default)]
pub struct DryRunRepository {
    known_tenants: Option<Vec<String>>,
    persisted: Option<Mutex<Vec<Changeset>>>,
}

impl DryRunRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts tenant resolution to the given names.
    pub fn with_tenants<I, S>(tenants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known_tenants: Some(tenants.into_iter().map(Into::into).collect()),
            persisted: None,
        }
    }

    /// Keeps a copy of every persisted changeset for [`Self::persisted`].
    pub fn recording(mut self) -> Self {
        self.persisted = Some(Mutex::new(Vec::new()));
        self
    }

    /// Returns a copy of every changeset persisted so far, in order.
    ///
    /// Always empty unless the repository is recording.
    pub fn persisted(&self) -> Vec<Changeset> {
        match self.persisted.as_ref().map(Mutex::lock) {
            Some(Ok(guard)) => guard.clone(),
            Some(Err(poisoned)) => poisoned.into_inner().clone(),
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl ConfigRepository for DryRunRepository {
    async fn resolve_tenant(&self, name: &str) -> Result<Uuid, RepositoryError> {
        match &self.known_tenants {
            Some(known) if !known.iter().any(|t| t == name) => {
                Err(RepositoryError::TenantNotFound(name.to_string()))
            }
            _ => Ok(Uuid::nil()),
        }
    }

    async fn persist_changeset(
        &self,
        _tenant: Uuid,
        changeset: &Changeset,
    ) -> Result<PersistSummary, RepositoryError> {
        if let Some(persisted) = &self.persisted {
            let mut persisted = match persisted.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            persisted.push(changeset.clone());
        }

        Ok(PersistSummary {
            rows_written: changeset.record_count(),
            rows_skipped: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_migrator_shared::types::BlacklistEntry;

    #[tokio::test]
    async fn test_resolves_any_tenant_by_default() {
        let repository = DryRunRepository::new();
        assert_eq!(repository.resolve_tenant("Acme").await.unwrap(), Uuid::nil());
    }

    #[tokio::test]
    async fn test_rejects_unknown_tenant_when_restricted() {
        let repository = DryRunRepository::with_tenants(["Default"]);
        assert!(repository.resolve_tenant("Default").await.is_ok());

        let err = repository.resolve_tenant("Acme").await.unwrap_err();
        assert!(matches!(err, RepositoryError::TenantNotFound(name) if name == "Acme"));
    }

    fn two_numbers() -> Changeset {
        Changeset {
            blacklist: vec![
                BlacklistEntry { phone_number: "5551234".to_string() },
                BlacklistEntry { phone_number: "5555678".to_string() },
            ],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_records_persisted_changesets() {
        let repository = DryRunRepository::new().recording();
        let changeset = two_numbers();

        let summary = repository.persist_changeset(Uuid::nil(), &changeset).await.unwrap();

        assert_eq!(summary.rows_written, 2);
        assert_eq!(repository.persisted(), vec![changeset]);
    }

    #[tokio::test]
    async fn test_keeps_nothing_unless_recording() {
        let repository = DryRunRepository::new();

        let summary = repository.persist_changeset(Uuid::nil(), &two_numbers()).await.unwrap();

        assert_eq!(summary.rows_written, 2);
        assert_eq!(summary.rows_skipped, 0);
        assert!(repository.persisted.is_none());
        assert!(repository.persisted().is_empty());
    }
}
