//! This module defines the `Orchestrator` responsible for coordinating the
//! import pipeline.
//! It integrates the consumer, processor, and loader components to move
//! source files from disk into the repository, one transaction per file.
use crate::consumer::{ImportJob, SourceConsumer, SourceMessage};
use crate::errors::{LoaderError, OrchestratorError};
use crate::loader::ConfigLoader;
use crate::processor::{ProcessSources, SourceProcessor};
use config_migrator_shared::types::{JobKind, SourceFile};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Size of the source channel buffer.
    pub channel_buffer_size: usize,
    /// Name of the tenant every row is imported for.
    pub tenant_name: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: 64,
            tenant_name: "Default".to_string(),
        }
    }
}

/// File and row counters for one job, or for the whole run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct JobReport {
    pub files_seen: usize,
    pub files_imported: usize,
    pub files_empty: usize,
    pub files_failed: usize,
    pub records: usize,
    pub rows_written: usize,
    pub rows_skipped: usize,
}

/// Outcome of a migration run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MigrationReport {
    pub tenant: String,
    #[serde(flatten)]
    pub totals: JobReport,
    pub per_job: BTreeMap<JobKind, JobReport>,
}

impl MigrationReport {
    fn new(tenant: &str) -> Self {
        Self {
            tenant: tenant.to_string(),
            ..Default::default()
        }
    }

    /// Applies `update` to both the job's counters and the totals.
    fn record(&mut self, job: JobKind, update: impl Fn(&mut JobReport)) {
        update(self.per_job.entry(job).or_default());
        update(&mut self.totals);
    }

    pub fn has_failures(&self) -> bool {
        self.totals.files_failed > 0
    }
}

/// Coordinates the consumer, processor, and loader.
///
/// The orchestrator:
/// - Resolves the tenant before any file is read
/// - Streams source files from the consumer task
/// - Imports files strictly one after another, in discovery order
/// - Logs and counts per-file failures without aborting the run
pub struct Orchestrator {
    consumer: Arc<SourceConsumer>,
    processor: SourceProcessor,
    loader: ConfigLoader,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components and configuration.
    pub fn new(
        consumer: SourceConsumer,
        processor: SourceProcessor,
        loader: ConfigLoader,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            consumer: Arc::new(consumer),
            processor,
            loader,
            config,
        }
    }

    /// Runs every job in order and returns the migration report.
    ///
    /// # Errors
    ///
    /// Only failures that make the whole run meaningless are returned: an
    /// unknown tenant, a repository error while resolving it, or a consumer
    /// that stopped before the end of the stream.
    #[instrument(skip(self, jobs), fields(tenant = %self.config.tenant_name))]
    pub async fn run(self, jobs: Vec<ImportJob>) -> Result<MigrationReport, OrchestratorError> {
        let tenant = self.loader.resolve_tenant(&self.config.tenant_name).await?;
        info!(tenant_uuid = %tenant, jobs = jobs.len(), "Starting migration");

        let mut report = MigrationReport::new(&self.config.tenant_name);
        let (tx, mut rx) = mpsc::channel::<SourceMessage>(self.config.channel_buffer_size);

        let consumer = Arc::clone(&self.consumer);
        let consumer_handle = tokio::spawn(async move { consumer.run(jobs, tx).await });

        loop {
            match rx.recv().await {
                Some(SourceMessage::File(file)) => {
                    self.import_file(tenant, &file, &mut report).await;
                }
                Some(SourceMessage::Error { job, path, error }) => {
                    error!(job = %job, path = %path.display(), error = %error, "Failed to read source");
                    report.record(job, |r| {
                        r.files_seen += 1;
                        r.files_failed += 1;
                    });
                }
                Some(SourceMessage::JobEnd(job)) => {
                    let summary = *report.per_job.entry(job).or_default();
                    info!(
                        job = %job,
                        files = summary.files_seen,
                        imported = summary.files_imported,
                        failed = summary.files_failed,
                        rows_written = summary.rows_written,
                        "Job finished"
                    );
                }
                Some(SourceMessage::End) => break,
                None => {
                    return match consumer_handle.await {
                        Ok(Err(e)) => Err(e.into()),
                        _ => Err(OrchestratorError::ChannelClosed),
                    };
                }
            }
        }

        info!(
            files = report.totals.files_seen,
            imported = report.totals.files_imported,
            empty = report.totals.files_empty,
            failed = report.totals.files_failed,
            rows_written = report.totals.rows_written,
            rows_skipped = report.totals.rows_skipped,
            "Migration finished"
        );
        Ok(report)
    }

    /// Parses and persists one file, recording the outcome in `report`.
    #[instrument(skip(self, tenant, file, report), fields(job = %file.job, path = %file.path.display()))]
    async fn import_file(&self, tenant: Uuid, file: &SourceFile, report: &mut MigrationReport) {
        report.record(file.job, |r| r.files_seen += 1);

        let changeset = match self.processor.process(file) {
            Ok(changeset) => changeset,
            Err(e) => {
                error!(error = %e, "Failed to parse source file");
                report.record(file.job, |r| r.files_failed += 1);
                return;
            }
        };

        if changeset.is_empty() {
            warn!("No records in source file");
            report.record(file.job, |r| r.files_empty += 1);
            return;
        }

        let records = changeset.record_count();
        match self.loader.persist_changeset(tenant, &changeset).await {
            Ok(summary) => {
                info!(
                    records,
                    rows_written = summary.rows_written,
                    rows_skipped = summary.rows_skipped,
                    "Imported source file"
                );
                report.record(file.job, |r| {
                    r.files_imported += 1;
                    r.records += records;
                    r.rows_written += summary.rows_written;
                    r.rows_skipped += summary.rows_skipped;
                });
            }
            Err(LoaderError::Repository(e)) => {
                error!(error = %e, records, "Failed to persist source file");
                report.record(file.job, |r| r.files_failed += 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumer::{FilesystemSources, Source, WalkOrder};
    use crate::errors::ProcessorError;
    use crate::processor::HandleSource;
    use async_trait::async_trait;
    use config_migrator_repository::{
        ConfigRepository, DryRunRepository, PersistSummary, RepositoryError,
    };
    use config_migrator_shared::types::{BlacklistEntry, Changeset};
    use std::fs;
    use tempfile::TempDir;

    /// One blacklist entry per line; a line reading `bad` fails the file.
    struct LineHandler;

    impl HandleSource for LineHandler {
        fn handle(&self, file: &SourceFile) -> Result<Changeset, ProcessorError> {
            let mut changeset = Changeset::default();
            for line in file.contents.lines().filter(|l| !l.is_empty()) {
                if line == "bad" {
                    return Err(ProcessorError::Xml("bad line".to_string()));
                }
                changeset.blacklist.push(BlacklistEntry {
                    phone_number: line.to_string(),
                });
            }
            Ok(changeset)
        }
    }

    struct FailingRepository;

    #[async_trait]
    impl ConfigRepository for FailingRepository {
        async fn resolve_tenant(&self, _name: &str) -> Result<Uuid, RepositoryError> {
            Ok(Uuid::nil())
        }

        async fn persist_changeset(
            &self,
            _tenant: Uuid,
            _changeset: &Changeset,
        ) -> Result<PersistSummary, RepositoryError> {
            Err(RepositoryError::TenantNotFound("gone".to_string()))
        }
    }

    fn blacklist_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        dir
    }

    fn blacklist_job(dir: &TempDir) -> ImportJob {
        ImportJob::new(
            JobKind::Blacklist,
            Source::tree(dir.path(), &["txt"], WalkOrder::ShallowFirst),
        )
    }

    fn orchestrator(repository: Arc<dyn ConfigRepository>) -> Orchestrator {
        let mut processor = SourceProcessor::new();
        processor.register_handler(JobKind::Blacklist, Arc::new(LineHandler));
        Orchestrator::new(
            SourceConsumer::new(Box::new(FilesystemSources)),
            processor,
            ConfigLoader::new(repository),
            OrchestratorConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_failed_file_does_not_stop_the_run() {
        let dir = blacklist_dir(&[("a.txt", "111\n222\n"), ("b.txt", "bad\n"), ("c.txt", "333\n")]);
        let repository = Arc::new(DryRunRepository::new().recording());

        let report = orchestrator(repository.clone())
            .run(vec![blacklist_job(&dir)])
            .await
            .unwrap();

        assert_eq!(report.totals.files_seen, 3);
        assert_eq!(report.totals.files_imported, 2);
        assert_eq!(report.totals.files_failed, 1);
        assert_eq!(report.totals.records, 3);
        assert_eq!(report.totals.rows_written, 3);
        assert!(report.has_failures());
        assert_eq!(report.per_job[&JobKind::Blacklist].files_failed, 1);

        let persisted = repository.persisted();
        assert_eq!(persisted.len(), 2);
        assert_eq!(persisted[1].blacklist[0].phone_number, "333");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_entry_does_not_stop_the_job() {
        let dir = blacklist_dir(&[("a.txt", "111\n"), ("c.txt", "333\n")]);
        std::os::unix::fs::symlink(dir.path().join("gone.txt"), dir.path().join("b.txt")).unwrap();
        let repository = Arc::new(DryRunRepository::new().recording());

        let report = orchestrator(repository.clone())
            .run(vec![blacklist_job(&dir)])
            .await
            .unwrap();

        assert_eq!(report.totals.files_seen, 3);
        assert_eq!(report.totals.files_imported, 2);
        assert_eq!(report.totals.files_failed, 1);
        assert_eq!(report.totals.records, 2);

        let persisted = repository.persisted();
        assert_eq!(persisted.len(), 2);
        assert_eq!(persisted[1].blacklist[0].phone_number, "333");
    }

    #[tokio::test]
    async fn test_empty_file_is_counted_and_not_persisted() {
        let dir = blacklist_dir(&[("empty.txt", "\n\n")]);
        let repository = Arc::new(DryRunRepository::new().recording());

        let report = orchestrator(repository.clone())
            .run(vec![blacklist_job(&dir)])
            .await
            .unwrap();

        assert_eq!(report.totals.files_empty, 1);
        assert_eq!(report.totals.files_imported, 0);
        assert!(!report.has_failures());
        assert!(repository.persisted().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_tenant_aborts_before_import() {
        let dir = blacklist_dir(&[("a.txt", "111\n")]);
        let repository = Arc::new(DryRunRepository::with_tenants(["Other"]).recording());

        let result = orchestrator(repository.clone())
            .run(vec![blacklist_job(&dir)])
            .await;

        assert!(matches!(
            result,
            Err(OrchestratorError::Loader(LoaderError::Repository(RepositoryError::TenantNotFound(_))))
        ));
        assert!(repository.persisted().is_empty());
    }

    #[tokio::test]
    async fn test_persist_failure_is_counted() {
        let dir = blacklist_dir(&[("a.txt", "111\n"), ("b.txt", "222\n")]);

        let report = orchestrator(Arc::new(FailingRepository))
            .run(vec![blacklist_job(&dir)])
            .await
            .unwrap();

        assert_eq!(report.totals.files_seen, 2);
        assert_eq!(report.totals.files_failed, 2);
        assert_eq!(report.totals.rows_written, 0);
    }

    #[tokio::test]
    async fn test_job_without_handler_fails_its_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("default.xml"), "<include/>").unwrap();
        let job = ImportJob::new(
            JobKind::Dialplan,
            Source::tree(dir.path(), &["xml"], WalkOrder::ShallowFirst),
        );

        let report = orchestrator(Arc::new(DryRunRepository::new()))
            .run(vec![job])
            .await
            .unwrap();

        assert_eq!(report.per_job[&JobKind::Dialplan].files_failed, 1);
    }

    #[tokio::test]
    async fn test_missing_source_reports_job_with_no_files() {
        let dir = TempDir::new().unwrap();
        let job = ImportJob::new(JobKind::GlobalVars, Source::File(dir.path().join("vars.xml")));

        let report = orchestrator(Arc::new(DryRunRepository::new()))
            .run(vec![job])
            .await
            .unwrap();

        assert_eq!(report.per_job[&JobKind::GlobalVars], JobReport::default());
        assert_eq!(report.totals.files_seen, 0);
    }
}
