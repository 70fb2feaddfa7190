//! Consumer module for the config migrator pipeline.
//!
//! Discovers the source files of each import job on disk and streams their
//! contents to the orchestrator through a bounded channel. Acts as the entry
//! point for the pipeline, feeding data to processing and loading components.

use crate::errors::ConsumerError;
use config_migrator_shared::types::{JobKind, SourceFile};
use std::cmp::Reverse;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Order in which the files of a tree are handed to the processor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkOrder {
    /// Files closer to the root first. A profile such as `external.xml`
    /// is imported before the gateways in `external/*.xml`.
    ShallowFirst,
    /// Deeper files first. Users in `default/*.xml` are imported before the
    /// groups in `default.xml` that list them.
    DeepFirst,
}

/// Where an import job reads its files from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// Every file below `root` whose extension is one of `extensions`,
    /// compared case-insensitively.
    Tree {
        root: PathBuf,
        extensions: Vec<String>,
        order: WalkOrder,
    },
    /// A single file.
    File(PathBuf),
}

impl Source {
    pub fn tree(root: impl Into<PathBuf>, extensions: &[&str], order: WalkOrder) -> Self {
        Source::Tree {
            root: root.into(),
            extensions: extensions.iter().map(|e| e.to_ascii_lowercase()).collect(),
            order,
        }
    }

    /// Root directory or file path of the source.
    pub fn path(&self) -> &Path {
        match self {
            Source::Tree { root, .. } => root,
            Source::File(path) => path,
        }
    }
}

/// One kind of import together with the location of its files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportJob {
    pub kind: JobKind,
    pub source: Source,
}

impl ImportJob {
    pub fn new(kind: JobKind, source: Source) -> Self {
        Self { kind, source }
    }
}

/// Messages sent from the consumer to the orchestrator.
#[derive(Debug)]
pub enum SourceMessage {
    File(SourceFile),
    Error {
        job: JobKind,
        path: PathBuf,
        error: ConsumerError,
    },
    JobEnd(JobKind),
    End,
}

/// Trait for listing the files an import job should read.
pub trait DiscoverSources: Send + Sync {
    /// Returns the files of `job` in the order they must be processed.
    ///
    /// Entries that could not be inspected are returned in place as `Err`
    /// so the remaining files of the job are still imported. A source that
    /// does not exist yields no entries.
    fn discover(&self, job: &ImportJob) -> Vec<Result<PathBuf, ConsumerError>>;
}

/// Discovers sources on the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FilesystemSources;

impl FilesystemSources {
    fn walk_tree(
        root: &Path,
        extensions: &[String],
        order: WalkOrder,
    ) -> Vec<Result<PathBuf, ConsumerError>> {
        let matches = |path: &Path| {
            path.extension()
                .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
                .is_some_and(|ext| extensions.contains(&ext))
        };

        let mut entries = Vec::new();
        for entry in WalkDir::new(root).follow_links(true) {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && matches(entry.path()) {
                        entries.push((entry.depth(), entry.into_path(), None));
                    }
                }
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    // Unreadable directories have no extension to filter on.
                    if path.extension().is_some() && !matches(&path) {
                        debug!(path = %path.display(), error = %e, "Skipping unreadable entry");
                        continue;
                    }
                    warn!(path = %path.display(), error = %e, "Unreadable entry in source tree");
                    let error = ConsumerError::Walking {
                        path: path.clone(),
                        message: e.to_string(),
                    };
                    entries.push((e.depth(), path, Some(error)));
                }
            }
        }

        match order {
            WalkOrder::ShallowFirst => entries.sort_by(|(da, pa, _), (db, pb, _)| (da, pa).cmp(&(db, pb))),
            WalkOrder::DeepFirst => {
                entries.sort_by(|(da, pa, _), (db, pb, _)| (Reverse(da), pa).cmp(&(Reverse(db), pb)))
            }
        }
        entries
            .into_iter()
            .map(|(_, path, error)| match error {
                Some(error) => Err(error),
                None => Ok(path),
            })
            .collect()
    }
}

impl DiscoverSources for FilesystemSources {
    fn discover(&self, job: &ImportJob) -> Vec<Result<PathBuf, ConsumerError>> {
        let path = job.source.path();
        if !path.exists() {
            warn!(job = %job.kind, path = %path.display(), "Source not found, skipping job");
            return Vec::new();
        }

        match &job.source {
            Source::Tree {
                root,
                extensions,
                order,
            } => Self::walk_tree(root, extensions, *order),
            Source::File(path) => vec![Ok(path.clone())],
        }
    }
}

/// Reads the files of every job and streams them, in order, over a channel.
pub struct SourceConsumer {
    discovery: Box<dyn DiscoverSources>,
}

impl SourceConsumer {
    pub fn new(discovery: Box<dyn DiscoverSources>) -> Self {
        Self { discovery }
    }

    /// Streams every file of `jobs` to `tx`.
    ///
    /// Files that cannot be discovered or read are reported with
    /// `SourceMessage::Error` and the stream goes on. Every job is closed by
    /// `SourceMessage::JobEnd` and the stream by `SourceMessage::End`.
    ///
    /// # Errors
    ///
    /// Returns `ConsumerError::ChannelSend` if the receiver is gone.
    pub async fn run(
        &self,
        jobs: Vec<ImportJob>,
        tx: mpsc::Sender<SourceMessage>,
    ) -> Result<(), ConsumerError> {
        for job in jobs {
            let entries = self.discovery.discover(&job);
            debug!(job = %job.kind, entries = entries.len(), "Discovered source files");
            for (index, entry) in entries.into_iter().enumerate() {
                let message = match entry {
                    Ok(path) => match tokio::fs::read(&path).await {
                        Ok(bytes) => SourceMessage::File(SourceFile::new(
                            job.kind,
                            path,
                            index + 1,
                            String::from_utf8_lossy(&bytes),
                        )),
                        Err(e) => SourceMessage::Error {
                            job: job.kind,
                            error: ConsumerError::ReadingFile {
                                path: path.clone(),
                                message: e.to_string(),
                            },
                            path,
                        },
                    },
                    Err(error) => SourceMessage::Error {
                        job: job.kind,
                        path: error
                            .path()
                            .unwrap_or_else(|| job.source.path())
                            .to_path_buf(),
                        error,
                    },
                };
                send(&tx, message).await?;
            }
            send(&tx, SourceMessage::JobEnd(job.kind)).await?;
        }
        send(&tx, SourceMessage::End).await
    }
}

async fn send(tx: &mpsc::Sender<SourceMessage>, message: SourceMessage) -> Result<(), ConsumerError> {
    tx.send(message)
        .await
        .map_err(|e| ConsumerError::ChannelSend(e.to_string()))
}
