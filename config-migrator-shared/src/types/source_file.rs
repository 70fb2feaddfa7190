use crate::types::JobKind;
use std::path::{Path, PathBuf};

/// A configuration file read from disk, tagged with the job it belongs to.
///
/// `ordinal` is the 1-based position of the file within its job's sorted
/// walk, so handlers can derive priorities that stay stable across runs.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceFile {
    pub job: JobKind,
    pub path: PathBuf,
    pub ordinal: usize,
    pub contents: String,
}

impl SourceFile {
    pub fn new(job: JobKind, path: impl Into<PathBuf>, ordinal: usize, contents: impl Into<String>) -> Self {
        Self {
            job,
            path: path.into(),
            ordinal,
            contents: contents.into(),
        }
    }

    /// File name without its extension (`internal.xml` -> `internal`).
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File name including its extension.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Name of the directory directly containing the file, if any.
    pub fn parent_dir_name(&self) -> Option<String> {
        self.path
            .parent()
            .and_then(Path::file_name)
            .map(|s| s.to_string_lossy().into_owned())
    }

    /// Lower-cased file extension, if any.
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|s| s.to_string_lossy().to_ascii_lowercase())
    }
}
