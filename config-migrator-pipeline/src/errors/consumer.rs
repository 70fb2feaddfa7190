//! Error types for the consumer module of the Config Migrator Pipeline.
//! Defines specific errors that can occur while discovering and reading
//! source files.
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Represents errors that can occur within the source consumer.
#[derive(Debug, Error, Clone)]
pub enum ConsumerError {
    #[error("Error walking {path}: {message}")]
    Walking { path: PathBuf, message: String },
    #[error("Error reading {path}: {message}")]
    ReadingFile { path: PathBuf, message: String },
    #[error("Error sending message through channel: {0}")]
    ChannelSend(String),
}

impl ConsumerError {
    /// File or directory the error is about, when it concerns one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Walking { path, .. } | Self::ReadingFile { path, .. } => Some(path),
            Self::ChannelSend(_) => None,
        }
    }
}
