//! Error types for the orchestrator module of the Config Migrator Pipeline.
//! Only errors that abort the whole run surface here. Per-file failures are
//! logged and counted in the report instead.
use crate::errors::consumer::ConsumerError;
use crate::errors::loader::LoaderError;
use thiserror::Error;

/// Represents errors that can occur within the orchestrator.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Consumer error: {0}")]
    Consumer(#[from] ConsumerError),
    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),
    #[error("Source channel closed before the end of the stream")]
    ChannelClosed,
}
