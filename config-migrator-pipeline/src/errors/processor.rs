//! Error types for the processor module of the Config Migrator Pipeline.
//! Defines specific errors that can occur while turning a source file into
//! typed records.
use config_migrator_shared::types::JobKind;
use thiserror::Error;

/// Represents errors that can occur within the source processor.
///
/// Every variant fails only the file being processed.
#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("No handler registered for job '{0}'")]
    NoHandler(JobKind),
    #[error("Malformed XML: {0}")]
    Xml(String),
    #[error("Malformed CSV: {0}")]
    Csv(String),
    #[error("Missing attribute '{attribute}' on <{element}>")]
    MissingAttribute { element: String, attribute: String },
    #[error("Invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },
    #[error("Extension {position} of file {ordinal} is outside the dialplan priority range")]
    PriorityOutOfRange { ordinal: usize, position: usize },
}
