//! Processor module for the config migrator pipeline.
//!
//! Turns source files into changesets by dispatching each file to the
//! handler registered for its job kind.
use std::{collections::HashMap, sync::Arc};

use crate::errors::ProcessorError;
use config_migrator_shared::types::{Changeset, JobKind, SourceFile};

/// Trait for the per-job handlers that parse one source file.
pub trait HandleSource: Send + Sync {
    /// Extracts every record of `file` into a `Changeset`.
    fn handle(&self, file: &SourceFile) -> Result<Changeset, ProcessorError>;
}

/// Trait for turning a source file into a changeset.
pub trait ProcessSources {
    fn process(&self, file: &SourceFile) -> Result<Changeset, ProcessorError>;
}

/// `SourceProcessor` is responsible for processing `SourceFile`s into `Changeset`s.
/// It manages a registry of handlers, one per job kind.
#[derive(Default)]
pub struct SourceProcessor {
    handler_registry: HashMap<JobKind, Arc<dyn HandleSource>>,
}

impl SourceProcessor {
    /// Creates a new `SourceProcessor` instance.
    /// Initializes an empty `handler_registry` for source handlers.
    pub fn new() -> Self {
        Self {
            handler_registry: HashMap::new(),
        }
    }

    /// Registers the handler for a job kind, replacing any previous one.
    ///
    /// # Arguments
    ///
    /// * `kind` - The job kind whose files the handler parses.
    /// * `handler` - An `Arc` boxed trait object that implements `HandleSource`.
    pub fn register_handler(&mut self, kind: JobKind, handler: Arc<dyn HandleSource>) {
        self.handler_registry.insert(kind, handler);
    }

    pub fn has_handler(&self, kind: JobKind) -> bool {
        self.handler_registry.contains_key(&kind)
    }
}

impl ProcessSources for SourceProcessor {
    /// Processes one `SourceFile` with the handler of its job.
    ///
    /// # Errors
    ///
    /// `ProcessorError::NoHandler` if nothing is registered for the file's
    /// job, or whatever the handler reports.
    fn process(&self, file: &SourceFile) -> Result<Changeset, ProcessorError> {
        let handler = self
            .handler_registry
            .get(&file.job)
            .ok_or(ProcessorError::NoHandler(file.job))?;
        handler.handle(file)
    }
}
