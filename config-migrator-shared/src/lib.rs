//! # Config Migrator Shared
//! This crate defines the shared data structures used across the config migrator.
//! It includes the import job kinds, the source files read from disk, the typed
//! records extracted from them and the changesets handed to the repository.
pub mod types;
