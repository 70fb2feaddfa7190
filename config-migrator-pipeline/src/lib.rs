//! # Config Migrator Pipeline
//! This crate defines the core traits and modules for importing FreeSWITCH
//! configuration files.
//! It includes modules for discovering and reading source files, turning them
//! into changesets, persisting those changesets and orchestrating the import
//! jobs, along with error handling.
pub mod consumer;
pub mod loader;
pub mod processor;
pub mod orchestrator;

pub mod errors;
