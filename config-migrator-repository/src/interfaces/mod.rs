//! This module defines and re-exports the interfaces for the config repository.
//! It serves as a central point for accessing traits related to data interaction.
mod config;

pub use config::{ConfigRepository, PersistSummary};
