//! Configuration module for the config migrator.
//! Defines the command line settings and wires the pipeline dependencies.
mod dependencies;
pub mod handlers;
mod settings;

pub use dependencies::Dependencies;
pub use settings::Settings;
