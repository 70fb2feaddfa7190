//! # Config Migrator Repository
//! This crate provides the trait and implementations used to persist migrated
//! FreeSWITCH configuration. It includes definitions for errors, interfaces,
//! a concrete implementation for PostgreSQL and a dry-run implementation that
//! never touches a database.
pub mod dry_run;
pub mod errors;
pub mod interfaces;
pub mod postgres;

pub use dry_run::DryRunRepository;
pub use errors::RepositoryError;
pub use interfaces::{ConfigRepository, PersistSummary};
pub use postgres::PostgresConfigRepository;
