//! HubShift Store - Postgres persistence
//!
//! Provides:
//! - Connection pool setup
//! - Embedded migrations recorded with SHA-256 checksums
//! - The `Repository` trait with Postgres and in-memory implementations

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::{MemoryRepo, PgRepo, Repository};
