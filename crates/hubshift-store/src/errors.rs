//! Error handling for hubshift-store
//!
//! Wraps hubshift-core ExError with store-specific helpers

use hubshift_core::errors::{ExError, ExErrorKind, HubError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Migration)
        .with_op("migration")
        .with_entity_id(migration_id)
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Migration)
        .with_op("migration_checksum")
        .with_entity_id(migration_id)
        .with_message(format!(
            "Checksum mismatch for migration {}: recorded {}, embedded {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from sqlx::Error
///
/// Unique violations become `AlreadyExists` so callers can tell a duplicate
/// row from a broken connection.
pub fn from_sqlx(err: sqlx::Error) -> ExError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return ExError::new(ExErrorKind::AlreadyExists)
                .with_op("postgres")
                .with_message(db_err.message().to_string());
        }
    }
    ExError::new(ExErrorKind::Persistence)
        .with_op("postgres")
        .with_message(err.to_string())
}

/// Update or reference to a row that does not exist
pub fn missing_row(table: &str, id: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op("repository")
        .with_entity_id(id.to_string())
        .with_message(format!("no row in {}", table))
}

/// A stored value that no longer parses into the domain type
pub fn corrupt_row(table: &str, err: HubError) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("decode_row")
        .with_message(format!("Invalid {} row: {}", table, err))
}
