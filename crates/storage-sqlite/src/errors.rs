//! Storage-specific error types for SQLite operations.
//!
//! This module wraps Diesel and r2d2 errors and converts them to the
//! database-agnostic error types defined in `dragonshield_core`.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use dragonshield_core::errors::{DatabaseError, Error};
use thiserror::Error;

/// Storage-specific errors that wrap Diesel and r2d2 types.
///
/// These errors are internal to the storage layer and are converted to
/// `dragonshield_core::Error` before being returned to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Stored value could not be decoded: {0}")]
    Corrupt(String),

    /// A core error raised inside a writer job; handed back unchanged.
    #[error(transparent)]
    Core(Error),
}

impl From<Error> for StorageError {
    fn from(err: Error) -> Self {
        StorageError::Core(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConnectionFailed(e) => {
                Error::Database(DatabaseError::ConnectionFailed(e.to_string()))
            }
            StorageError::PoolError(e) => {
                Error::Database(DatabaseError::PoolCreationFailed(e.to_string()))
            }
            StorageError::QueryFailed(DieselError::NotFound) => {
                Error::Database(DatabaseError::NotFound("Record not found".to_string()))
            }
            StorageError::QueryFailed(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                info,
            )) => Error::Database(DatabaseError::UniqueViolation(info.message().to_string())),
            StorageError::QueryFailed(DieselError::DatabaseError(
                DatabaseErrorKind::ForeignKeyViolation,
                info,
            )) => Error::Database(DatabaseError::ForeignKeyViolation(
                info.message().to_string(),
            )),
            StorageError::QueryFailed(e) => {
                Error::Database(DatabaseError::QueryFailed(e.to_string()))
            }
            StorageError::MigrationFailed(e) => Error::Database(DatabaseError::MigrationFailed(e)),
            StorageError::Corrupt(e) => Error::Database(DatabaseError::Internal(e)),
            StorageError::Core(e) => e,
        }
    }
}

/// Parses a decimal stored as TEXT.
pub(crate) fn parse_decimal(
    column: &str,
    raw: &str,
) -> std::result::Result<rust_decimal::Decimal, StorageError> {
    raw.parse().map_err(|e: rust_decimal::Error| {
        StorageError::Corrupt(format!("{} = '{}': {}", column, raw, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dragonshield_core::errors::ValidationError;

    #[test]
    fn test_not_found_maps_to_core_not_found() {
        let err: Error = StorageError::from(DieselError::NotFound).into();
        assert!(matches!(err, Error::Database(DatabaseError::NotFound(_))));
    }

    #[test]
    fn test_core_errors_pass_through() {
        let core = Error::Validation(ValidationError::InvalidInput("bad".to_string()));
        let err: Error = StorageError::from(core).into();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidInput(ref m)) if m == "bad"
        ));
    }

    #[test]
    fn test_parse_decimal_reports_column() {
        assert_eq!(parse_decimal("quantity", "12.5").unwrap().to_string(), "12.5");
        let err = parse_decimal("quantity", "abc").unwrap_err();
        assert!(err.to_string().contains("quantity = 'abc'"));
    }
}
