//! Store error taxonomy.

use thiserror::Error;

/// Unified error type for datastore operations that handler code can
/// branch on.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record with the given external identifier
    #[error("user not found")]
    NotFound,

    /// Unique constraint violation (duplicate external identifier)
    #[error("unique constraint violation: {message}")]
    UniqueViolation {
        constraint: Option<String>,
        message: String,
    },

    /// Catch-all for non-recoverable errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convert from sqlx::Error using sqlx's own error categorization.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::UniqueViolation {
                    constraint: db_err.constraint().map(|s| s.to_string()),
                    message: db_err.message().to_string(),
                }
            }
            // All other database errors are non-recoverable
            _ => StoreError::Other(anyhow::Error::from(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn test_connection_errors_are_opaque() {
        let err = StoreError::from(sqlx::Error::PoolClosed);
        assert!(matches!(err, StoreError::Other(_)));
    }
}
