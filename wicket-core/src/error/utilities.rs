use crate::{Error, error::StorageError};

/// Extension trait for Result types to simplify database error mapping
///
/// # Example
///
/// ```rust,ignore
/// use wicket_core::error::utilities::DatabaseResultExt;
///
/// query.execute(&pool).await.map_db_err_with_context("Failed to lock account")?;
/// ```
pub trait DatabaseResultExt<T> {
    /// Convert a database error to a wicket storage error
    fn map_db_err(self) -> Result<T, Error>;

    /// Convert a database error to a wicket storage error with additional context
    fn map_db_err_with_context(self, context: &str) -> Result<T, Error>;
}

impl<T, E: std::fmt::Display> DatabaseResultExt<T> for Result<T, E> {
    fn map_db_err(self) -> Result<T, Error> {
        self.map_err(|e| {
            tracing::error!(error = %e, "Database operation failed");
            Error::Storage(StorageError::Database(e.to_string()))
        })
    }

    fn map_db_err_with_context(self, context: &str) -> Result<T, Error> {
        self.map_err(|e| {
            tracing::error!(error = %e, "{context}");
            Error::Storage(StorageError::Database(context.to_string()))
        })
    }
}
