pub mod utilities;

use thiserror::Error;

use crate::lockout::AttemptCount;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Outcomes of a rejected login.
///
/// `InvalidCredentials` is returned both for an unknown username and for a wrong
/// password so that callers cannot tell whether an account exists. Only the wrong
/// password case carries an attempt count.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Username and password are required")]
    InvalidInput,

    #[error("Invalid credentials")]
    InvalidCredentials { attempts: Option<AttemptCount> },

    #[error("Account is locked")]
    AccountLocked,

    #[error("Account locked after {attempts} failed attempts")]
    AccountLockedJustNow { attempts: u32 },

    #[error("Username is already taken")]
    UsernameTaken,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Record not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Invalid lock threshold: {0}")]
    InvalidLockThreshold(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

impl Error {
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Auth(_))
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// True when the datastore could not serve the request.
    ///
    /// These errors must be shown as a temporary outage, never as bad credentials.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::Storage(_))
    }

    /// True when the account is locked, whether before or because of this attempt.
    pub fn is_locked(&self) -> bool {
        matches!(
            self,
            Error::Auth(AuthError::AccountLocked) | Error::Auth(AuthError::AccountLockedJustNow { .. })
        )
    }

    /// Returns the underlying login rejection, if this error is one.
    pub fn auth_error(&self) -> Option<&AuthError> {
        match self {
            Error::Auth(e) => Some(e),
            _ => None,
        }
    }
}
