//! User-facing text for login outcomes
//!
//! An unknown username and a wrong password produce the same text. The attempt
//! hint and the lock notices still differ, which leaks that an account exists
//! once it has been tried; that trade-off is intentional and kept as is.
use crate::{
    Error,
    error::AuthError,
    lockout::AttemptCount,
};

pub const MISSING_INPUT: &str = "Please enter both username and password.";
pub const INVALID_CREDENTIALS: &str = "Username or password does not exist.";
pub const ACCOUNT_LOCKED: &str = "Your account is locked due to too many failed login attempts.";
pub const UNAVAILABLE: &str = "Login is temporarily unavailable. Please try again later.";
pub const USERNAME_TAKEN: &str = "That username is already taken.";

/// A message the page layer can render after a rejected login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginMessage {
    pub text: String,
    /// Secondary line such as `Attempt 1/3`.
    pub hint: Option<String>,
}

impl LoginMessage {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            hint: None,
        }
    }

    pub fn from_error(error: &Error) -> Self {
        match error {
            Error::Auth(auth) => Self::from_auth_error(auth),
            _ => Self::new(UNAVAILABLE),
        }
    }

    pub fn from_auth_error(error: &AuthError) -> Self {
        match error {
            AuthError::InvalidInput => Self::new(MISSING_INPUT),
            AuthError::InvalidCredentials { attempts } => Self {
                text: INVALID_CREDENTIALS.to_string(),
                hint: attempts.map(|count| attempt_hint(&count)),
            },
            AuthError::AccountLocked => Self::new(ACCOUNT_LOCKED),
            AuthError::AccountLockedJustNow { attempts } => Self::new(format!(
                "{INVALID_CREDENTIALS} Account is locked after {attempts} attempts."
            )),
            AuthError::UsernameTaken => Self::new(USERNAME_TAKEN),
        }
    }
}

fn attempt_hint(count: &AttemptCount) -> String {
    format!("Attempt {}/{}", count.attempts, count.threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;

    #[test]
    fn test_unknown_user_and_wrong_password_share_text() {
        let unknown = LoginMessage::from_auth_error(&AuthError::InvalidCredentials {
            attempts: None,
        });
        let wrong = LoginMessage::from_auth_error(&AuthError::InvalidCredentials {
            attempts: Some(AttemptCount {
                attempts: 1,
                threshold: 3,
            }),
        });

        assert_eq!(unknown.text, wrong.text);
        assert_eq!(unknown.hint, None);
        assert_eq!(wrong.hint.as_deref(), Some("Attempt 1/3"));
    }

    #[test]
    fn test_lock_messages() {
        let just_now = LoginMessage::from_auth_error(&AuthError::AccountLockedJustNow {
            attempts: 3,
        });
        assert_eq!(
            just_now.text,
            "Username or password does not exist. Account is locked after 3 attempts."
        );

        let locked = LoginMessage::from_auth_error(&AuthError::AccountLocked);
        assert_eq!(locked.text, ACCOUNT_LOCKED);
        assert_eq!(locked.hint, None);
    }

    #[test]
    fn test_missing_input_message() {
        let message = LoginMessage::from_error(&Error::Auth(AuthError::InvalidInput));
        assert_eq!(message.text, MISSING_INPUT);
    }

    #[test]
    fn test_storage_failure_is_not_reported_as_bad_credentials() {
        let message = LoginMessage::from_error(&Error::Storage(StorageError::Connection(
            "refused".to_string(),
        )));
        assert_eq!(message.text, UNAVAILABLE);
        assert_ne!(message.text, INVALID_CREDENTIALS);
    }
}
