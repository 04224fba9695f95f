//! Password authentication with automatic account lockout.
//!
//! The [`Authenticator`] is the only component that writes an account's security
//! counters. Each call re-reads the account, so the authenticator itself keeps no
//! state between calls and can be shared freely across tasks.
//!
//! # Lockout
//!
//! Every wrong password against an existing, unlocked account increments
//! `failed_attempts`. The attempt that brings the counter to the lock threshold
//! locks the account and is reported as [`AuthError::AccountLockedJustNow`]. A
//! successful login resets the counter. Nothing here ever unlocks an account.
//!
//! Concurrent wrong passwords for the same account may all pass the initial lock
//! check. The increment only applies to an unlocked row and the lock reports whether
//! it changed the flag, so exactly one of them is reported as locking the account
//! and the rest see [`AuthError::AccountLocked`].
//!
//! # Example
//!
//! ```rust,ignore
//! use wicket_core::{Authenticator, LockoutConfig};
//!
//! let authenticator = Authenticator::new(repository, LockoutConfig::default());
//!
//! match authenticator.authenticate("alice", "secret").await {
//!     Ok(account) => println!("welcome {}", account.username),
//!     Err(e) => println!("{}", LoginMessage::from_error(&e).text),
//! }
//! ```

use std::sync::Arc;

use chrono::Utc;

use crate::{
    AuthenticatedAccount, Error,
    error::AuthError,
    lockout::{AttemptCount, LockoutConfig},
    password::verify_password,
    repositories::AccountRepository,
};

/// Verifies credentials and maintains the failed attempt counter and lock flag.
pub struct Authenticator<R: AccountRepository> {
    repository: Arc<R>,
    config: LockoutConfig,
}

impl<R: AccountRepository> Authenticator<R> {
    pub fn new(repository: Arc<R>, config: LockoutConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &LockoutConfig {
        &self.config
    }

    /// Authenticate using the configured lock threshold.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedAccount, Error> {
        self.authenticate_with_config(username, password, self.config)
            .await
    }

    /// Authenticate using an explicit lock threshold for this call.
    ///
    /// A threshold of zero is rejected with a validation error before the
    /// datastore is touched.
    pub async fn authenticate_with_threshold(
        &self,
        username: &str,
        password: &str,
        lock_threshold: u32,
    ) -> Result<AuthenticatedAccount, Error> {
        let username = require_credentials(username, password)?;
        let config = LockoutConfig::new(lock_threshold)?;
        self.authenticate_with_config(username, password, config)
            .await
    }

    async fn authenticate_with_config(
        &self,
        username: &str,
        password: &str,
        config: LockoutConfig,
    ) -> Result<AuthenticatedAccount, Error> {
        let username = require_credentials(username, password)?;

        let Some(account) = self.repository.find_by_username(username).await? else {
            tracing::debug!(username, "Login rejected: unknown username");
            return Err(AuthError::InvalidCredentials { attempts: None }.into());
        };

        if account.is_locked {
            tracing::debug!(account_id = %account.id, "Login rejected: account is locked");
            return Err(AuthError::AccountLocked.into());
        }

        if verify_password(password, &account.password_hash) {
            self.repository.reset_failed_attempts(account.id).await?;
            self.repository
                .record_successful_login(account.id, Utc::now())
                .await?;

            tracing::info!(account_id = %account.id, "Login succeeded");
            return Ok(account.into());
        }

        let Some(attempts) = self.repository.increment_failed_attempts(account.id).await? else {
            // Another request locked the account after the lookup above.
            tracing::debug!(
                account_id = %account.id,
                "Login rejected: account was locked concurrently"
            );
            return Err(AuthError::AccountLocked.into());
        };

        if config.should_lock(attempts) {
            // The counter is already incremented. If locking fails, the next
            // failed attempt reaches the threshold again and retries the lock.
            let locked_now = self.repository.lock(account.id).await.inspect_err(|e| {
                tracing::error!(
                    account_id = %account.id,
                    attempts,
                    error = %e,
                    "Failed to lock account"
                );
            })?;

            if !locked_now {
                tracing::debug!(
                    account_id = %account.id,
                    attempts,
                    "Login rejected: account was locked by a concurrent login"
                );
                return Err(AuthError::AccountLocked.into());
            }

            tracing::warn!(
                account_id = %account.id,
                attempts,
                "Account locked after repeated failed logins"
            );
            return Err(AuthError::AccountLockedJustNow { attempts }.into());
        }

        tracing::debug!(
            account_id = %account.id,
            attempts,
            threshold = config.lock_threshold(),
            "Login rejected: wrong password"
        );
        Err(AuthError::InvalidCredentials {
            attempts: Some(AttemptCount {
                attempts,
                threshold: config.lock_threshold(),
            }),
        }
        .into())
    }
}

/// Trim the username and reject blank input.
fn require_credentials<'a>(username: &'a str, password: &str) -> Result<&'a str, AuthError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::InvalidInput);
    }
    Ok(username)
}
