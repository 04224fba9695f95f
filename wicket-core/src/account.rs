//! Accounts and their security counters
//!
//! An account is the sole entity wicket deals with. Accounts are created by a
//! registration flow (see [`crate::services::AccountService`]) and afterwards only
//! the [`crate::Authenticator`] mutates them:
//!
//! | Field             | Type               | Description                                          |
//! | ----------------- | ------------------ | ---------------------------------------------------- |
//! | `id`              | `AccountId`        | Integer primary key.                                 |
//! | `username`        | `String`           | Unique, case-sensitive login name.                   |
//! | `email`           | `String`           | Contact address, returned on successful login.       |
//! | `password_hash`   | `String`           | Salted adaptive hash of the password.                |
//! | `failed_attempts` | `u32`              | Consecutive failed logins, reset on success.         |
//! | `is_locked`       | `bool`             | Set once `failed_attempts` reaches the threshold.    |
//! | `last_login`      | `Option<DateTime>` | Timestamp of the most recent successful login.       |
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The integer primary key of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(i64);

impl AccountId {
    pub fn new(id: i64) -> Self {
        AccountId(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for AccountId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A row of the `users` table as read by the authenticator.
#[derive(Clone)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub failed_attempts: u32,
    pub is_locked: bool,
    pub last_login: Option<DateTime<Utc>>,
}

// Hand-written so the password hash never ends up in logs.
impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("failed_attempts", &self.failed_attempts)
            .field("is_locked", &self.is_locked)
            .field("last_login", &self.last_login)
            .finish()
    }
}

/// The payload returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedAccount {
    pub id: AccountId,
    pub username: String,
    pub email: String,
}

impl From<Account> for AuthenticatedAccount {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
        }
    }
}

/// An account to be inserted. The password must already be hashed.
#[derive(Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl NewAccount {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            username,
            email,
            password_hash,
        }
    }
}

impl std::fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAccount")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}
