//! Repository trait for accounts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{Account, AccountId, Error, NewAccount};

/// Storage operations on the `users` table.
///
/// Every method must use parameterized statements. Implementations hold no
/// cached account state: each call reads from or writes to the datastore.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Insert a new account with `failed_attempts = 0` and `is_locked = false`.
    ///
    /// Returns `AuthError::UsernameTaken` if the username already exists.
    async fn create(&self, account: NewAccount) -> Result<Account, Error>;

    /// Find an account by its id.
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, Error>;

    /// Find an account by exact username. The caller is responsible for trimming.
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, Error>;

    /// Set `failed_attempts` to 0.
    async fn reset_failed_attempts(&self, id: AccountId) -> Result<(), Error>;

    /// Set `last_login` to the given time.
    async fn record_successful_login(&self, id: AccountId, at: DateTime<Utc>)
    -> Result<(), Error>;

    /// Increment `failed_attempts` of an unlocked account and return the new value.
    ///
    /// The lock check, the increment and the read back must be a single atomic
    /// operation on the row so that concurrent failures are never lost and a locked
    /// account is never counted against. Returns `None` when no unlocked account
    /// with this id exists.
    async fn increment_failed_attempts(&self, id: AccountId) -> Result<Option<u32>, Error>;

    /// Set `is_locked` to true.
    ///
    /// Returns `true` only if this call changed the flag, `false` if the account
    /// was already locked.
    async fn lock(&self, id: AccountId) -> Result<bool, Error>;
}
