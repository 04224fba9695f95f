//! In-memory repository shared by the service tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    Account, AccountId, Error, NewAccount,
    error::{AuthError, StorageError},
    repositories::AccountRepository,
};

/// Which operations the mock should fail.
#[derive(Default, Clone, Copy)]
pub(crate) struct Failures {
    pub lookup: bool,
    pub increment: bool,
    pub lock: bool,
}

/// Another login locking the account at a chosen point of this one.
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Race {
    #[default]
    None,
    /// Locked after the lookup, before the increment.
    LockedBeforeIncrement,
    /// Locked after the increment, before this call's lock.
    LockedBeforeLock,
}

#[derive(Default)]
pub(crate) struct MockAccountRepository {
    accounts: Mutex<HashMap<AccountId, Account>>,
    next_id: Mutex<i64>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    failures: Failures,
    race: Race,
}

impl MockAccountRepository {
    pub fn failing(failures: Failures) -> Self {
        Self {
            failures,
            ..Default::default()
        }
    }

    pub fn racing(race: Race) -> Self {
        Self {
            race,
            ..Default::default()
        }
    }

    fn lock_concurrently(&self, id: AccountId) {
        if let Some(account) = self.accounts.lock().unwrap().get_mut(&id) {
            account.is_locked = true;
        }
    }

    /// Insert an account directly, bypassing the write counter.
    pub fn insert(&self, account: Account) {
        self.accounts.lock().unwrap().insert(account.id, account);
    }

    pub fn get(&self, id: AccountId) -> Account {
        self.accounts.lock().unwrap().get(&id).cloned().unwrap()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn unavailable() -> Error {
        Error::Storage(StorageError::Connection("connection refused".to_string()))
    }

    fn write<T>(&self, id: AccountId, f: impl FnOnce(&mut Account) -> T) -> Result<T, Error> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(&id)
            .ok_or(Error::Storage(StorageError::NotFound))?;
        Ok(f(account))
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, Error> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.values().any(|a| a.username == account.username) {
            return Err(AuthError::UsernameTaken.into());
        }

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let created = Account {
            id: AccountId::new(*next_id),
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            failed_attempts: 0,
            is_locked: false,
            last_login: None,
        };
        accounts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, Error> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.accounts.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, Error> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.failures.lookup {
            return Err(Self::unavailable());
        }
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn reset_failed_attempts(&self, id: AccountId) -> Result<(), Error> {
        self.write(id, |a| a.failed_attempts = 0)
    }

    async fn record_successful_login(
        &self,
        id: AccountId,
        at: DateTime<Utc>,
    ) -> Result<(), Error> {
        self.write(id, |a| a.last_login = Some(at))
    }

    async fn increment_failed_attempts(&self, id: AccountId) -> Result<Option<u32>, Error> {
        if self.failures.increment {
            return Err(Self::unavailable());
        }
        if self.race == Race::LockedBeforeIncrement {
            self.lock_concurrently(id);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .get_mut(&id)
            .filter(|a| !a.is_locked)
            .map(|a| {
                a.failed_attempts += 1;
                a.failed_attempts
            }))
    }

    async fn lock(&self, id: AccountId) -> Result<bool, Error> {
        if self.failures.lock {
            return Err(Self::unavailable());
        }
        if self.race == Race::LockedBeforeLock {
            self.lock_concurrently(id);
        }
        self.write(id, |a| !std::mem::replace(&mut a.is_locked, true))
    }
}
