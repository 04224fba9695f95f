use crate::{
    Account, AccountId, Error, NewAccount,
    repositories::{AccountRepository, RepositoryProvider},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Adapter that wraps a RepositoryProvider and implements [`AccountRepository`]
pub struct AccountRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> AccountRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> AccountRepository for AccountRepositoryAdapter<R> {
    async fn create(&self, account: NewAccount) -> Result<Account, Error> {
        self.provider.account().create(account).await
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, Error> {
        self.provider.account().find_by_id(id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, Error> {
        self.provider.account().find_by_username(username).await
    }

    async fn reset_failed_attempts(&self, id: AccountId) -> Result<(), Error> {
        self.provider.account().reset_failed_attempts(id).await
    }

    async fn record_successful_login(
        &self,
        id: AccountId,
        at: DateTime<Utc>,
    ) -> Result<(), Error> {
        self.provider.account().record_successful_login(id, at).await
    }

    async fn increment_failed_attempts(&self, id: AccountId) -> Result<Option<u32>, Error> {
        self.provider.account().increment_failed_attempts(id).await
    }

    async fn lock(&self, id: AccountId) -> Result<bool, Error> {
        self.provider.account().lock(id).await
    }
}
