use std::sync::Arc;

use crate::{
    Account, AccountId, Error, NewAccount,
    password::hash_password,
    repositories::AccountRepository,
    validation::{validate_email, validate_password, validate_username},
};

/// Service for creating and looking up accounts
///
/// Registration sits outside the login flow but shares its storage. Accounts
/// created here start unlocked with no failed attempts.
pub struct AccountService<R: AccountRepository> {
    repository: Arc<R>,
}

impl<R: AccountRepository> AccountService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Register a new account
    ///
    /// The username is trimmed before it is validated and stored, matching how
    /// login looks it up.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, Error> {
        let username = username.trim();
        let email = email.trim();
        validate_username(username)?;
        validate_email(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password);
        let account = self
            .repository
            .create(NewAccount::new(
                username.to_string(),
                email.to_string(),
                password_hash,
            ))
            .await?;

        tracing::info!(account_id = %account.id, "Account registered");
        Ok(account)
    }

    pub async fn get_account(&self, id: AccountId) -> Result<Option<Account>, Error> {
        self.repository.find_by_id(id).await
    }

    pub async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>, Error> {
        self.repository.find_by_username(username.trim()).await
    }
}
