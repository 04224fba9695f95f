//! PostgreSQL implementation of the account repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use wicket_core::{
    Account, AccountId, Error, NewAccount,
    error::{AuthError, StorageError, utilities::DatabaseResultExt},
    repositories::AccountRepository,
};

const ACCOUNT_COLUMNS: &str =
    "id, username, email, password_hash, failed_attempts, is_locked, last_login";

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PostgresAccount {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    failed_attempts: i32,
    is_locked: bool,
    last_login: Option<DateTime<Utc>>,
}

impl From<PostgresAccount> for Account {
    fn from(row: PostgresAccount) -> Self {
        Account {
            id: AccountId::new(row.id),
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            failed_attempts: row.failed_attempts.max(0).unsigned_abs(),
            is_locked: row.is_locked,
            last_login: row.last_login,
        }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, Error> {
        let row = sqlx::query_as::<_, PostgresAccount>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Error::Auth(AuthError::UsernameTaken)
            }
            e => {
                tracing::error!(error = %e, "Failed to create account");
                Error::Storage(StorageError::Database(
                    "Failed to create account".to_string(),
                ))
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, Error> {
        let row = sqlx::query_as::<_, PostgresAccount>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_db_err_with_context("Failed to find account by id")?;

        Ok(row.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, Error> {
        let row = sqlx::query_as::<_, PostgresAccount>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE username = $1 LIMIT 1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_db_err_with_context("Failed to find account by username")?;

        Ok(row.map(Into::into))
    }

    async fn reset_failed_attempts(&self, id: AccountId) -> Result<(), Error> {
        sqlx::query("UPDATE users SET failed_attempts = 0 WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_db_err_with_context("Failed to reset failed attempts")?;

        Ok(())
    }

    async fn record_successful_login(
        &self,
        id: AccountId,
        at: DateTime<Utc>,
    ) -> Result<(), Error> {
        sqlx::query("UPDATE users SET last_login = $1 WHERE id = $2")
            .bind(at)
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_db_err_with_context("Failed to record successful login")?;

        Ok(())
    }

    async fn increment_failed_attempts(&self, id: AccountId) -> Result<Option<u32>, Error> {
        let attempts: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET failed_attempts = failed_attempts + 1
            WHERE id = $1 AND is_locked = FALSE
            RETURNING failed_attempts
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_db_err_with_context("Failed to increment failed attempts")?;

        Ok(attempts.map(|n| n.max(0).unsigned_abs()))
    }

    async fn lock(&self, id: AccountId) -> Result<bool, Error> {
        let result = sqlx::query(
            "UPDATE users SET is_locked = TRUE WHERE id = $1 AND is_locked = FALSE",
        )
        .bind(id.as_i64())
        .execute(&self.pool)
        .await
        .map_db_err_with_context("Failed to lock account")?;

        Ok(result.rows_affected() == 1)
    }
}
