//! SQLite implementation of the account repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use wicket_core::{
    Account, AccountId, Error, NewAccount,
    error::{AuthError, StorageError, utilities::DatabaseResultExt},
    repositories::AccountRepository,
};

const ACCOUNT_COLUMNS: &str =
    "id, username, email, password_hash, failed_attempts, is_locked, last_login";

pub struct SqliteAccountRepository {
    pool: SqlitePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SqliteAccount {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    failed_attempts: i64,
    is_locked: bool,
    last_login: Option<i64>,
}

impl From<SqliteAccount> for Account {
    fn from(row: SqliteAccount) -> Self {
        Account {
            id: AccountId::new(row.id),
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            failed_attempts: to_attempts(row.failed_attempts),
            is_locked: row.is_locked,
            last_login: row.last_login.and_then(DateTime::from_timestamp_millis),
        }
    }
}

fn to_attempts(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, Error> {
        let row = sqlx::query_as::<_, SqliteAccount>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(Utc::now().timestamp_millis())
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
        let row = sqlx::query_as::<_, SqliteAccount>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_db_err_with_context("Failed to find account by id")?;

        Ok(row.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, Error> {
        let row = sqlx::query_as::<_, SqliteAccount>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE username = ?1 LIMIT 1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_db_err_with_context("Failed to find account by username")?;

        Ok(row.map(Into::into))
    }

    async fn reset_failed_attempts(&self, id: AccountId) -> Result<(), Error> {
        sqlx::query("UPDATE users SET failed_attempts = 0 WHERE id = ?1")
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
        sqlx::query("UPDATE users SET last_login = ?1 WHERE id = ?2")
            .bind(at.timestamp_millis())
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_db_err_with_context("Failed to record successful login")?;

        Ok(())
    }

    async fn increment_failed_attempts(&self, id: AccountId) -> Result<Option<u32>, Error> {
        let attempts: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET failed_attempts = failed_attempts + 1
            WHERE id = ?1 AND is_locked = 0
            RETURNING failed_attempts
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_db_err_with_context("Failed to increment failed attempts")?;

        Ok(attempts.map(to_attempts))
    }

    async fn lock(&self, id: AccountId) -> Result<bool, Error> {
        let result = sqlx::query(
            "UPDATE users SET is_locked = 1 WHERE id = ?1 AND is_locked = 0",
        )
        .bind(id.as_i64())
        .execute(&self.pool)
        .await
        .map_db_err_with_context("Failed to lock account")?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::{SqliteMigrationManager, migrations};
    use wicket_migration::MigrationManager;

    async fn setup_test_db() -> SqlitePool {
        let _ = tracing_subscriber::fmt().try_init();

        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create pool");

        let manager = SqliteMigrationManager::new(pool.clone());
        manager
            .initialize()
            .await
            .expect("Failed to initialize migrations");
        manager
            .up(&migrations())
            .await
            .expect("Failed to run migrations");

        pool
    }

    async fn create_test_account(repo: &SqliteAccountRepository, username: &str) -> Account {
        repo.create(NewAccount::new(
            username.to_string(),
            format!("{username}@example.com"),
            bcrypt::hash("secret", 4).unwrap(),
        ))
        .await
        .expect("Failed to create test account")
    }

    #[tokio::test]
    async fn test_create_account_defaults() {
        let repo = SqliteAccountRepository::new(setup_test_db().await);

        let account = create_test_account(&repo, "alice").await;

        assert!(account.id.as_i64() > 0);
        assert_eq!(account.username, "alice");
        assert_eq!(account.email, "alice@example.com");
        assert_eq!(account.failed_attempts, 0);
        assert!(!account.is_locked);
        assert!(account.last_login.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = SqliteAccountRepository::new(setup_test_db().await);
        create_test_account(&repo, "alice").await;

        let result = repo
            .create(NewAccount::new(
                "alice".to_string(),
                "other@example.com".to_string(),
                "hash".to_string(),
            ))
            .await;

        assert!(matches!(result, Err(Error::Auth(AuthError::UsernameTaken))));
    }

    #[tokio::test]
    async fn test_find_by_username_is_exact() {
        let repo = SqliteAccountRepository::new(setup_test_db().await);
        let alice = create_test_account(&repo, "alice").await;

        let found = repo.find_by_username("alice").await.unwrap();
        assert_eq!(found.map(|a| a.id), Some(alice.id));

        assert!(repo.find_by_username("Alice").await.unwrap().is_none());
        assert!(repo.find_by_username("alice ").await.unwrap().is_none());
        assert!(repo.find_by_username("al%").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_username_is_not_injectable() {
        let repo = SqliteAccountRepository::new(setup_test_db().await);
        create_test_account(&repo, "alice").await;

        let found = repo.find_by_username("' OR '1'='1").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let repo = SqliteAccountRepository::new(setup_test_db().await);
        let alice = create_test_account(&repo, "alice").await;

        let found = repo.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(found.username, "alice");
        assert!(repo.find_by_id(AccountId::new(9999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_increment_returns_new_value() {
        let repo = SqliteAccountRepository::new(setup_test_db().await);
        let alice = create_test_account(&repo, "alice").await;

        assert_eq!(repo.increment_failed_attempts(alice.id).await.unwrap(), Some(1));
        assert_eq!(repo.increment_failed_attempts(alice.id).await.unwrap(), Some(2));

        let stored = repo.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(stored.failed_attempts, 2);
    }

    #[tokio::test]
    async fn test_increment_missing_account() {
        let repo = SqliteAccountRepository::new(setup_test_db().await);

        let result = repo.increment_failed_attempts(AccountId::new(42)).await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_reset_and_record_login() {
        let repo = SqliteAccountRepository::new(setup_test_db().await);
        let alice = create_test_account(&repo, "alice").await;
        repo.increment_failed_attempts(alice.id).await.unwrap();

        let now = Utc::now();
        repo.reset_failed_attempts(alice.id).await.unwrap();
        repo.record_successful_login(alice.id, now).await.unwrap();

        let stored = repo.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(stored.failed_attempts, 0);
        assert_eq!(
            stored.last_login.map(|t| t.timestamp_millis()),
            Some(now.timestamp_millis())
        );
    }

    #[tokio::test]
    async fn test_lock_only_affects_one_account() {
        let repo = SqliteAccountRepository::new(setup_test_db().await);
        let alice = create_test_account(&repo, "alice").await;
        let bob = create_test_account(&repo, "bob").await;

        assert!(repo.lock(alice.id).await.unwrap());
        assert!(!repo.lock(alice.id).await.unwrap());

        assert!(repo.find_by_id(alice.id).await.unwrap().unwrap().is_locked);
        assert!(!repo.find_by_id(bob.id).await.unwrap().unwrap().is_locked);
    }

    #[tokio::test]
    async fn test_locked_account_is_not_incremented() {
        let repo = SqliteAccountRepository::new(setup_test_db().await);
        let alice = create_test_account(&repo, "alice").await;
        repo.increment_failed_attempts(alice.id).await.unwrap();
        repo.lock(alice.id).await.unwrap();

        assert_eq!(repo.increment_failed_attempts(alice.id).await.unwrap(), None);

        let stored = repo.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(stored.failed_attempts, 1);
        assert!(stored.is_locked);
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() {
        let _ = tracing_subscriber::fmt().try_init();
        let path = std::env::temp_dir().join(format!(
            "wicket-concurrent-{}-{}.db",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let storage = crate::SqliteStorage::connect(&format!("sqlite://{}", path.display()))
            .await
            .unwrap();
        let pool = storage.pool().clone();
        let manager = SqliteMigrationManager::new(pool.clone());
        manager.initialize().await.unwrap();
        manager.up(&migrations()).await.unwrap();

        let repo = std::sync::Arc::new(SqliteAccountRepository::new(pool.clone()));
        let id = create_test_account(&repo, "alice").await.id;

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.increment_failed_attempts(id).await })
            })
            .collect();

        let mut seen = Vec::new();
        for handle in handles {
            seen.push(handle.await.unwrap().unwrap().unwrap());
        }
        seen.sort_unstable();

        assert_eq!(seen, (1..=10).collect::<Vec<u32>>());
        let stored = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.failed_attempts, 10);

        pool.close().await;
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_locks_flip_the_flag_once() {
        let _ = tracing_subscriber::fmt().try_init();
        let path = std::env::temp_dir().join(format!(
            "wicket-lock-{}-{}.db",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let storage = crate::SqliteStorage::connect(&format!("sqlite://{}", path.display()))
            .await
            .unwrap();
        let pool = storage.pool().clone();
        let manager = SqliteMigrationManager::new(pool.clone());
        manager.initialize().await.unwrap();
        manager.up(&migrations()).await.unwrap();

        let repo = std::sync::Arc::new(SqliteAccountRepository::new(pool.clone()));
        let id = create_test_account(&repo, "alice").await.id;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.lock(id).await })
            })
            .collect();

        let mut flipped = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() {
                flipped += 1;
            }
        }

        assert_eq!(flipped, 1);
        assert!(repo.find_by_id(id).await.unwrap().unwrap().is_locked);

        pool.close().await;
        let _ = std::fs::remove_file(&path);
    }
}
