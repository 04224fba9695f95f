//! Repository implementations for PostgreSQL storage

pub mod account;

pub use account::PostgresAccountRepository;

use async_trait::async_trait;
use sqlx::PgPool;
use wicket_core::{
    Error,
    error::StorageError,
    repositories::{AccountRepositoryProvider, RepositoryProvider},
};

/// Repository provider implementation for PostgreSQL
pub struct PostgresRepositoryProvider {
    pool: PgPool,
    account: PostgresAccountRepository,
}

impl PostgresRepositoryProvider {
    pub fn new(pool: PgPool) -> Self {
        let account = PostgresAccountRepository::new(pool.clone());
        Self { pool, account }
    }
}

impl AccountRepositoryProvider for PostgresRepositoryProvider {
    type AccountRepo = PostgresAccountRepository;

    fn account(&self) -> &Self::AccountRepo {
        &self.account
    }
}

#[async_trait]
impl RepositoryProvider for PostgresRepositoryProvider {
    async fn migrate(&self) -> Result<(), Error> {
        use crate::migrations::{PostgresMigrationManager, migrations};
        use wicket_migration::MigrationManager;

        let manager = PostgresMigrationManager::new(self.pool.clone());
        manager.initialize().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to initialize migrations");
            Error::Storage(StorageError::Migration(
                "Failed to initialize migrations".to_string(),
            ))
        })?;

        manager.up(&migrations()).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
            Error::Storage(StorageError::Migration(
                "Failed to run migrations".to_string(),
            ))
        })?;

        Ok(())
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Postgres health check failed");
                Error::Storage(StorageError::Connection(
                    "Postgres health check failed".to_string(),
                ))
            })?;
        Ok(())
    }
}
