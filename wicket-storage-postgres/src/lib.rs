//! PostgreSQL storage backend for wicket.
pub mod migrations;
pub mod repositories;

pub use repositories::{PostgresAccountRepository, PostgresRepositoryProvider};

use sqlx::PgPool;
use wicket_core::{Error, error::StorageError};

/// A connected PostgreSQL database.
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str) -> Result<Self, Error> {
        let pool = PgPool::connect(url).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to Postgres");
            StorageError::Connection("Failed to connect to Postgres".to_string())
        })?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn into_repository_provider(self) -> PostgresRepositoryProvider {
        PostgresRepositoryProvider::new(self.pool)
    }
}
