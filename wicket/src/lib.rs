//! # Wicket
//!
//! Wicket is the login core of a web application: it checks a username and password
//! against a `users` table, counts consecutive failed attempts and locks an account
//! once a threshold is reached.
//!
//! Rendering the login page and navigating after success are left to the caller. On
//! success [`Wicket::login`] hands back a [`LoginSession`] value for the caller to keep
//! in whatever per-user state its web layer provides.
//!
//! ## Storage Support
//!
//! - SQLite (`sqlite` feature, enabled by default)
//! - Postgres (`postgres` feature)
//!
//! ## Example
//!
//! ```rust,no_run
//! use wicket::{LoginMessage, WicketBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let wicket = WicketBuilder::new()
//!         .with_sqlite("sqlite://users.db")
//!         .await?
//!         .apply_migrations(true)
//!         .build()
//!         .await?;
//!
//!     match wicket.login("alice", "secret").await {
//!         Ok(session) => println!("logged in as {}", session.session_id),
//!         Err(e) => println!("{}", LoginMessage::from_error(&e).text),
//!     }
//!
//!     Ok(())
//! }
//! ```
use std::sync::Arc;

use wicket_core::{
    RepositoryProvider,
    repositories::AccountRepositoryAdapter,
    services::{AccountService, Authenticator},
};

pub mod builder;

pub use builder::{NoStorage, WicketBuilder, WicketBuilderError, WithStorage};

/// Re-export core types from wicket_core
pub use wicket_core::{
    Account, AccountId, AttemptCount, AuthenticatedAccount, DEFAULT_LOCK_THRESHOLD, Error,
    LockoutConfig, LoginMessage, LoginSession,
    error::{AuthError, StorageError, ValidationError},
};

/// Re-export storage backends
#[cfg(feature = "sqlite")]
pub use wicket_storage_sqlite::{SqliteRepositoryProvider, SqliteStorage};

#[cfg(feature = "postgres")]
pub use wicket_storage_postgres::{PostgresRepositoryProvider, PostgresStorage};

/// The login coordinator.
///
/// `Wicket` wires the [`Authenticator`] and the [`AccountService`] to a single
/// repository provider. It is cheap to share behind an `Arc` and holds no per-request
/// state.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use wicket::{SqliteStorage, Wicket};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let storage = SqliteStorage::connect("sqlite::memory:").await?;
///     let wicket = Wicket::new(Arc::new(storage.into_repository_provider()));
///     wicket.migrate().await?;
///
///     wicket.register_account("alice", "alice@example.com", "correct horse").await?;
///     let account = wicket.authenticate("alice", "correct horse").await?;
///     println!("{}", account.email);
///
///     Ok(())
/// }
/// ```
pub struct Wicket<R: RepositoryProvider> {
    repositories: Arc<R>,
    authenticator: Arc<Authenticator<AccountRepositoryAdapter<R>>>,
    account_service: Arc<AccountService<AccountRepositoryAdapter<R>>>,
    lockout_config: LockoutConfig,
}

impl<R: RepositoryProvider> Wicket<R> {
    /// Create a new instance with the default lockout configuration.
    pub fn new(repositories: Arc<R>) -> Self {
        Self::with_lockout(repositories, LockoutConfig::default())
    }

    /// Create a new instance with an explicit lockout configuration.
    pub fn with_lockout(repositories: Arc<R>, lockout_config: LockoutConfig) -> Self {
        let account_repo = Arc::new(AccountRepositoryAdapter::new(repositories.clone()));

        Self {
            repositories,
            authenticator: Arc::new(Authenticator::new(account_repo.clone(), lockout_config)),
            account_service: Arc::new(AccountService::new(account_repo)),
            lockout_config,
        }
    }

    pub fn lockout_config(&self) -> &LockoutConfig {
        &self.lockout_config
    }

    /// Run migrations for all repositories
    pub async fn migrate(&self) -> Result<(), Error> {
        self.repositories.migrate().await
    }

    /// Health check for all repositories
    pub async fn health_check(&self) -> Result<(), Error> {
        self.repositories.health_check().await
    }

    /// Register a new account
    ///
    /// # Returns
    ///
    /// The stored account, or [`AuthError::UsernameTaken`] if the trimmed username is
    /// already registered.
    pub async fn register_account(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, Error> {
        self.account_service.register(username, email, password).await
    }

    /// Verify a username and password with the configured lock threshold.
    ///
    /// Unknown usernames and wrong passwords both fail with
    /// [`AuthError::InvalidCredentials`]. Datastore failures surface as
    /// [`Error::Storage`] and never as a credential error.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedAccount, Error> {
        self.authenticator.authenticate(username, password).await
    }

    /// Verify a username and password with a lock threshold chosen for this call.
    pub async fn authenticate_with_threshold(
        &self,
        username: &str,
        password: &str,
        lock_threshold: u32,
    ) -> Result<AuthenticatedAccount, Error> {
        self.authenticator
            .authenticate_with_threshold(username, password, lock_threshold)
            .await
    }

    /// Authenticate and build the session value for the logged in account.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginSession, Error> {
        let account = self.authenticate(username, password).await?;
        Ok(LoginSession::from(account))
    }

    /// Get an account by its ID
    pub async fn get_account(&self, id: AccountId) -> Result<Option<Account>, Error> {
        self.account_service.get_account(id).await
    }

    /// Get an account by its username
    pub async fn get_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, Error> {
        self.account_service.get_account_by_username(username).await
    }
}
