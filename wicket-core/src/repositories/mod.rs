//! Repository traits for the data access layer
//!
//! Services talk to storage only through these traits. A storage backend
//! implements [`AccountRepository`], exposes it through [`AccountRepositoryProvider`]
//! and adds the lifecycle methods of [`RepositoryProvider`].

pub mod account;
pub mod adapter;

pub use account::AccountRepository;
pub use adapter::AccountRepositoryAdapter;

use async_trait::async_trait;

use crate::Error;

/// Provider trait for account repository access.
pub trait AccountRepositoryProvider: Send + Sync + 'static {
    /// The account repository implementation type
    type AccountRepo: AccountRepository;

    /// Get the account repository
    fn account(&self) -> &Self::AccountRepo;
}

/// Provider trait that storage implementations must implement.
///
/// # Example
///
/// ```rust,ignore
/// use wicket_core::repositories::*;
///
/// struct MyStorage { /* ... */ }
///
/// impl AccountRepositoryProvider for MyStorage {
///     type AccountRepo = MyAccountRepository;
///     fn account(&self) -> &Self::AccountRepo { &self.accounts }
/// }
///
/// #[async_trait]
/// impl RepositoryProvider for MyStorage {
///     async fn migrate(&self) -> Result<(), Error> { /* ... */ }
///     async fn health_check(&self) -> Result<(), Error> { /* ... */ }
/// }
/// ```
#[async_trait]
pub trait RepositoryProvider: AccountRepositoryProvider {
    /// Create or upgrade the `users` table
    async fn migrate(&self) -> Result<(), Error>;

    /// Check that the datastore is reachable
    async fn health_check(&self) -> Result<(), Error>;
}
