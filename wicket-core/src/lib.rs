//! Core functionality for wicket
//!
//! This crate contains the account model, the error taxonomy and the repository traits
//! that storage backends implement, along with the services built on top of them.
//!
//! The centerpiece is the [`Authenticator`], which verifies a username/password pair,
//! counts consecutive failed attempts and locks an account once the configured
//! threshold is reached. It is the only writer of an account's security counters.
//!
//! This crate has no database driver of its own; see `wicket-storage-sqlite` and
//! `wicket-storage-postgres` for [`RepositoryProvider`] implementations.
pub mod account;
pub mod error;
pub mod lockout;
pub mod message;
pub mod password;
pub mod repositories;
pub mod services;
pub mod session;
pub mod validation;

pub use account::{Account, AccountId, AuthenticatedAccount, NewAccount};
pub use error::Error;
pub use lockout::{AttemptCount, DEFAULT_LOCK_THRESHOLD, LockoutConfig};
pub use message::LoginMessage;
pub use repositories::{AccountRepository, AccountRepositoryProvider, RepositoryProvider};
pub use services::{AccountService, Authenticator};
pub use session::LoginSession;
