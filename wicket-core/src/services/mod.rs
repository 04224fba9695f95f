//! Service layer for business logic

pub mod account;
pub mod authenticator;

#[cfg(test)]
pub(crate) mod testing;

pub use account::AccountService;
pub use authenticator::Authenticator;
