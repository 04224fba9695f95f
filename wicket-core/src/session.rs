//! The identity handed to the caller after a successful login.
//!
//! Wicket does not store sessions. The caller keeps this value in whatever
//! per-user state its web layer provides.
use serde::{Deserialize, Serialize};

use crate::{AccountId, AuthenticatedAccount};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginSession {
    /// `user_<id>`. Not a secret and not meant to be one.
    pub session_id: String,
    pub account_id: AccountId,
    pub username: String,
    pub email: String,
}

impl LoginSession {
    pub fn session_id_for(account_id: AccountId) -> String {
        format!("user_{account_id}")
    }
}

impl From<AuthenticatedAccount> for LoginSession {
    fn from(account: AuthenticatedAccount) -> Self {
        Self {
            session_id: Self::session_id_for(account.id),
            account_id: account.id,
            username: account.username,
            email: account.email,
        }
    }
}
