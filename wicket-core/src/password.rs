//! Password hashing and verification
//!
//! New passwords are hashed with Argon2 via `password-auth`, which embeds a random
//! per-hash salt and the algorithm parameters in a PHC string.
//!
//! Accounts carried over from older deployments may still hold bcrypt hashes
//! (`$2a$`, `$2b$` or `$2y$`). Those are verified with the `bcrypt` crate. Both
//! verification routines compare in constant time.

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// Hash a password for storage.
pub fn hash_password(password: &str) -> String {
    password_auth::generate_hash(password)
}

/// Verify a password against a stored hash.
///
/// A hash that cannot be parsed never verifies; the problem is logged so that an
/// operator can repair the row.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    if is_bcrypt_hash(stored_hash) {
        return match bcrypt::verify(password, stored_hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "Stored bcrypt hash could not be verified");
                false
            }
        };
    }

    match password_auth::verify_password(password, stored_hash) {
        Ok(()) => true,
        Err(password_auth::VerifyError::PasswordInvalid) => false,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be parsed");
            false
        }
    }
}

fn is_bcrypt_hash(hash: &str) -> bool {
    BCRYPT_PREFIXES.iter().any(|prefix| hash.starts_with(prefix))
}
