//! Password hashing service.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::handler::{ErrorKind, Result};

/// Argon2 password hasher with the library's recommended defaults.
///
/// Constructed once at process start and shared through the service state.
#[derive(Clone, Default)]
pub struct AuthHasher {
    argon2: Argon2<'static>,
}

impl AuthHasher {
    /// Creates a hasher with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                ErrorKind::InternalServerError
                    .with_message("Failed to hash password")
                    .with_context(e.to_string())
            })?;
        Ok(hash.to_string())
    }

    /// Verifies a password against a stored hash.
    ///
    /// Returns `false` both for mismatches and for hashes that fail to
    /// parse.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            return false;
        };
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

impl std::fmt::Debug for AuthHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHasher").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_original_password() {
        let hasher = AuthHasher::new();
        let hash = hasher.hash("Passw0rd").expect("hash");

        assert!(hasher.verify("Passw0rd", &hash));
        assert!(!hasher.verify("wrong", &hash));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        let hasher = AuthHasher::new();
        assert!(!hasher.verify("Passw0rd", "not-a-hash"));
    }
}
