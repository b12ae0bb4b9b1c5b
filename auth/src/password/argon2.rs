use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Well-formed hash that no password is expected to match. Same parameters as
/// `Argon2::default()`, so checking it costs as much as a real verification.
const ABSENT_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ByzZ/E0KX5ZpDJKxATfHSA$kSAUpgVXy1QLUjYrNYlEZrf+9EKUEzKF/t/59EPgpl8";

/// Password hashing implementation.
///
/// Argon2id with a fresh random salt per hash. Stored hashes use the PHC
/// string format, so parameters travel with the hash.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password.
    ///
    /// Empty input is hashed like any other; callers enforce password policy.
    ///
    /// # Errors
    /// * `HashingFailed` - salt generation or the Argon2 computation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored PHC hash.
    ///
    /// Returns `false` for a wrong password and for a stored hash that cannot
    /// be parsed; the two cases are not distinguishable by the caller.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            tracing::warn!("Stored password hash is not a valid PHC string");
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Spend one verification's worth of work when there is no stored hash.
    pub fn verify_absent(&self, password: &str) {
        let _ = self.verify(password, ABSENT_HASH);
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
