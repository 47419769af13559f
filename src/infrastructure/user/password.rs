//! Credential hashing for registered users
//!
//! Hashes are Argon2id PHC strings; the cost parameters travel inside each
//! stored hash, so verification always uses the cost the hash was made with.

use std::fmt::Debug;

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::domain::DomainError;

/// Well-formed hash that no password matches, with the default cost
///
/// Logins naming an unknown user verify against it so they take as long as
/// a wrong password.
pub const ABSENT_USER_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$\
     +izNKZqs2Ua/QkX5ip9VSg$y+V6ao3QOpheMA7Qf28NNW5UWWIbd3pa0oPBbExgFig";

/// Hashes and checks user passwords
pub trait PasswordHasher: Send + Sync + Debug + 'static {
    /// Hash a password with a fresh random salt
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Check a password against a stored hash; malformed hashes never match
    fn verify(&self, password: &str, hash: &str) -> bool;

    /// Spend a full verification on a login whose username has no record
    fn verify_absent(&self, password: &str) {
        self.verify(password, ABSENT_USER_HASH);
    }
}

/// Argon2id hasher
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Hasher with the default Argon2 cost
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::hashing(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        PasswordHash::new(hash).is_ok_and(|parsed| {
            self.argon2()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
    }
}
