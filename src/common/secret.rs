//! Secret hashing
//!
//! The store treats a patient's secret as opaque text. Hashing happens in the
//! request path before the store is reached, behind [`SecretHasher`].

use crate::common::{Error, Result};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// Turns a caller-supplied secret into the value kept in the store.
pub trait SecretHasher: Send + Sync {
    fn hash(&self, secret: &str) -> Result<String>;
}

/// Argon2id with a random salt, encoded as a PHC string.
#[derive(Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a plaintext secret against a stored PHC hash.
    pub fn verify(&self, secret: &str, stored: &str) -> bool {
        PasswordHash::new(stored)
            .map(|parsed| {
                self.argon2
                    .verify_password(secret.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

impl SecretHasher for Argon2Hasher {
    fn hash(&self, secret: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| Error::Hash(e.to_string()))
    }
}
