//! One-way hashing of refresh-credential material before persistence.
//!
//! Defense in depth for data at rest: validity of a presented refresh
//! credential is established by signature verification plus the store
//! lookup, never by re-deriving this hash. A store compromise therefore
//! does not directly yield usable refresh credentials.

use crate::error::TokenError;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::{Argon2, Params, Version};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;

/// Fixed work factor: Argon2id, 19 MiB memory, 2 iterations, 1 lane.
/// Hard enough against offline brute force, cheap enough to stay out of
/// the request latency budget at expected issuance rates.
static ARGON2: Lazy<Argon2<'static>> = Lazy::new(|| {
    let params = Params::new(19 * 1024, 2, 1, None).expect("valid Argon2 params");
    Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params)
});

/// Hashes signed refresh material with a fresh random salt.
///
/// Runs on the blocking pool: the hash is CPU-bound and must not stall
/// the async executor.
pub async fn hash_secret(material: &str) -> Result<String, TokenError> {
    let material = material.to_owned();
    tokio::task::spawn_blocking(move || hash_blocking(&material))
        .await
        .map_err(|e| TokenError::Hashing(e.to_string()))?
}

fn hash_blocking(material: &str) -> Result<String, TokenError> {
    let salt = SaltString::generate(&mut OsRng);
    ARGON2
        .hash_password(material.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| TokenError::Hashing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_is_phc_formatted() {
        let hash = hash_secret("signed-refresh-material").await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_hash_is_salted() {
        let a = hash_secret("same-material").await.unwrap();
        let b = hash_secret("same-material").await.unwrap();
        assert_ne!(a, b);
    }
}
