//! Salted password digests.
//!
//! The digest is `HMAC-SHA512(key = salt, message = password)`. The salt is 128
//! bytes, one full SHA-512 block, so HMAC uses it as the key without hashing it
//! first.

use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha512;
use thiserror::Error;

type HmacSha512 = Hmac<Sha512>;

pub const SALT_LEN: usize = 128;
pub const HASH_LEN: usize = 64;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to gather entropy: {0}")]
    Entropy(#[from] rand::Error),
    #[error("invalid salt length")]
    SaltLength,
}

#[derive(Clone)]
pub struct PasswordDigest {
    pub hash: [u8; HASH_LEN],
    pub salt: [u8; SALT_LEN],
}

/// Derive a digest for `password` using a fresh random salt.
///
/// # Errors
///
/// Returns an error if the OS random source fails.
pub fn derive(password: &str) -> Result<PasswordDigest, PasswordError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.try_fill_bytes(&mut salt)?;

    let mac = keyed(&salt, password).ok_or(PasswordError::SaltLength)?;
    let mut hash = [0u8; HASH_LEN];
    hash.copy_from_slice(&mac.finalize().into_bytes());

    Ok(PasswordDigest { hash, salt })
}

/// Check `password` against a stored digest.
///
/// The comparison runs in constant time over the whole hash.
#[must_use]
pub fn verify(password: &str, hash: &[u8], salt: &[u8]) -> bool {
    if hash.len() != HASH_LEN || salt.len() != SALT_LEN {
        return false;
    }

    keyed(salt, password).is_some_and(|mac| mac.verify_slice(hash).is_ok())
}

fn keyed(salt: &[u8], password: &str) -> Option<HmacSha512> {
    // HMAC accepts keys of any length, so this never returns None in practice.
    let mut mac = HmacSha512::new_from_slice(salt).ok()?;
    mac.update(password.as_bytes());
    Some(mac)
}
