use super::password::PasswordError;
use crate::store::StoreError;
use thiserror::Error;

/// Reasons a bearer token was rejected.
///
/// The variants are kept apart for logging only; the HTTP layer answers all of
/// them with the same `401` body.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("missing bearer token")]
    Missing,
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenConfigError {
    #[error("token secret must be at least {min} bytes, got {actual}")]
    SecretTooShort { min: usize, actual: usize },
    #[error("token ttl must be greater than zero")]
    ZeroTtl,
    #[error("token secret is not a usable HMAC key")]
    InvalidKey,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username already exists")]
    DuplicateUsername,
    /// Unknown username or wrong password. Never split for clients.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error(transparent)]
    Token(#[from] TokenError),
    /// Absent, or owned by someone else.
    #[error("not found")]
    NotFound,
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("password digest failed: {0}")]
    Password(#[from] PasswordError),
    #[error("failed to encode token: {0}")]
    TokenEncoding(#[from] serde_json::Error),
}
