//! # rpg (character API)
//!
//! `rpg` serves user-owned "character" records behind a small identity and
//! authorization core.
//!
//! ## Credentials
//!
//! Passwords are never stored. Registration derives an HMAC-SHA512 digest keyed
//! with a fresh 128-byte salt from the OS CSPRNG; login recomputes it and compares
//! in constant time.
//!
//! ## Bearer tokens
//!
//! Login issues an HS512 signed token carrying the account id and username.
//! Tokens are stateless: they stop working when they expire or when the signing
//! secret is rotated. There is no revocation list.
//!
//! ## Ownership
//!
//! Every character operation is scoped to the caller. Records that exist but
//! belong to someone else are reported as `404 Not Found`, exactly like records
//! that do not exist, so ids cannot be probed.

pub mod api;
pub mod auth;
pub mod characters;
pub mod cli;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
