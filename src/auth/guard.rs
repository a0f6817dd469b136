//! Caller identity and ownership scoping.

use super::{
    password::{self, HASH_LEN, SALT_LEN},
    AccountId, AuthError, NewAccount, TokenError, TokenIssuer,
};
use crate::{characters::Character, store::AccountStore, store::StoreError};
use std::sync::Arc;
use tracing::{debug, instrument};

pub const MAX_USERNAME_LEN: usize = 64;

/// Registration, login and bearer-token authentication.
#[derive(Clone)]
pub struct AccessGuard {
    issuer: Arc<TokenIssuer>,
    accounts: Arc<dyn AccountStore>,
}

impl AccessGuard {
    #[must_use]
    pub fn new(issuer: Arc<TokenIssuer>, accounts: Arc<dyn AccountStore>) -> Self {
        Self { issuer, accounts }
    }

    /// Create an account and return its id.
    ///
    /// # Errors
    /// - [`AuthError::InvalidInput`] for an empty or overlong username, or an
    ///   empty password.
    /// - [`AuthError::DuplicateUsername`] if the username is taken, including
    ///   when a concurrent registration wins the insert.
    /// - [`AuthError::Password`] or [`AuthError::Store`] on internal failures.
    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, password: &str) -> Result<AccountId, AuthError> {
        let username = normalize_username(username)?;
        if password.is_empty() {
            return Err(AuthError::InvalidInput("password must not be empty"));
        }

        if self.accounts.username_exists(username).await? {
            return Err(AuthError::DuplicateUsername);
        }

        let digest = password::derive(password)?;
        let account = NewAccount {
            username: username.to_string(),
            digest,
        };

        match self.accounts.insert_account(account).await {
            Ok(id) => {
                debug!(account_id = id, "account registered");
                Ok(id)
            }
            Err(StoreError::Conflict) => Err(AuthError::DuplicateUsername),
            Err(err) => Err(err.into()),
        }
    }

    /// Check credentials and issue a token.
    ///
    /// # Errors
    /// [`AuthError::InvalidCredentials`] for an unknown username or a wrong
    /// password alike.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let Some(account) = self.accounts.find_by_username(username.trim()).await? else {
            // Keep the unknown-user path as expensive as a wrong password.
            std::hint::black_box(password::verify(
                password,
                &[0u8; HASH_LEN],
                &[0u8; SALT_LEN],
            ));
            debug!("login for unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        if !password::verify(password, &account.password_hash, &account.password_salt) {
            debug!(account_id = account.id, "login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(self.issuer.issue(&account)?)
    }

    /// Resolve the caller from a raw `Authorization` header value.
    ///
    /// # Errors
    /// - [`TokenError::Missing`] when no header was sent.
    /// - [`TokenError::Malformed`] when the scheme is not `Bearer` or the
    ///   credential is empty.
    /// - Any error from [`TokenIssuer::validate`], unchanged.
    pub fn authenticate(&self, raw_auth_header: Option<&str>) -> Result<AccountId, TokenError> {
        let header = raw_auth_header.ok_or(TokenError::Missing)?;
        let token = bearer_credential(header)?;
        Ok(self.issuer.validate(token)?.sub)
    }
}

fn normalize_username(username: &str) -> Result<&str, AuthError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AuthError::InvalidInput("username must not be empty"));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AuthError::InvalidInput("username is too long"));
    }
    Ok(username)
}

fn bearer_credential(header: &str) -> Result<&str, TokenError> {
    let (scheme, credential) = header
        .trim()
        .split_once(' ')
        .ok_or(TokenError::Malformed)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(TokenError::Malformed);
    }
    let credential = credential.trim();
    if credential.is_empty() {
        return Err(TokenError::Malformed);
    }
    Ok(credential)
}

/// Ownership filter applied to every character store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerScope {
    owner_id: AccountId,
}

impl OwnerScope {
    #[must_use]
    pub const fn owner_id(self) -> AccountId {
        self.owner_id
    }

    #[must_use]
    pub fn matches(self, character: &Character) -> bool {
        character.owner_id == self.owner_id
    }
}

#[must_use]
pub const fn scope_list(caller_id: AccountId) -> OwnerScope {
    OwnerScope {
        owner_id: caller_id,
    }
}

/// Collapse "absent" and "owned by someone else" into the same outcome.
///
/// # Errors
/// [`AuthError::NotFound`] unless `found` exists and belongs to `caller_id`.
pub fn scope_one(caller_id: AccountId, found: Option<Character>) -> Result<Character, AuthError> {
    found
        .filter(|character| scope_list(caller_id).matches(character))
        .ok_or(AuthError::NotFound)
}
