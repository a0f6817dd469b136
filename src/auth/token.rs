//! HS512 bearer tokens.
//!
//! Token layout is `base64url(header).base64url(claims).base64url(mac)` where
//! `mac = HMAC-SHA512(secret, "header.claims")`. The signature is checked over
//! the raw segments before anything is decoded, so any change to an issued token
//! surfaces as [`TokenError::BadSignature`].

use super::{Account, AccountId, TokenConfigError, TokenError};
use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use std::{
    fmt,
    time::{Duration, SystemTime},
};

type HmacSha512 = Hmac<Sha512>;

pub const ALGORITHM: &str = "HS512";
pub const MIN_SECRET_LEN: usize = 32;
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Signing secret and token lifetime, loaded once at startup.
#[derive(Clone, Debug)]
pub struct TokenConfig {
    secret: SecretString,
    ttl: Duration,
}

impl TokenConfig {
    /// # Errors
    /// Returns an error if the secret is shorter than [`MIN_SECRET_LEN`] bytes or
    /// the ttl is zero.
    pub fn new(secret: SecretString, ttl: Duration) -> Result<Self, TokenConfigError> {
        let actual = secret.expose_secret().len();
        if actual < MIN_SECRET_LEN {
            return Err(TokenConfigError::SecretTooShort {
                min: MIN_SECRET_LEN,
                actual,
            });
        }
        if ttl.is_zero() {
            return Err(TokenConfigError::ZeroTtl);
        }
        Ok(Self { secret, ttl })
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct TokenHeader {
    alg: String,
    typ: String,
}

impl TokenHeader {
    fn hs512() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: AccountId,
    pub unique_name: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and validates tokens. Holds the HMAC state keyed with the secret, so
/// the raw secret is not kept after construction.
#[derive(Clone)]
pub struct TokenIssuer {
    keyed: HmacSha512,
    ttl: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("keyed", &"***")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenIssuer {
    /// # Errors
    /// Returns an error if the secret cannot be used as an HMAC key.
    pub fn new(config: &TokenConfig) -> Result<Self, TokenConfigError> {
        let keyed = HmacSha512::new_from_slice(config.secret.expose_secret().as_bytes())
            .map_err(|_| TokenConfigError::InvalidKey)?;
        Ok(Self {
            keyed,
            ttl: config.ttl,
        })
    }

    /// Issue a token for `account`, valid from now for the configured ttl.
    ///
    /// # Errors
    /// Returns an error if the header or claims cannot be encoded.
    pub fn issue(&self, account: &Account) -> Result<String, serde_json::Error> {
        self.issue_at(account, now_unix_seconds())
    }

    /// Issue a token as if the current time were `now` (unix seconds).
    ///
    /// # Errors
    /// Returns an error if the header or claims cannot be encoded.
    pub fn issue_at(&self, account: &Account, now: i64) -> Result<String, serde_json::Error> {
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: account.id,
            unique_name: account.username.clone(),
            iat: now,
            exp: now.saturating_add(ttl),
        };

        let header_b64 = b64e_json(&TokenHeader::hs512())?;
        let claims_b64 = b64e_json(&claims)?;
        let signing_input = format!("{header_b64}.{claims_b64}");
        let signature = self.mac(&signing_input).finalize().into_bytes();
        let signature_b64 = Base64UrlUnpadded::encode_string(&signature);

        Ok(format!("{signing_input}.{signature_b64}"))
    }

    /// Validate a token against the current time.
    ///
    /// # Errors
    /// See [`TokenIssuer::validate_at`].
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, now_unix_seconds())
    }

    /// Validate a token as if the current time were `now` (unix seconds).
    ///
    /// # Errors
    /// - [`TokenError::Malformed`] if the token does not have three segments, or
    ///   the signed header/claims cannot be decoded, or the algorithm is not HS512.
    /// - [`TokenError::BadSignature`] if the signature does not match.
    /// - [`TokenError::Expired`] if `now` is past `exp`, even with a valid signature.
    pub fn validate_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let mut parts = token.split('.');
        let header_b64 = parts.next().ok_or(TokenError::Malformed)?;
        let claims_b64 = parts.next().ok_or(TokenError::Malformed)?;
        let sig_b64 = parts.next().ok_or(TokenError::Malformed)?;
        if parts.next().is_some()
            || header_b64.is_empty()
            || claims_b64.is_empty()
            || sig_b64.is_empty()
        {
            return Err(TokenError::Malformed);
        }

        // An undecodable signature can never match, so it counts as a bad signature.
        let signature =
            Base64UrlUnpadded::decode_vec(sig_b64).map_err(|_| TokenError::BadSignature)?;
        self.mac(&format!("{header_b64}.{claims_b64}"))
            .verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let header: TokenHeader = b64d_json(header_b64)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::Malformed);
        }

        let claims: Claims = b64d_json(claims_b64)?;
        if now > claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn mac(&self, signing_input: &str) -> HmacSha512 {
        let mut mac = self.keyed.clone();
        mac.update(signing_input.as_bytes());
        mac
    }
}

fn b64e_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(value)?;
    Ok(Base64UrlUnpadded::encode_string(&json))
}

fn b64d_json<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, TokenError> {
    let bytes = Base64UrlUnpadded::decode_vec(s).map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}

pub(crate) fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
