pub mod auth;
pub mod character;
pub mod health;
pub mod types;

use super::{error::ApiError, AppState};
use crate::auth::{AccountId, TokenError};
use axum::http::{header::AUTHORIZATION, HeaderMap};

/// Resolve the caller from the `Authorization` header or fail with 401.
pub(crate) fn require_auth(headers: &HeaderMap, state: &AppState) -> Result<AccountId, ApiError> {
    let raw = headers
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| TokenError::Malformed))
        .transpose()?;
    Ok(state.guard.authenticate(raw)?)
}
