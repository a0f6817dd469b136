use super::envelope::ServiceResponse;
use crate::auth::{AuthError, TokenError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error};

pub const UNAUTHORIZED: &str = "Unauthorized.";
pub const NOT_FOUND: &str = "Character not found.";
pub const DUPLICATE_USERNAME: &str = "User already exists.";
pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";
pub const INVALID_PAYLOAD: &str = "Missing or invalid payload.";
pub const INTERNAL: &str = "Internal server error.";

/// Failure response: a status code and the envelope message sent with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        debug!("rejected bearer token: {err}");
        Self::new(StatusCode::UNAUTHORIZED, UNAUTHORIZED)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateUsername => Self::bad_request(DUPLICATE_USERNAME),
            AuthError::InvalidCredentials => Self::bad_request(INVALID_CREDENTIALS),
            AuthError::InvalidInput(reason) => Self::bad_request(reason),
            AuthError::Token(err) => err.into(),
            AuthError::NotFound => Self::new(StatusCode::NOT_FOUND, NOT_FOUND),
            err @ (AuthError::Store(_) | AuthError::Password(_) | AuthError::TokenEncoding(_)) => {
                error!("request failed: {err}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ServiceResponse::<()>::fail(self.message))).into_response()
    }
}
