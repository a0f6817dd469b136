use serde::Serialize;
use utoipa::ToSchema;

/// Envelope wrapping every API result.
///
/// Only [`ServiceResponse::ok`] and [`ServiceResponse::fail`] build one, so a
/// failed response never carries data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ServiceResponse<T> {
    data: Option<T>,
    success: bool,
    message: Option<String>,
}

impl<T> ServiceResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            success: true,
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            data: None,
            success: false,
            message: Some(message.into()),
        }
    }

    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub const fn success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
