use super::types::Credentials;
use crate::{
    api::{
        envelope::ServiceResponse,
        error::{ApiError, INVALID_PAYLOAD},
        AppState,
    },
    auth::AccountId,
};
use axum::{extract::Extension, Json};
use tracing::instrument;

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = Credentials,
    responses (
        (status = 200, description = "Account created, data is the new account id", body = ServiceResponse<i64>),
        (status = 400, description = "Username taken or invalid input", body = ServiceResponse<i64>),
    ),
    tag = "auth"
)]
#[instrument(skip(state, payload))]
pub async fn register(
    Extension(state): Extension<AppState>,
    payload: Option<Json<Credentials>>,
) -> Result<Json<ServiceResponse<AccountId>>, ApiError> {
    let Some(Json(credentials)) = payload else {
        return Err(ApiError::bad_request(INVALID_PAYLOAD));
    };

    let id = state
        .guard
        .register(&credentials.username, &credentials.password)
        .await?;

    Ok(Json(ServiceResponse::ok(id)))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = Credentials,
    responses (
        (status = 200, description = "Credentials accepted, data is a bearer token", body = ServiceResponse<String>),
        (status = 400, description = "Unknown username or wrong password", body = ServiceResponse<String>),
    ),
    tag = "auth"
)]
#[instrument(skip(state, payload))]
pub async fn login(
    Extension(state): Extension<AppState>,
    payload: Option<Json<Credentials>>,
) -> Result<Json<ServiceResponse<String>>, ApiError> {
    let Some(Json(credentials)) = payload else {
        return Err(ApiError::bad_request(INVALID_PAYLOAD));
    };

    let token = state
        .guard
        .login(&credentials.username, &credentials.password)
        .await?;

    Ok(Json(ServiceResponse::ok(token)))
}
