use super::{require_auth, types::UpdateCharacter};
use crate::{
    api::{
        envelope::ServiceResponse,
        error::{ApiError, INVALID_PAYLOAD},
        AppState,
    },
    characters::{Character, CharacterDraft},
};
use axum::{
    extract::{Extension, Path},
    http::HeaderMap,
    Json,
};
use tracing::instrument;

type CharacterResponse = Result<Json<ServiceResponse<Character>>, ApiError>;
type CharacterListResponse = Result<Json<ServiceResponse<Vec<Character>>>, ApiError>;

#[utoipa::path(
    get,
    path = "/character/GetAll",
    responses (
        (status = 200, description = "Characters owned by the caller", body = ServiceResponse<Vec<Character>>),
        (status = 401, description = "Missing or invalid bearer token", body = ServiceResponse<Vec<Character>>),
    ),
    security(("bearer" = [])),
    tag = "character"
)]
#[instrument(skip_all)]
pub async fn get_all(
    headers: HeaderMap,
    Extension(state): Extension<AppState>,
) -> CharacterListResponse {
    let caller = require_auth(&headers, &state)?;
    let characters = state.characters.get_all(caller).await?;
    Ok(Json(ServiceResponse::ok(characters)))
}

#[utoipa::path(
    get,
    path = "/character/{id}",
    params(("id" = i64, Path, description = "Character id")),
    responses (
        (status = 200, description = "The character", body = ServiceResponse<Character>),
        (status = 401, description = "Missing or invalid bearer token", body = ServiceResponse<Character>),
        (status = 404, description = "No such character for this caller", body = ServiceResponse<Character>),
    ),
    security(("bearer" = [])),
    tag = "character"
)]
#[instrument(skip_all, fields(character_id = id))]
pub async fn get_single(
    headers: HeaderMap,
    Extension(state): Extension<AppState>,
    Path(id): Path<i64>,
) -> CharacterResponse {
    let caller = require_auth(&headers, &state)?;
    let character = state.characters.get_by_id(caller, id).await?;
    Ok(Json(ServiceResponse::ok(character)))
}

#[utoipa::path(
    post,
    path = "/character",
    request_body = CharacterDraft,
    responses (
        (status = 200, description = "Created; data is the caller's full list", body = ServiceResponse<Vec<Character>>),
        (status = 400, description = "Invalid payload", body = ServiceResponse<Vec<Character>>),
        (status = 401, description = "Missing or invalid bearer token", body = ServiceResponse<Vec<Character>>),
    ),
    security(("bearer" = [])),
    tag = "character"
)]
#[instrument(skip_all)]
pub async fn add(
    headers: HeaderMap,
    Extension(state): Extension<AppState>,
    payload: Option<Json<CharacterDraft>>,
) -> CharacterListResponse {
    let caller = require_auth(&headers, &state)?;
    let Some(Json(draft)) = payload else {
        return Err(ApiError::bad_request(INVALID_PAYLOAD));
    };

    let characters = state.characters.add(caller, draft).await?;
    Ok(Json(ServiceResponse::ok(characters)))
}

#[utoipa::path(
    put,
    path = "/character",
    request_body = UpdateCharacter,
    responses (
        (status = 200, description = "The updated character", body = ServiceResponse<Character>),
        (status = 400, description = "Invalid payload", body = ServiceResponse<Character>),
        (status = 401, description = "Missing or invalid bearer token", body = ServiceResponse<Character>),
        (status = 404, description = "No such character for this caller", body = ServiceResponse<Character>),
    ),
    security(("bearer" = [])),
    tag = "character"
)]
#[instrument(skip_all)]
pub async fn update(
    headers: HeaderMap,
    Extension(state): Extension<AppState>,
    payload: Option<Json<UpdateCharacter>>,
) -> CharacterResponse {
    let caller = require_auth(&headers, &state)?;
    let Some(Json(UpdateCharacter { id, draft })) = payload else {
        return Err(ApiError::bad_request(INVALID_PAYLOAD));
    };

    let character = state.characters.update(caller, id, draft).await?;
    Ok(Json(ServiceResponse::ok(character)))
}

#[utoipa::path(
    delete,
    path = "/character/{id}",
    params(("id" = i64, Path, description = "Character id")),
    responses (
        (status = 200, description = "Deleted; data is the caller's remaining list", body = ServiceResponse<Vec<Character>>),
        (status = 401, description = "Missing or invalid bearer token", body = ServiceResponse<Vec<Character>>),
        (status = 404, description = "No such character for this caller", body = ServiceResponse<Vec<Character>>),
    ),
    security(("bearer" = [])),
    tag = "character"
)]
#[instrument(skip_all, fields(character_id = id))]
pub async fn delete(
    headers: HeaderMap,
    Extension(state): Extension<AppState>,
    Path(id): Path<i64>,
) -> CharacterListResponse {
    let caller = require_auth(&headers, &state)?;
    let characters = state.characters.delete(caller, id).await?;
    Ok(Json(ServiceResponse::ok(characters)))
}
