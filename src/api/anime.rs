use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::extract::JsonBody;
use super::{AnimeListResponse, AnimeResponse, ApiError, AppState, MessageResponse};
use crate::api::validation::{optional_status, require_id, require_status, validate_search_query};
use crate::domain::SessionContext;
use crate::models::anime::{AnimeChanges, AnimeFilter, NewAnime};
use crate::services::AnimeError;

const ID_REQUIRED: &str = "Anime ID is required";

#[derive(Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct AddAnimeRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateAnimeRequest {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteAnimeRequest {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
}

impl From<AnimeError> for ApiError {
    fn from(err: AnimeError) -> Self {
        match err {
            e @ AnimeError::NotFound(_) => ApiError::NotFound(e.to_string()),
            e @ AnimeError::Forbidden { .. } => ApiError::Forbidden(e.to_string()),
            AnimeError::Validation(msg) => ApiError::ValidationError(msg),
            AnimeError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

/// GET /getAnime
pub async fn list_anime(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
) -> Result<Json<AnimeListResponse>, ApiError> {
    let entries = state
        .anime_service()
        .list(&context, AnimeFilter::All)
        .await?;
    Ok(Json(entries.into()))
}

/// GET /getAnimeByStatus?status=
pub async fn list_anime_by_status(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<AnimeListResponse>, ApiError> {
    let status = require_status(query.status.as_deref())?;

    let entries = state
        .anime_service()
        .list(&context, AnimeFilter::Status(status))
        .await?;
    Ok(Json(entries.into()))
}

/// GET /searchAnime?q=
pub async fn search_anime(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<AnimeListResponse>, ApiError> {
    let q = validate_search_query(query.q.as_deref())?;

    let entries = state
        .anime_service()
        .list(&context, AnimeFilter::Search(q.to_string()))
        .await?;
    Ok(Json(entries.into()))
}

/// POST /addAnime
pub async fn add_anime(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    JsonBody(payload): JsonBody<AddAnimeRequest>,
) -> Result<(StatusCode, Json<AnimeResponse>), ApiError> {
    let new = NewAnime {
        title: payload.title.unwrap_or_default(),
        genres: payload.genres,
        rating: payload.rating,
        status: optional_status(payload.status.as_deref())?,
        notes: payload.notes,
    };

    let entry = state.anime_service().create(&context, new).await?;

    Ok((
        StatusCode::CREATED,
        Json(AnimeResponse {
            anime: entry.into(),
        }),
    ))
}

/// POST /updateAnime
pub async fn update_anime(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    JsonBody(payload): JsonBody<UpdateAnimeRequest>,
) -> Result<Json<AnimeResponse>, ApiError> {
    let id = require_id(payload.id.as_deref(), ID_REQUIRED)?;

    let changes = AnimeChanges {
        title: payload.title,
        genres: payload.genres,
        rating: payload.rating,
        status: optional_status(payload.status.as_deref())?,
        notes: payload.notes,
    };

    let entry = state.anime_service().update(&context, &id, changes).await?;

    Ok(Json(AnimeResponse {
        anime: entry.into(),
    }))
}

/// POST /deleteAnime
pub async fn delete_anime(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    JsonBody(payload): JsonBody<DeleteAnimeRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = require_id(payload.id.as_deref(), ID_REQUIRED)?;

    state.anime_service().delete(&context, &id).await?;

    Ok(Json(MessageResponse::new("Anime deleted successfully")))
}
