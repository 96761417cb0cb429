use axum::{
    Extension, Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::extract::JsonBody;
use super::{
    ApiError, AppState, CollectionDto, CollectionListResponse, CollectionResponse,
    MessageResponse,
};
use crate::api::validation::require_id;
use crate::domain::SessionContext;
use crate::models::collection::{CollectionChanges, NewCollection};
use crate::services::CollectionError;
use crate::services::collection_service_impl::check_collection_access;

const ID_REQUIRED: &str = "Collection ID is required";
const MEMBER_IDS_REQUIRED: &str = "Collection ID and Anime ID are required";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub anime_ids: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollectionRequest {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub anime_ids: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct DeleteCollectionRequest {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRequest {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub anime_id: Option<String>,
}

impl From<CollectionError> for ApiError {
    fn from(err: CollectionError) -> Self {
        match err {
            e @ (CollectionError::NotFound(_) | CollectionError::AnimeNotFound(_)) => {
                ApiError::NotFound(e.to_string())
            }
            e @ (CollectionError::Forbidden { .. } | CollectionError::PremiumRequired) => {
                ApiError::Forbidden(e.to_string())
            }
            CollectionError::Validation(msg) => ApiError::ValidationError(msg),
            CollectionError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

fn collection_response(collection: crate::models::collection::Collection) -> CollectionResponse {
    CollectionResponse {
        collection: CollectionDto::from(collection),
    }
}

/// Both membership ids must be present.
fn membership_ids(payload: &MembershipRequest) -> Result<(String, String), ApiError> {
    let collection_id = require_id(payload.id.as_deref(), MEMBER_IDS_REQUIRED)?;
    let anime_id = require_id(payload.anime_id.as_deref(), MEMBER_IDS_REQUIRED)?;
    Ok((collection_id, anime_id))
}

/// GET /getCollections
pub async fn list_collections(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
) -> Result<Json<CollectionListResponse>, ApiError> {
    let collections = state.collection_service().list(&context).await?;

    Ok(Json(CollectionListResponse {
        collections: collections.into_iter().map(CollectionDto::from).collect(),
    }))
}

/// Refuses free accounts before the request body is read, so the answer is
/// 403 whatever the payload looks like. Runs inside `require_login`.
pub async fn require_premium(
    Extension(context): Extension<SessionContext>,
    request: Request,
    next: Next,
) -> Response {
    match check_collection_access(&context) {
        Ok(()) => next.run(request).await,
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// POST /createCollection
pub async fn create_collection(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    JsonBody(payload): JsonBody<CreateCollectionRequest>,
) -> Result<(StatusCode, Json<CollectionResponse>), ApiError> {
    let new = NewCollection {
        name: payload.name.unwrap_or_default(),
        description: payload.description,
        anime_ids: payload.anime_ids,
    };

    let collection = state.collection_service().create(&context, new).await?;
    tracing::info!(account_id = %context.account_id, "Collection created: {}", collection.name);

    Ok((StatusCode::CREATED, Json(collection_response(collection))))
}

/// POST /updateCollection
pub async fn update_collection(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    JsonBody(payload): JsonBody<UpdateCollectionRequest>,
) -> Result<Json<CollectionResponse>, ApiError> {
    let id = require_id(payload.id.as_deref(), ID_REQUIRED)?;

    let changes = CollectionChanges {
        name: payload.name,
        description: payload.description,
        anime_ids: payload.anime_ids,
    };

    let collection = state
        .collection_service()
        .update(&context, &id, changes)
        .await?;

    Ok(Json(collection_response(collection)))
}

/// POST /deleteCollection
pub async fn delete_collection(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    JsonBody(payload): JsonBody<DeleteCollectionRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = require_id(payload.id.as_deref(), ID_REQUIRED)?;

    state.collection_service().delete(&context, &id).await?;

    Ok(Json(MessageResponse::new("Collection deleted successfully")))
}

/// POST /addAnimeToCollection
pub async fn add_anime_to_collection(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    JsonBody(payload): JsonBody<MembershipRequest>,
) -> Result<Json<CollectionResponse>, ApiError> {
    let (collection_id, anime_id) = membership_ids(&payload)?;

    let collection = state
        .collection_service()
        .add_member(&context, &collection_id, &anime_id)
        .await?;

    Ok(Json(collection_response(collection)))
}

/// POST /removeAnimeFromCollection
pub async fn remove_anime_from_collection(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    JsonBody(payload): JsonBody<MembershipRequest>,
) -> Result<Json<CollectionResponse>, ApiError> {
    let (collection_id, anime_id) = membership_ids(&payload)?;

    let collection = state
        .collection_service()
        .remove_member(&context, &collection_id, &anime_id)
        .await?;

    Ok(Json(collection_response(collection)))
}
