use serde::Serialize;

use crate::domain::WatchStatus;
use crate::models::anime::AnimeEntry;
use crate::models::collection::Collection;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RedirectResponse {
    pub redirect: &'static str,
}

/// Public projection of an anime entry. The owner is never exposed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub genres: Vec<String>,
    pub rating: i32,
    pub status: WatchStatus,
    pub notes: String,
    pub created_date: String,
}

impl From<AnimeEntry> for AnimeDto {
    fn from(entry: AnimeEntry) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            genres: entry.genres,
            rating: entry.rating,
            status: entry.status,
            notes: entry.notes,
            created_date: entry.created_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub anime_ids: Vec<String>,
    pub created_date: String,
}

impl From<Collection> for CollectionDto {
    fn from(collection: Collection) -> Self {
        Self {
            id: collection.id,
            name: collection.name,
            description: collection.description,
            anime_ids: collection.anime_ids,
            created_date: collection.created_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnimeResponse {
    pub anime: AnimeDto,
}

#[derive(Debug, Serialize)]
pub struct AnimeListResponse {
    pub anime: Vec<AnimeDto>,
}

impl From<Vec<AnimeEntry>> for AnimeListResponse {
    fn from(entries: Vec<AnimeEntry>) -> Self {
        Self {
            anime: entries.into_iter().map(AnimeDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CollectionResponse {
    pub collection: CollectionDto,
}

#[derive(Debug, Serialize)]
pub struct CollectionListResponse {
    pub collections: Vec<CollectionDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub username: String,
    pub is_premium: bool,
    pub premium_credits: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub message: String,
    pub premium_credits: i64,
    pub is_premium: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_seconds: u64,
}
