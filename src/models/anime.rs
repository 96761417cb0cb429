use crate::domain::{AccountId, WatchStatus};

/// A tracked anime entry as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimeEntry {
    pub id: String,
    pub owner: AccountId,
    pub title: String,
    pub genres: Vec<String>,
    pub rating: i32,
    pub status: WatchStatus,
    pub notes: String,
    pub created_date: String,
}

/// Raw fields for a new entry, before defaults and sanitization.
#[derive(Debug, Clone, Default)]
pub struct NewAnime {
    pub title: String,
    pub genres: Option<Vec<String>>,
    pub rating: Option<i64>,
    pub status: Option<WatchStatus>,
    pub notes: Option<String>,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct AnimeChanges {
    pub title: Option<String>,
    pub genres: Option<Vec<String>>,
    pub rating: Option<i64>,
    pub status: Option<WatchStatus>,
    pub notes: Option<String>,
}

impl AnimeChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.genres.is_none()
            && self.rating.is_none()
            && self.status.is_none()
            && self.notes.is_none()
    }
}

/// Narrowing applied to an owner's anime list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnimeFilter {
    #[default]
    All,
    Status(WatchStatus),
    /// Case-insensitive substring match on the title or any genre.
    Search(String),
}

impl AnimeEntry {
    /// Whether `needle` (already lowercased) occurs in the title or a genre.
    #[must_use]
    pub fn matches_query(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .genres
                .iter()
                .any(|genre| genre.to_lowercase().contains(needle))
    }
}
