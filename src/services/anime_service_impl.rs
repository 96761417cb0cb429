//! `SeaORM` implementation of the `AnimeService` trait.

use crate::db::Store;
use crate::domain::sanitize::{escape_text, non_empty_label, sanitize_genres};
use crate::domain::{AccountId, Access, SessionContext, clamp_rating};
use crate::models::anime::{AnimeChanges, AnimeEntry, AnimeFilter, NewAnime};
use crate::services::anime_service::{AnimeError, AnimeService};
use crate::services::check_owner;
use async_trait::async_trait;
use tracing::{debug, info};

pub struct SeaOrmAnimeService {
    store: Store,
}

impl SeaOrmAnimeService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Loads an entry and checks that `session` owns it.
    async fn owned_entry(
        &self,
        session: &SessionContext,
        id: &str,
        action: &'static str,
    ) -> Result<AnimeEntry, AnimeError> {
        let entry = self
            .store
            .get_anime(id)
            .await?
            .ok_or_else(|| AnimeError::NotFound(id.to_string()))?;

        match check_owner(session.account_id, entry.owner, "anime", id) {
            Access::Allow => Ok(entry),
            Access::Forbid => Err(AnimeError::Forbidden { action }),
        }
    }
}

fn title_required() -> AnimeError {
    AnimeError::Validation("Title is required".to_string())
}

/// Builds a sanitized entry with defaults filled in.
pub(crate) fn build_entry(owner: AccountId, new: NewAnime) -> Result<AnimeEntry, AnimeError> {
    let title = non_empty_label(&new.title).ok_or_else(title_required)?;

    Ok(AnimeEntry {
        id: uuid::Uuid::new_v4().to_string(),
        owner,
        title,
        genres: sanitize_genres(new.genres.unwrap_or_default()),
        rating: clamp_rating(new.rating.unwrap_or(0)),
        status: new.status.unwrap_or_default(),
        notes: new.notes.as_deref().map(escape_text).unwrap_or_default(),
        created_date: chrono::Utc::now().to_rfc3339(),
    })
}

/// Applies the present fields of `changes` in place.
pub(crate) fn apply_changes(entry: &mut AnimeEntry, changes: AnimeChanges) -> Result<(), AnimeError> {
    if let Some(title) = changes.title {
        entry.title = non_empty_label(&title).ok_or_else(title_required)?;
    }
    if let Some(genres) = changes.genres {
        entry.genres = sanitize_genres(genres);
    }
    if let Some(rating) = changes.rating {
        entry.rating = clamp_rating(rating);
    }
    if let Some(status) = changes.status {
        entry.status = status;
    }
    if let Some(notes) = changes.notes {
        entry.notes = escape_text(&notes);
    }
    Ok(())
}

#[async_trait]
impl AnimeService for SeaOrmAnimeService {
    async fn list(
        &self,
        session: &SessionContext,
        filter: AnimeFilter,
    ) -> Result<Vec<AnimeEntry>, AnimeError> {
        let owner = session.account_id;

        match filter {
            AnimeFilter::All => Ok(self.store.list_anime_for_owner(owner, None).await?),
            AnimeFilter::Status(status) => {
                Ok(self.store.list_anime_for_owner(owner, Some(status)).await?)
            }
            AnimeFilter::Search(query) => {
                // Stored text is escaped, so the needle has to be as well.
                let needle = escape_text(query.trim()).to_lowercase();
                if needle.is_empty() {
                    return Err(AnimeError::Validation("Search query is required".to_string()));
                }

                let entries = self.store.list_anime_for_owner(owner, None).await?;
                debug!(account_id = %owner, "Searching {} entries", entries.len());
                Ok(entries
                    .into_iter()
                    .filter(|entry| entry.matches_query(&needle))
                    .collect())
            }
        }
    }

    async fn create(
        &self,
        session: &SessionContext,
        new: NewAnime,
    ) -> Result<AnimeEntry, AnimeError> {
        let entry = build_entry(session.account_id, new)?;
        self.store.add_anime(&entry).await?;
        Ok(entry)
    }

    async fn update(
        &self,
        session: &SessionContext,
        id: &str,
        changes: AnimeChanges,
    ) -> Result<AnimeEntry, AnimeError> {
        let mut entry = self.owned_entry(session, id, "update").await?;

        if changes.is_empty() {
            return Ok(entry);
        }

        apply_changes(&mut entry, changes)?;
        self.store.update_anime(&entry).await?;

        debug!(account_id = %session.account_id, "Updated anime {}", entry.id);
        Ok(entry)
    }

    async fn delete(&self, session: &SessionContext, id: &str) -> Result<(), AnimeError> {
        let entry = self.owned_entry(session, id, "delete").await?;

        if !self.store.remove_anime(&entry.id, entry.owner).await? {
            return Err(AnimeError::NotFound(id.to_string()));
        }

        info!(account_id = %session.account_id, "Deleted anime: {}", entry.title);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WatchStatus;

    #[test]
    fn build_entry_fills_defaults() {
        let entry = build_entry(
            AccountId::new(3),
            NewAnime {
                title: "  Naruto ".into(),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(entry.title, "Naruto");
        assert_eq!(entry.owner, AccountId::new(3));
        assert_eq!(entry.status, WatchStatus::Plan);
        assert_eq!(entry.rating, 0);
        assert!(entry.genres.is_empty());
        assert!(entry.notes.is_empty());
        assert!(chrono::DateTime::parse_from_rfc3339(&entry.created_date).is_ok());
    }

    #[test]
    fn build_entry_sanitizes_and_clamps() {
        let entry = build_entry(
            AccountId::new(1),
            NewAnime {
                title: "<b>Bebop</b>".into(),
                genres: Some(vec![" Sci-Fi ".into(), "  ".into()]),
                rating: Some(42),
                status: Some(WatchStatus::Watching),
                notes: Some("Tom & Jerry".into()),
            },
        )
        .unwrap();

        assert_eq!(entry.title, "&lt;b&gt;Bebop&lt;/b&gt;");
        assert_eq!(entry.genres, vec!["Sci-Fi".to_string()]);
        assert_eq!(entry.rating, 10);
        assert_eq!(entry.notes, "Tom &amp; Jerry");
    }

    #[test]
    fn build_entry_rejects_blank_title() {
        let result = build_entry(
            AccountId::new(1),
            NewAnime {
                title: "   ".into(),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(AnimeError::Validation(_))));
    }

    #[test]
    fn apply_changes_touches_only_present_fields() {
        let mut entry = build_entry(
            AccountId::new(1),
            NewAnime {
                title: "Naruto".into(),
                genres: Some(vec!["Action".into()]),
                ..Default::default()
            },
        )
        .unwrap();
        let before = entry.clone();

        apply_changes(
            &mut entry,
            AnimeChanges {
                rating: Some(-4),
                status: Some(WatchStatus::Completed),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(entry.rating, 0);
        assert_eq!(entry.status, WatchStatus::Completed);
        assert_eq!(entry.title, before.title);
        assert_eq!(entry.genres, before.genres);
        assert_eq!(entry.created_date, before.created_date);
    }

    #[test]
    fn apply_changes_rejects_blank_title() {
        let mut entry = build_entry(
            AccountId::new(1),
            NewAnime {
                title: "Naruto".into(),
                ..Default::default()
            },
        )
        .unwrap();

        let result = apply_changes(
            &mut entry,
            AnimeChanges {
                title: Some(String::new()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(AnimeError::Validation(_))));
        assert_eq!(entry.title, "Naruto");
    }
}
