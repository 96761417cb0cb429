use crate::domain::{AccountId, WatchStatus};
use crate::entities::{anime_entries, collections, prelude::*};
use crate::models::anime::AnimeEntry;
use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info};

pub struct AnimeRepository {
    conn: DatabaseConnection,
}

impl AnimeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: anime_entries::Model) -> AnimeEntry {
        AnimeEntry {
            id: model.id,
            owner: AccountId::new(model.owner_id),
            title: model.title,
            genres: serde_json::from_str(&model.genres).unwrap_or_default(),
            rating: model.rating,
            status: model.status.parse().unwrap_or_default(),
            notes: model.notes,
            created_date: model.created_at,
        }
    }

    fn encode_genres(genres: &[String]) -> anyhow::Result<String> {
        serde_json::to_string(genres).context("Failed to encode genres")
    }

    pub async fn insert(&self, entry: &AnimeEntry) -> anyhow::Result<()> {
        let active = anime_entries::ActiveModel {
            id: Set(entry.id.clone()),
            owner_id: Set(entry.owner.value()),
            title: Set(entry.title.clone()),
            genres: Set(Self::encode_genres(&entry.genres)?),
            rating: Set(entry.rating),
            status: Set(entry.status.as_str().to_string()),
            notes: Set(entry.notes.clone()),
            created_at: Set(entry.created_date.clone()),
        };

        AnimeEntries::insert(active)
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to insert anime entry")?;

        info!(owner = %entry.owner, "Added anime: {}", entry.title);
        Ok(())
    }

    pub async fn get(&self, id: &str) -> anyhow::Result<Option<AnimeEntry>> {
        let model = AnimeEntries::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query anime entry")?;

        Ok(model.map(Self::map_model))
    }

    /// All entries of one owner, oldest first, optionally narrowed by status.
    pub async fn list_for_owner(
        &self,
        owner: AccountId,
        status: Option<WatchStatus>,
    ) -> anyhow::Result<Vec<AnimeEntry>> {
        let mut query = AnimeEntries::find().filter(anime_entries::Column::OwnerId.eq(owner.value()));

        if let Some(status) = status {
            query = query.filter(anime_entries::Column::Status.eq(status.as_str()));
        }

        let rows = query
            .order_by_asc(anime_entries::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list anime entries")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Which of `ids` exist and belong to `owner`.
    pub async fn ids_owned_by(
        &self,
        owner: AccountId,
        ids: &[String],
    ) -> anyhow::Result<Vec<String>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = AnimeEntries::find()
            .filter(anime_entries::Column::OwnerId.eq(owner.value()))
            .filter(anime_entries::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.conn)
            .await
            .context("Failed to look up anime ownership")?;

        Ok(rows.into_iter().map(|row| row.id).collect())
    }

    /// Writes every mutable field of `entry`. Owner and creation date are
    /// never touched.
    pub async fn update(&self, entry: &AnimeEntry) -> anyhow::Result<()> {
        let active = anime_entries::ActiveModel {
            id: Set(entry.id.clone()),
            title: Set(entry.title.clone()),
            genres: Set(Self::encode_genres(&entry.genres)?),
            rating: Set(entry.rating),
            status: Set(entry.status.as_str().to_string()),
            notes: Set(entry.notes.clone()),
            ..Default::default()
        };

        active
            .update(&self.conn)
            .await
            .context("Failed to update anime entry")?;
        Ok(())
    }

    /// Deletes the entry and strips its id from the owner's collections in
    /// one transaction. Returns false when nothing was deleted.
    pub async fn delete(&self, id: &str, owner: AccountId) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await?;

        let result = AnimeEntries::delete_by_id(id.to_string())
            .exec(&txn)
            .await
            .context("Failed to delete anime entry")?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        let owned = Collections::find()
            .filter(collections::Column::OwnerId.eq(owner.value()))
            .all(&txn)
            .await
            .context("Failed to load collections for cleanup")?;

        for collection in owned {
            let ids: Vec<String> = serde_json::from_str(&collection.anime_ids).unwrap_or_default();
            if !ids.iter().any(|member| member == id) {
                continue;
            }

            let remaining: Vec<String> = ids.into_iter().filter(|member| member != id).collect();
            debug!(collection = %collection.id, "Removing deleted anime {id} from collection");

            let mut active: collections::ActiveModel = collection.into();
            active.anime_ids = Set(serde_json::to_string(&remaining)?);
            active.update(&txn).await?;
        }

        txn.commit().await?;
        Ok(true)
    }
}
