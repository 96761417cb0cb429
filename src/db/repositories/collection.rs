use crate::domain::AccountId;
use crate::entities::{collections, prelude::*};
use crate::models::collection::Collection;
use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

pub struct CollectionRepository {
    conn: DatabaseConnection,
}

impl CollectionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: collections::Model) -> Collection {
        Collection {
            id: model.id,
            owner: AccountId::new(model.owner_id),
            name: model.name,
            description: model.description,
            anime_ids: serde_json::from_str(&model.anime_ids).unwrap_or_default(),
            created_date: model.created_at,
        }
    }

    fn encode_ids(ids: &[String]) -> anyhow::Result<String> {
        serde_json::to_string(ids).context("Failed to encode anime ids")
    }

    pub async fn insert(&self, collection: &Collection) -> anyhow::Result<()> {
        let active = collections::ActiveModel {
            id: Set(collection.id.clone()),
            owner_id: Set(collection.owner.value()),
            name: Set(collection.name.clone()),
            description: Set(collection.description.clone()),
            anime_ids: Set(Self::encode_ids(&collection.anime_ids)?),
            created_at: Set(collection.created_date.clone()),
        };

        Collections::insert(active)
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to insert collection")?;

        info!(owner = %collection.owner, "Created collection: {}", collection.name);
        Ok(())
    }

    pub async fn get(&self, id: &str) -> anyhow::Result<Option<Collection>> {
        let model = Collections::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query collection")?;

        Ok(model.map(Self::map_model))
    }

    pub async fn list_for_owner(&self, owner: AccountId) -> anyhow::Result<Vec<Collection>> {
        let rows = Collections::find()
            .filter(collections::Column::OwnerId.eq(owner.value()))
            .order_by_asc(collections::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list collections")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Writes name, description and members. Owner and creation date are
    /// never touched.
    pub async fn update(&self, collection: &Collection) -> anyhow::Result<()> {
        let active = collections::ActiveModel {
            id: Set(collection.id.clone()),
            name: Set(collection.name.clone()),
            description: Set(collection.description.clone()),
            anime_ids: Set(Self::encode_ids(&collection.anime_ids)?),
            ..Default::default()
        };

        active
            .update(&self.conn)
            .await
            .context("Failed to update collection")?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        let result = Collections::delete_by_id(id.to_string())
            .exec(&self.conn)
            .await
            .context("Failed to delete collection")?;

        Ok(result.rows_affected > 0)
    }
}
