//! `SeaORM` implementation of the `CollectionService` trait.

use crate::db::Store;
use crate::domain::sanitize::{escape_text, non_empty_label};
use crate::domain::{AccountId, Access, SessionContext};
use crate::models::collection::{Collection, CollectionChanges, NewCollection, dedup_ids};
use crate::services::check_owner;
use crate::services::collection_service::{CollectionError, CollectionService};
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub struct SeaOrmCollectionService {
    store: Store,
}

impl SeaOrmCollectionService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn owned_collection(
        &self,
        session: &SessionContext,
        id: &str,
        action: &'static str,
    ) -> Result<Collection, CollectionError> {
        let collection = self
            .store
            .get_collection(id)
            .await?
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))?;

        match check_owner(session.account_id, collection.owner, "collection", id) {
            Access::Allow => Ok(collection),
            Access::Forbid => Err(CollectionError::Forbidden { action }),
        }
    }

    /// Deduplicates `ids` and checks that every one names an anime `owner` owns.
    async fn resolve_members(
        &self,
        owner: AccountId,
        ids: Vec<String>,
    ) -> Result<Vec<String>, CollectionError> {
        let ids = dedup_ids(ids);
        let owned: HashSet<String> = self
            .store
            .anime_ids_owned_by(owner, &ids)
            .await?
            .into_iter()
            .collect();

        let unknown: Vec<&str> = ids
            .iter()
            .filter(|id| !owned.contains(*id))
            .map(String::as_str)
            .collect();

        if !unknown.is_empty() {
            return Err(CollectionError::Validation(format!(
                "Unknown anime ids: {}",
                unknown.join(", ")
            )));
        }

        Ok(ids)
    }
}

fn name_required() -> CollectionError {
    CollectionError::Validation("Collection name is required".to_string())
}

/// Premium gate for collection creation. Denials are counted and logged.
pub(crate) fn check_collection_access(session: &SessionContext) -> Result<(), CollectionError> {
    session.entitlement().require_collection_access().map_err(|err| {
        metrics::counter!("entitlement_denials_total").increment(1);
        warn!(account_id = %session.account_id, "Collection creation refused: not premium");
        err.into()
    })
}

#[async_trait]
impl CollectionService for SeaOrmCollectionService {
    async fn list(&self, session: &SessionContext) -> Result<Vec<Collection>, CollectionError> {
        Ok(self
            .store
            .list_collections_for_owner(session.account_id)
            .await?)
    }

    async fn create(
        &self,
        session: &SessionContext,
        new: NewCollection,
    ) -> Result<Collection, CollectionError> {
        check_collection_access(session)?;

        let name = non_empty_label(&new.name).ok_or_else(name_required)?;
        let anime_ids = self
            .resolve_members(session.account_id, new.anime_ids.unwrap_or_default())
            .await?;

        let collection = Collection {
            id: uuid::Uuid::new_v4().to_string(),
            owner: session.account_id,
            name,
            description: new.description.as_deref().map(escape_text).unwrap_or_default(),
            anime_ids,
            created_date: chrono::Utc::now().to_rfc3339(),
        };

        self.store.add_collection(&collection).await?;
        Ok(collection)
    }

    async fn update(
        &self,
        session: &SessionContext,
        id: &str,
        changes: CollectionChanges,
    ) -> Result<Collection, CollectionError> {
        let mut collection = self.owned_collection(session, id, "update").await?;

        if let Some(name) = changes.name {
            collection.name = non_empty_label(&name).ok_or_else(name_required)?;
        }
        if let Some(description) = changes.description {
            collection.description = escape_text(&description);
        }
        if let Some(ids) = changes.anime_ids {
            collection.anime_ids = self.resolve_members(session.account_id, ids).await?;
        }

        self.store.update_collection(&collection).await?;
        debug!(account_id = %session.account_id, "Updated collection {}", collection.id);
        Ok(collection)
    }

    async fn delete(&self, session: &SessionContext, id: &str) -> Result<(), CollectionError> {
        let collection = self.owned_collection(session, id, "delete").await?;

        if !self.store.remove_collection(&collection.id).await? {
            return Err(CollectionError::NotFound(id.to_string()));
        }

        info!(account_id = %session.account_id, "Deleted collection: {}", collection.name);
        Ok(())
    }

    async fn add_member(
        &self,
        session: &SessionContext,
        collection_id: &str,
        anime_id: &str,
    ) -> Result<Collection, CollectionError> {
        let mut collection = self.owned_collection(session, collection_id, "modify").await?;

        let anime = self.store.get_anime(anime_id).await?;
        if !anime.is_some_and(|entry| entry.owner == session.account_id) {
            return Err(CollectionError::AnimeNotFound(anime_id.to_string()));
        }

        if collection.add_member(anime_id) {
            self.store.update_collection(&collection).await?;
        }
        Ok(collection)
    }

    async fn remove_member(
        &self,
        session: &SessionContext,
        collection_id: &str,
        anime_id: &str,
    ) -> Result<Collection, CollectionError> {
        let mut collection = self.owned_collection(session, collection_id, "modify").await?;

        if collection.remove_member(anime_id) {
            self.store.update_collection(&collection).await?;
        }
        Ok(collection)
    }
}
