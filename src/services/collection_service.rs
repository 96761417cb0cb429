//! Domain service for collections, the premium-only grouping of anime.

use crate::domain::{EntitlementError, SessionContext};
use crate::models::collection::{Collection, CollectionChanges, NewCollection};
use thiserror::Error;

/// Errors specific to collection operations.
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("Collection not found")]
    NotFound(String),

    #[error("Anime not found")]
    AnimeNotFound(String),

    #[error("You do not have permission to {action} this collection")]
    Forbidden { action: &'static str },

    #[error("Premium access required to create collections")]
    PremiumRequired,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for CollectionError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CollectionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<EntitlementError> for CollectionError {
    fn from(err: EntitlementError) -> Self {
        match err {
            EntitlementError::PremiumRequired => Self::PremiumRequired,
            other => Self::Validation(other.to_string()),
        }
    }
}

/// Domain service trait for collections.
#[async_trait::async_trait]
pub trait CollectionService: Send + Sync {
    /// Lists the caller's collections, oldest first.
    async fn list(&self, session: &SessionContext) -> Result<Vec<Collection>, CollectionError>;

    /// Creates a collection. The entitlement gate runs before any validation.
    ///
    /// # Errors
    ///
    /// - Returns [`CollectionError::PremiumRequired`] for free accounts
    /// - Returns [`CollectionError::Validation`] for a blank name or unknown anime ids
    async fn create(
        &self,
        session: &SessionContext,
        new: NewCollection,
    ) -> Result<Collection, CollectionError>;

    /// Applies a partial update to one of the caller's collections.
    ///
    /// # Errors
    ///
    /// - Returns [`CollectionError::NotFound`] if the id matches nothing
    /// - Returns [`CollectionError::Forbidden`] if the collection belongs to another account
    /// - Returns [`CollectionError::Validation`] for a blank name or unknown anime ids
    async fn update(
        &self,
        session: &SessionContext,
        id: &str,
        changes: CollectionChanges,
    ) -> Result<Collection, CollectionError>;

    /// # Errors
    ///
    /// - Returns [`CollectionError::NotFound`] if the id matches nothing
    /// - Returns [`CollectionError::Forbidden`] if the collection belongs to another account
    async fn delete(&self, session: &SessionContext, id: &str) -> Result<(), CollectionError>;

    /// Adds an anime to a collection. Adding a member twice is a no-op.
    ///
    /// # Errors
    ///
    /// - Returns [`CollectionError::NotFound`] if the collection does not exist
    /// - Returns [`CollectionError::Forbidden`] if the collection belongs to another account
    /// - Returns [`CollectionError::AnimeNotFound`] if the caller owns no such anime
    async fn add_member(
        &self,
        session: &SessionContext,
        collection_id: &str,
        anime_id: &str,
    ) -> Result<Collection, CollectionError>;

    /// Removes every occurrence of an anime from a collection.
    ///
    /// # Errors
    ///
    /// - Returns [`CollectionError::NotFound`] if the collection does not exist
    /// - Returns [`CollectionError::Forbidden`] if the collection belongs to another account
    async fn remove_member(
        &self,
        session: &SessionContext,
        collection_id: &str,
        anime_id: &str,
    ) -> Result<Collection, CollectionError>;
}
