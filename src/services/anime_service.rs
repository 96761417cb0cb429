//! Domain service for the anime tracked by each account.
//!
//! Every operation is scoped to the caller's [`SessionContext`]: reads only
//! ever return the caller's own entries, and writes to an entry owned by
//! someone else are refused before anything is persisted.

use crate::domain::SessionContext;
use crate::models::anime::{AnimeChanges, AnimeEntry, AnimeFilter, NewAnime};
use thiserror::Error;

/// Errors specific to anime operations.
#[derive(Debug, Error)]
pub enum AnimeError {
    #[error("Anime not found")]
    NotFound(String),

    #[error("You do not have permission to {action} this anime")]
    Forbidden { action: &'static str },

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for AnimeError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AnimeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for anime entries.
#[async_trait::async_trait]
pub trait AnimeService: Send + Sync {
    /// Lists the caller's entries, oldest first.
    ///
    /// # Errors
    ///
    /// - Returns [`AnimeError::Validation`] for a blank search query
    /// - Returns [`AnimeError::Database`] on connection failures
    async fn list(
        &self,
        session: &SessionContext,
        filter: AnimeFilter,
    ) -> Result<Vec<AnimeEntry>, AnimeError>;

    /// Creates an entry owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AnimeError::Validation`] if the title is blank.
    async fn create(
        &self,
        session: &SessionContext,
        new: NewAnime,
    ) -> Result<AnimeEntry, AnimeError>;

    /// Applies a partial update to one of the caller's entries.
    ///
    /// # Errors
    ///
    /// - Returns [`AnimeError::NotFound`] if the id matches nothing
    /// - Returns [`AnimeError::Forbidden`] if the entry belongs to another account
    /// - Returns [`AnimeError::Validation`] if the title would become blank
    async fn update(
        &self,
        session: &SessionContext,
        id: &str,
        changes: AnimeChanges,
    ) -> Result<AnimeEntry, AnimeError>;

    /// Deletes one of the caller's entries and drops it from their collections.
    ///
    /// # Errors
    ///
    /// - Returns [`AnimeError::NotFound`] if the id matches nothing
    /// - Returns [`AnimeError::Forbidden`] if the entry belongs to another account
    async fn delete(&self, session: &SessionContext, id: &str) -> Result<(), AnimeError>;
}
