use crate::config::SecurityConfig;
use crate::domain::{AccountId, WatchStatus};
use crate::models::account::{Account, CreditUpdate};
use crate::models::anime::AnimeEntry;
use crate::models::collection::Collection;
use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            let parent = Path::new(path_str)
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty());
            if let Some(parent) = parent {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn anime_repo(&self) -> repositories::anime::AnimeRepository {
        repositories::anime::AnimeRepository::new(self.conn.clone())
    }

    fn collection_repo(&self) -> repositories::collection::CollectionRepository {
        repositories::collection::CollectionRepository::new(self.conn.clone())
    }

    // Accounts

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<Option<Account>> {
        self.user_repo().create(username, password, config).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<Account>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn authenticate_user(&self, username: &str, password: &str) -> Result<Option<Account>> {
        self.user_repo().authenticate(username, password).await
    }

    pub async fn verify_user_password(&self, id: AccountId, password: &str) -> Result<Option<bool>> {
        self.user_repo().verify_password(id, password).await
    }

    pub async fn update_user_password(
        &self,
        id: AccountId,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        self.user_repo()
            .update_password(id, new_password, config)
            .await
    }

    pub async fn add_user_credits(&self, id: AccountId, amount: i64) -> Result<CreditUpdate> {
        self.user_repo().add_credits(id, amount).await
    }

    // Anime entries

    pub async fn add_anime(&self, entry: &AnimeEntry) -> Result<()> {
        self.anime_repo().insert(entry).await
    }

    pub async fn get_anime(&self, id: &str) -> Result<Option<AnimeEntry>> {
        self.anime_repo().get(id).await
    }

    pub async fn list_anime_for_owner(
        &self,
        owner: AccountId,
        status: Option<WatchStatus>,
    ) -> Result<Vec<AnimeEntry>> {
        self.anime_repo().list_for_owner(owner, status).await
    }

    pub async fn anime_ids_owned_by(&self, owner: AccountId, ids: &[String]) -> Result<Vec<String>> {
        self.anime_repo().ids_owned_by(owner, ids).await
    }

    pub async fn update_anime(&self, entry: &AnimeEntry) -> Result<()> {
        self.anime_repo().update(entry).await
    }

    pub async fn remove_anime(&self, id: &str, owner: AccountId) -> Result<bool> {
        self.anime_repo().delete(id, owner).await
    }

    // Collections

    pub async fn add_collection(&self, collection: &Collection) -> Result<()> {
        self.collection_repo().insert(collection).await
    }

    pub async fn get_collection(&self, id: &str) -> Result<Option<Collection>> {
        self.collection_repo().get(id).await
    }

    pub async fn list_collections_for_owner(&self, owner: AccountId) -> Result<Vec<Collection>> {
        self.collection_repo().list_for_owner(owner).await
    }

    pub async fn update_collection(&self, collection: &Collection) -> Result<()> {
        self.collection_repo().update(collection).await
    }

    pub async fn remove_collection(&self, id: &str) -> Result<bool> {
        self.collection_repo().delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_database_directory() {
        let dir = std::env::temp_dir().join(format!("anitrack-db-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("tracker.db");

        let store = Store::new(&format!("sqlite:{}", path.display())).await.unwrap();
        store.ping().await.unwrap();
        assert!(path.exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn reports_unusable_database_directory() {
        // A regular file where the parent directory should be.
        let blocker = std::env::temp_dir().join(format!("anitrack-file-{}", uuid::Uuid::new_v4()));
        std::fs::write(&blocker, b"").unwrap();
        let path = blocker.join("tracker.db");

        let err = Store::new(&format!("sqlite:{}", path.display()))
            .await
            .err()
            .unwrap();
        assert!(
            err.to_string().starts_with("Failed to create database directory"),
            "{err:#}"
        );

        std::fs::remove_file(&blocker).ok();
    }
}
