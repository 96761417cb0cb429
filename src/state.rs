use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccountService, AnimeService, CollectionService, SeaOrmAccountService, SeaOrmAnimeService,
    SeaOrmCollectionService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub account_service: Arc<dyn AccountService>,

    pub anime_service: Arc<dyn AnimeService>,

    pub collection_service: Arc<dyn CollectionService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    /// Wires the services around an already opened store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let account_service = Arc::new(SeaOrmAccountService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AccountService + Send + Sync + 'static>;

        let anime_service = Arc::new(SeaOrmAnimeService::new(store.clone()))
            as Arc<dyn AnimeService + Send + Sync + 'static>;

        let collection_service = Arc::new(SeaOrmCollectionService::new(store.clone()))
            as Arc<dyn CollectionService + Send + Sync + 'static>;

        Self {
            config: Arc::new(config),
            store,
            account_service,
            anime_service,
            collection_service,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
