use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use crate::cache::{CacheBackend, MemoryCache, QueryCache, RedisCache};
use crate::config::{CacheBackendKind, CacheConfig, Config};
use crate::db::Store;
use crate::services::{
    CacheAdmin, IngredientCatalog, RecipeService, SavedRecipeService, SeaOrmRecipeService,
    SeaOrmSavedRecipeService, TagResolver,
};

/// Explicitly wired engine: one store, one cache, the services on top.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Arc<Store>,

    pub cache: Arc<QueryCache>,

    pub recipes: Arc<dyn RecipeService>,

    pub saved: Arc<dyn SavedRecipeService>,

    pub ingredients: Arc<IngredientCatalog>,

    pub cache_admin: Arc<CacheAdmin>,
}

impl SharedState {
    /// Connects the database and the configured cache backend.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let store = Store::connect(&config.database).await?;
        let backend = Self::cache_backend(&config.cache).await?;
        Ok(Self::new(store, backend, config))
    }

    async fn cache_backend(config: &CacheConfig) -> anyhow::Result<Arc<dyn CacheBackend>> {
        let backend: Arc<dyn CacheBackend> = match config.backend {
            CacheBackendKind::Redis => Arc::new(
                RedisCache::connect(
                    &config.redis_url,
                    config.connection_retries,
                    config.scan_batch_size,
                )
                .await
                .context("Failed to connect to Redis")?,
            ),
            CacheBackendKind::Memory => Arc::new(MemoryCache::new()),
        };
        info!(backend = backend.name(), "Cache backend ready");
        Ok(backend)
    }

    /// Wires the services over an existing store and cache backend.
    #[must_use]
    pub fn new(store: Store, backend: Arc<dyn CacheBackend>, config: Config) -> Self {
        let store = Arc::new(store);
        let cache = Arc::new(QueryCache::new(backend, config.cache.single_flight));
        let tags = Arc::new(TagResolver::new(store.clone(), cache.clone()));
        let deadline = config.engine.request_timeout_ms.map(Duration::from_millis);

        let recipes = Arc::new(SeaOrmRecipeService::new(
            store.clone(),
            cache.clone(),
            tags.clone(),
            deadline,
        )) as Arc<dyn RecipeService>;

        let saved = Arc::new(SeaOrmSavedRecipeService::new(
            store.clone(),
            cache.clone(),
            tags,
            config.engine.saved_recipes_limit,
        )) as Arc<dyn SavedRecipeService>;

        Self {
            ingredients: Arc::new(IngredientCatalog::new(store.clone(), cache.clone())),
            cache_admin: Arc::new(CacheAdmin::new(cache.clone())),
            config: Arc::new(config),
            store,
            cache,
            recipes,
            saved,
        }
    }
}
