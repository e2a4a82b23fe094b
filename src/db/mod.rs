use crate::config::DatabaseConfig;
use crate::domain::TagKind;
use crate::entities::{recipes, saved_recipes};
use crate::models::ingredient::{Category, IngredientGroup, IngredientSummary, PopularIngredient};
use crate::models::tag::Tag;
use anyhow::{Context, Result};
use sea_orm::{
    ConnectOptions, Condition, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection,
};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

pub mod migrator;
pub mod repositories;

pub use repositories::recipe::IngredientRow;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    /// Connects with a bounded, fixed-delay retry loop and applies the
    /// bootstrap migration when `run_migrations` is set.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let attempts = config.connect_retries.max(1);
        let delay = Duration::from_millis(config.retry_delay_ms);

        let mut attempt = 1;
        let conn = loop {
            match Database::connect(Self::connect_options(config)).await {
                Ok(conn) => break conn,
                Err(e) if attempt < attempts => {
                    warn!(
                        attempt,
                        max_attempts = attempts,
                        error = %e,
                        "Database connection failed, retrying in {}ms",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to connect to database after {attempts} attempts")
                    });
                }
            }
        };

        if config.run_migrations {
            migrator::Migrator::up(&conn, None)
                .await
                .context("Failed to apply migrations")?;
        }

        info!(
            "Database connected (pool: {}-{}, migrations: {})",
            config.min_connections, config.max_connections, config.run_migrations
        );

        Ok(Self { conn })
    }

    /// In-memory SQLite store with the schema applied. One pooled connection
    /// so every query sees the same database.
    pub async fn in_memory() -> Result<Self> {
        Self::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_retries: 1,
            ..DatabaseConfig::default()
        })
        .await
    }

    fn connect_options(config: &DatabaseConfig) -> ConnectOptions {
        let mut opt = ConnectOptions::new(config.url.clone());
        opt.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);
        opt
    }

    #[must_use]
    pub fn backend(&self) -> DatabaseBackend {
        self.conn.get_database_backend()
    }

    fn recipe_repo(&self) -> repositories::recipe::RecipeRepository {
        repositories::recipe::RecipeRepository::new(self.conn.clone())
    }

    fn ingredient_repo(&self) -> repositories::ingredient::IngredientRepository {
        repositories::ingredient::IngredientRepository::new(self.conn.clone())
    }

    fn tag_repo(&self) -> repositories::tag::TagRepository {
        repositories::tag::TagRepository::new(self.conn.clone())
    }

    fn saved_repo(&self) -> repositories::saved::SavedRecipeRepository {
        repositories::saved::SavedRecipeRepository::new(self.conn.clone())
    }

    // Recipes

    pub async fn get_recipe(&self, id: i32) -> Result<Option<recipes::Model>> {
        self.recipe_repo().get(id).await
    }

    pub async fn list_recipes_unscored(
        &self,
        condition: Condition,
        fetch: u64,
        offset: u64,
    ) -> Result<Vec<recipes::Model>> {
        self.recipe_repo()
            .list_unscored(condition, fetch, offset)
            .await
    }

    pub async fn list_recipes_scored(
        &self,
        condition: Condition,
        ingredient_ids: &[i32],
        fetch: u64,
        offset: u64,
    ) -> Result<Vec<recipes::Model>> {
        self.recipe_repo()
            .list_scored(condition, ingredient_ids, fetch, offset)
            .await
    }

    pub async fn count_recipes(&self, condition: Condition) -> Result<u64> {
        self.recipe_repo().count(condition).await
    }

    pub async fn count_perfect_matches(
        &self,
        condition: Condition,
        ingredient_ids: &[i32],
    ) -> Result<u64> {
        self.recipe_repo()
            .count_perfect_matches(condition, ingredient_ids)
            .await
    }

    pub async fn ingredient_lines(
        &self,
        recipe_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<IngredientRow>>> {
        self.recipe_repo().ingredient_lines(recipe_ids).await
    }

    pub async fn tag_links(&self, kind: TagKind, recipe_ids: &[i32]) -> Result<Vec<(i32, i32)>> {
        self.recipe_repo().tag_links(kind, recipe_ids).await
    }

    pub async fn increment_recipe_views(&self, id: i32) -> Result<bool> {
        self.recipe_repo().increment_views(id).await
    }

    pub async fn most_viewed_recipes(&self, lang: &str, limit: u64) -> Result<Vec<recipes::Model>> {
        self.recipe_repo().most_viewed(lang, limit).await
    }

    // Tags

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.tag_repo().list_all().await
    }

    // Ingredients

    pub async fn list_categories(&self, lang: &str) -> Result<Vec<Category>> {
        self.ingredient_repo().categories(lang).await
    }

    pub async fn grouped_ingredients(&self, lang: &str) -> Result<Vec<IngredientGroup>> {
        self.ingredient_repo().grouped(lang).await
    }

    pub async fn search_ingredients(
        &self,
        query: &str,
        lang: &str,
        limit: u64,
    ) -> Result<Vec<IngredientSummary>> {
        self.ingredient_repo().search(query, lang, limit).await
    }

    pub async fn popular_ingredients(
        &self,
        lang: &str,
        limit: u64,
    ) -> Result<Vec<PopularIngredient>> {
        self.ingredient_repo().popular(lang, limit).await
    }

    // Saved recipes

    pub async fn save_recipe(&self, user_id: i32, recipe_id: i32) -> Result<bool> {
        self.saved_repo().save(user_id, recipe_id).await
    }

    pub async fn unsave_recipe(&self, user_id: i32, recipe_id: i32) -> Result<bool> {
        self.saved_repo().unsave(user_id, recipe_id).await
    }

    pub async fn list_saved_recipes(
        &self,
        user_id: i32,
        limit: u64,
    ) -> Result<Vec<(saved_recipes::Model, recipes::Model)>> {
        self.saved_repo().list(user_id, limit).await
    }
}
