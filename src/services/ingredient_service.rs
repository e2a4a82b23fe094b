//! Ingredient catalogue reads: categories, the grouped picker tree, search
//! and usage statistics.

use crate::cache::{CacheKey, QueryCache};
use crate::constants::{limits, ttl};
use crate::db::Store;
use crate::models::ingredient::{Category, IngredientGroup, IngredientSummary, PopularIngredient};
use crate::services::filter::language_code;
use crate::services::recipe_service::RecipeError;
use std::sync::Arc;

const SEARCH_LIMIT: u64 = 20;

pub struct IngredientCatalog {
    store: Arc<Store>,
    cache: Arc<QueryCache>,
}

impl IngredientCatalog {
    #[must_use]
    pub const fn new(store: Arc<Store>, cache: Arc<QueryCache>) -> Self {
        Self { store, cache }
    }

    pub async fn categories(&self, lang: &str) -> Result<Vec<Category>, RecipeError> {
        let lang = language_code(lang)?;
        let store: &Store = &self.store;
        self.cache
            .get_or_compute(
                "categories",
                &CacheKey::categories(lang),
                ttl::CATEGORIES,
                move || async move { store.list_categories(lang).await.map_err(RecipeError::from) },
            )
            .await
    }

    pub async fn grouped_ingredients(&self, lang: &str) -> Result<Vec<IngredientGroup>, RecipeError> {
        let lang = language_code(lang)?;
        let store: &Store = &self.store;
        self.cache
            .get_or_compute(
                "grouped_ingredients",
                &CacheKey::grouped_ingredients(lang),
                ttl::GROUPED_INGREDIENTS,
                move || async move {
                    store
                        .grouped_ingredients(lang)
                        .await
                        .map_err(RecipeError::from)
                },
            )
            .await
    }

    /// Uncached: the query space is unbounded.
    pub async fn search_ingredients(
        &self,
        query: &str,
        lang: &str,
    ) -> Result<Vec<IngredientSummary>, RecipeError> {
        let lang = language_code(lang)?;
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .store
            .search_ingredients(query, lang, SEARCH_LIMIT)
            .await?)
    }

    pub async fn popular_ingredients(
        &self,
        lang: &str,
        limit: u64,
    ) -> Result<Vec<PopularIngredient>, RecipeError> {
        let lang = language_code(lang)?;
        let limit = limit.clamp(1, limits::MAX_POPULAR);
        let store: &Store = &self.store;
        self.cache
            .get_or_compute(
                "ingredient_stats",
                &CacheKey::popular_ingredients(lang, limit),
                ttl::POPULAR_INGREDIENTS,
                move || async move {
                    store
                        .popular_ingredients(lang, limit)
                        .await
                        .map_err(RecipeError::from)
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_is_trimmed_and_checked() {
        assert_eq!(language_code(" ru ").unwrap(), "ru");
        assert!(language_code("").unwrap_err().is_validation());
        assert!(language_code("en:10").unwrap_err().is_validation());
    }
}
