//! `SeaORM` implementation of the `RecipeService` trait.

use crate::cache::{CacheKey, QueryCache};
use crate::constants::{limits, ttl};
use crate::db::Store;
use crate::domain::RecipeId;
use crate::models::recipe::{Recipe, RecipeCard, RecipePage};
use crate::models::tag::Tag;
use crate::services::assembler::{RecipeAssembler, recipe_from_model};
use crate::services::count::CountEstimator;
use crate::services::filter::{
    FilterSet, RecipeQuery, language_code, run_with_search_fallback, split_page,
};
use crate::services::recipe_service::{RecipeError, RecipeService};
use crate::services::tag_resolver::TagResolver;
use metrics::counter;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// SeaORM-based implementation of [`RecipeService`].
///
/// Every expensive result goes through the [`QueryCache`]; the listing
/// itself, its total and the tag list are cached under separate keys.
pub struct SeaOrmRecipeService {
    store: Arc<Store>,
    cache: Arc<QueryCache>,
    tags: Arc<TagResolver>,
    assembler: RecipeAssembler,
    counts: CountEstimator,
    deadline: Option<Duration>,
}

impl SeaOrmRecipeService {
    #[must_use]
    pub fn new(
        store: Arc<Store>,
        cache: Arc<QueryCache>,
        tags: Arc<TagResolver>,
        deadline: Option<Duration>,
    ) -> Self {
        Self {
            assembler: RecipeAssembler::new(store.clone(), tags.clone()),
            counts: CountEstimator::new(store.clone(), cache.clone()),
            store,
            cache,
            tags,
            deadline,
        }
    }

    async fn with_deadline<T, F>(&self, fut: F) -> Result<T, RecipeError>
    where
        F: Future<Output = Result<T, RecipeError>>,
    {
        match self.deadline {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| RecipeError::Timeout(limit))?,
            None => fut.await,
        }
    }

    /// Runs the page query, hydrates it and attaches the total.
    async fn compute_page(&self, filter: &FilterSet) -> Result<RecipePage, RecipeError> {
        let store: &Store = &self.store;
        let backend = store.backend();
        let (fetch, offset) = (filter.fetch_size(), filter.offset);

        let rows = if filter.is_scored() {
            let ids = filter.ingredient_ids.as_slice();
            run_with_search_fallback(filter, backend, move |condition| {
                store.list_recipes_scored(condition, ids, fetch, offset)
            })
            .await?
        } else {
            run_with_search_fallback(filter, backend, move |condition| {
                store.list_recipes_unscored(condition, fetch, offset)
            })
            .await?
        };

        let (rows, has_more) = split_page(rows, filter.limit);
        debug!(
            rows = rows.len(),
            has_more,
            scored = filter.is_scored(),
            "Recipe page fetched"
        );

        let recipes = self.assembler.cards(rows, &filter.ingredient_ids).await?;
        let total = self.counts.total(filter).await?;

        Ok(RecipePage {
            recipes,
            total,
            has_more,
        })
    }

    async fn load_card(&self, id: RecipeId, held: &[i32]) -> Result<RecipeCard, RecipeError> {
        let model = self
            .store
            .get_recipe(id.value())
            .await?
            .ok_or(RecipeError::NotFound(id))?;

        self.assembler
            .cards(vec![model], held)
            .await?
            .pop()
            .ok_or(RecipeError::NotFound(id))
    }
}

#[async_trait::async_trait]
impl RecipeService for SeaOrmRecipeService {
    async fn list_recipes(&self, query: &RecipeQuery) -> Result<RecipePage, RecipeError> {
        let filter = FilterSet::assemble(query)?;
        let ttl = if filter.is_plain() {
            ttl::PLAIN_LISTING
        } else {
            ttl::FILTERED_LISTING
        };

        self.with_deadline(async {
            let filter = &filter;
            self.cache
                .get_or_compute("recipes", &filter.listing_key(), ttl, move || {
                    self.compute_page(filter)
                })
                .await
        })
        .await
    }

    async fn get_recipe(
        &self,
        id: RecipeId,
        ingredient_ids: &[i32],
    ) -> Result<RecipeCard, RecipeError> {
        self.with_deadline(async {
            match self.store.increment_recipe_views(id.value()).await {
                Ok(true) => counter!("pantry_recipe_views_total").increment(1),
                Ok(false) => {}
                Err(e) => warn!(recipe_id = %id, error = %e, "Failed to record recipe view"),
            }

            let key = CacheKey::recipe_detail(id.value(), ingredient_ids);
            self.cache
                .get_or_compute("recipe", &key, ttl::RECIPE_DETAIL, move || {
                    self.load_card(id, ingredient_ids)
                })
                .await
        })
        .await
    }

    async fn popular_recipes(&self, lang: &str, limit: u64) -> Result<Vec<Recipe>, RecipeError> {
        let lang = language_code(lang)?;
        let limit = limit.clamp(1, limits::MAX_POPULAR);
        let store: &Store = &self.store;

        self.cache
            .get_or_compute(
                "popular_recipes",
                &CacheKey::popular_recipes(lang, limit),
                ttl::POPULAR_RECIPES,
                move || async move {
                    store
                        .most_viewed_recipes(lang, limit)
                        .await
                        .map(|rows| rows.into_iter().map(recipe_from_model).collect::<Vec<_>>())
                        .map_err(RecipeError::from)
                },
            )
            .await
    }

    async fn all_tags(&self) -> Result<Vec<Tag>, RecipeError> {
        self.tags.all().await
    }
}
