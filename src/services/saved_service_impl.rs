use crate::cache::{CacheKey, QueryCache};
use crate::constants::ttl;
use crate::db::Store;
use crate::domain::{RecipeId, UserId};
use crate::models::recipe::{SavedRecipe, SavedRecipeDetail};
use crate::services::assembler::{RecipeAssembler, recipe_from_model};
use crate::services::recipe_service::RecipeError;
use crate::services::saved_service::SavedRecipeService;
use crate::services::tag_resolver::TagResolver;
use std::sync::Arc;
use tracing::info;

pub struct SeaOrmSavedRecipeService {
    store: Arc<Store>,
    cache: Arc<QueryCache>,
    assembler: RecipeAssembler,
    limit: u64,
}

impl SeaOrmSavedRecipeService {
    #[must_use]
    pub fn new(
        store: Arc<Store>,
        cache: Arc<QueryCache>,
        tags: Arc<TagResolver>,
        limit: u64,
    ) -> Self {
        Self {
            assembler: RecipeAssembler::new(store.clone(), tags),
            store,
            cache,
            limit: limit.max(1),
        }
    }

    async fn invalidate(&self, user: UserId) {
        self.cache
            .invalidate(&[
                CacheKey::saved_recipes(user, false),
                CacheKey::saved_recipes(user, true),
            ])
            .await;
    }
}

#[async_trait::async_trait]
impl SavedRecipeService for SeaOrmSavedRecipeService {
    async fn save(&self, user: UserId, recipe: RecipeId) -> Result<bool, RecipeError> {
        if self.store.get_recipe(recipe.value()).await?.is_none() {
            return Err(RecipeError::NotFound(recipe));
        }

        let added = self
            .store
            .save_recipe(user.value(), recipe.value())
            .await?;
        self.invalidate(user).await;

        if added {
            info!(user_id = %user, recipe_id = %recipe, "Recipe saved");
        }
        Ok(added)
    }

    async fn unsave(&self, user: UserId, recipe: RecipeId) -> Result<bool, RecipeError> {
        let removed = self
            .store
            .unsave_recipe(user.value(), recipe.value())
            .await?;
        self.invalidate(user).await;

        if removed {
            info!(user_id = %user, recipe_id = %recipe, "Recipe unsaved");
        }
        Ok(removed)
    }

    async fn list(&self, user: UserId) -> Result<Vec<SavedRecipe>, RecipeError> {
        let store: &Store = &self.store;
        let limit = self.limit;

        self.cache
            .get_or_compute(
                "saved_recipes",
                &CacheKey::saved_recipes(user, false),
                ttl::SAVED_RECIPES,
                move || async move {
                    store
                        .list_saved_recipes(user.value(), limit)
                        .await
                        .map(|rows| {
                            rows.into_iter()
                                .map(|(saved, recipe)| SavedRecipe {
                                    recipe: recipe_from_model(recipe),
                                    saved_at: saved.created_at,
                                })
                                .collect::<Vec<_>>()
                        })
                        .map_err(RecipeError::from)
                },
            )
            .await
    }

    async fn list_full(&self, user: UserId) -> Result<Vec<SavedRecipeDetail>, RecipeError> {
        let store: &Store = &self.store;
        let assembler = &self.assembler;
        let limit = self.limit;

        self.cache
            .get_or_compute(
                "saved_recipes",
                &CacheKey::saved_recipes(user, true),
                ttl::SAVED_RECIPES,
                move || async move {
                    let rows = store
                        .list_saved_recipes(user.value(), limit)
                        .await
                        .map_err(RecipeError::from)?;
                    let (saved, models): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
                    let details = assembler.details(models).await?;

                    Ok::<_, RecipeError>(
                        saved
                            .into_iter()
                            .zip(details)
                            .map(|(saved, detail)| SavedRecipeDetail {
                                detail,
                                saved_at: saved.created_at,
                            })
                            .collect(),
                    )
                },
            )
            .await
    }
}
