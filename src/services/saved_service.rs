use crate::domain::{RecipeId, UserId};
use crate::models::recipe::{SavedRecipe, SavedRecipeDetail};
use crate::services::recipe_service::RecipeError;

/// A user's saved-recipe list.
///
/// Reads are cached per user; mutations invalidate only that user's keys.
#[async_trait::async_trait]
pub trait SavedRecipeService: Send + Sync {
    /// Saves a recipe for the user. Saving twice is a no-op.
    ///
    /// # Errors
    ///
    /// - [`RecipeError::NotFound`] if the recipe does not exist
    async fn save(&self, user: UserId, recipe: RecipeId) -> Result<bool, RecipeError>;

    /// Removes a saved recipe. Returns whether anything was removed.
    async fn unsave(&self, user: UserId, recipe: RecipeId) -> Result<bool, RecipeError>;

    async fn list(&self, user: UserId) -> Result<Vec<SavedRecipe>, RecipeError>;

    /// Like [`SavedRecipeService::list`] with ingredient lines and tags.
    async fn list_full(&self, user: UserId) -> Result<Vec<SavedRecipeDetail>, RecipeError>;
}
