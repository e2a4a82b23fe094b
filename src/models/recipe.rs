use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::tag::Tag;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub prep_time: Option<i32>,
    pub rating: Option<i32>,
    pub difficulty: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    pub lang: String,
    pub source_url: Option<String>,
    pub viewed: i32,
    pub created_at: Option<NaiveDateTime>,
}

/// One ingredient line of a recipe. `ingredient_id` is `None` when the line
/// was never matched to a catalogue ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientLine {
    pub ingredient_id: Option<i32>,
    pub name: Option<String>,
    pub line: String,
    pub amount: Option<String>,
    pub required: bool,
}

/// Recipe with its ingredient lines and resolved tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<IngredientLine>,
    pub diet_tags: Vec<Tag>,
    pub meal_types: Vec<Tag>,
    pub kitchens: Vec<Tag>,
}

/// A recipe scored against the caller's ingredient set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeCard {
    #[serde(flatten)]
    pub detail: RecipeDetail,
    pub match_percentage: u8,
    pub missing_ingredients: Vec<IngredientLine>,
}

impl RecipeCard {
    #[must_use]
    pub const fn id(&self) -> i32 {
        self.detail.recipe.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePage {
    pub recipes: Vec<RecipeCard>,
    pub total: u64,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub saved_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipeDetail {
    #[serde(flatten)]
    pub detail: RecipeDetail,
    pub saved_at: NaiveDateTime,
}
