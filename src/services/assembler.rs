//! Batch hydration of recipe rows into API shapes.
//!
//! One ingredient query and one link query per tag axis per page, whatever
//! the page size.

use crate::db::{IngredientRow, Store};
use crate::entities::recipes;
use crate::models::ingredient::resolve_name;
use crate::models::recipe::{IngredientLine, Recipe, RecipeCard, RecipeDetail};
use crate::services::recipe_service::RecipeError;
use crate::services::scoring;
use crate::services::tag_resolver::TagResolver;
use std::collections::HashSet;
use std::sync::Arc;

pub struct RecipeAssembler {
    store: Arc<Store>,
    tags: Arc<TagResolver>,
}

impl RecipeAssembler {
    #[must_use]
    pub const fn new(store: Arc<Store>, tags: Arc<TagResolver>) -> Self {
        Self { store, tags }
    }

    pub async fn details(
        &self,
        models: Vec<recipes::Model>,
    ) -> Result<Vec<RecipeDetail>, RecipeError> {
        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();

        let (mut lines, mut tags) = futures::try_join!(
            async {
                self.store
                    .ingredient_lines(&ids)
                    .await
                    .map_err(RecipeError::from)
            },
            self.tags.tags_for(&ids),
        )?;

        Ok(models
            .into_iter()
            .map(|model| {
                let ingredients = lines
                    .remove(&model.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|row| ingredient_line(row, &model.lang))
                    .collect();
                let recipe_tags = tags.remove(&model.id).unwrap_or_default();

                RecipeDetail {
                    recipe: recipe_from_model(model),
                    ingredients,
                    diet_tags: recipe_tags.diets,
                    meal_types: recipe_tags.meal_types,
                    kitchens: recipe_tags.kitchens,
                }
            })
            .collect())
    }

    /// Details scored against `held`. With no held ingredients every card
    /// scores 0 and lists all its ingredients as missing.
    pub async fn cards(
        &self,
        models: Vec<recipes::Model>,
        held: &[i32],
    ) -> Result<Vec<RecipeCard>, RecipeError> {
        let held: HashSet<i32> = held.iter().copied().collect();

        Ok(self
            .details(models)
            .await?
            .into_iter()
            .map(|detail| {
                let score = scoring::score(&detail.ingredients, &held);
                RecipeCard {
                    detail,
                    match_percentage: score.percentage,
                    missing_ingredients: score.missing,
                }
            })
            .collect())
    }
}

#[must_use]
pub fn recipe_from_model(model: recipes::Model) -> Recipe {
    Recipe {
        id: model.id,
        title: model.title,
        description: model.description,
        prep_time: model.prep_time,
        rating: model.rating,
        difficulty: model.difficulty,
        image_url: model.image_url,
        instructions: instruction_steps(model.instructions),
        lang: model.lang,
        source_url: model.source_url,
        viewed: model.viewed,
        created_at: model.created_at,
    }
}

/// Instructions are stored as a JSON array. Non-string steps are kept as
/// their JSON text.
fn instruction_steps(value: Option<serde_json::Value>) -> Vec<String> {
    match value {
        Some(serde_json::Value::Array(steps)) => steps
            .into_iter()
            .map(|step| match step {
                serde_json::Value::String(text) => text,
                other => other.to_string(),
            })
            .collect(),
        Some(serde_json::Value::String(single)) => vec![single],
        _ => Vec::new(),
    }
}

fn ingredient_line((line, ingredient): IngredientRow, lang: &str) -> IngredientLine {
    IngredientLine {
        ingredient_id: line.ingredient_id,
        name: ingredient.map(|i| resolve_name(i.names.as_ref(), lang, &i.name)),
        line: line.line,
        amount: line.amount,
        required: line.required,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_instruction_steps() {
        assert_eq!(
            instruction_steps(Some(json!(["Boil water", "Add pasta"]))),
            vec!["Boil water", "Add pasta"]
        );
        assert_eq!(instruction_steps(Some(json!([{"step": 1}]))), vec!["{\"step\":1}"]);
        assert!(instruction_steps(None).is_empty());
    }
}
