//! Recipe listing and detail command handlers

use super::print_json;
use crate::cli::ListArgs;
use crate::domain::RecipeId;
use crate::services::{RecipeQuery, parse_id_list};
use crate::state::SharedState;

pub async fn cmd_list_recipes(state: &SharedState, args: ListArgs) -> anyhow::Result<()> {
    let query = RecipeQuery {
        ingredient_ids: parse_id_list(&args.ingredients)?,
        diet_tag_ids: parse_id_list(&args.diets)?,
        meal_type_ids: parse_id_list(&args.meal_types)?,
        kitchen_ids: parse_id_list(&args.kitchens)?,
        language: args.lang,
        search: args.search,
        limit: args.limit,
        offset: args.offset,
    };

    let page = state.recipes.list_recipes(&query).await?;
    print_json(&page)
}

pub async fn cmd_recipe(state: &SharedState, id: i32, ingredients: &str) -> anyhow::Result<()> {
    let ingredient_ids = parse_id_list(ingredients)?;
    let card = state
        .recipes
        .get_recipe(RecipeId::new(id), &ingredient_ids)
        .await?;
    print_json(&card)
}

pub async fn cmd_popular_recipes(
    state: &SharedState,
    lang: &str,
    limit: Option<u64>,
) -> anyhow::Result<()> {
    let limit = limit.unwrap_or(state.config.engine.popular_limit);
    let recipes = state.recipes.popular_recipes(lang, limit).await?;
    print_json(&recipes)
}
