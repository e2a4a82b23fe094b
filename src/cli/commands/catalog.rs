use super::print_json;
use crate::state::SharedState;

pub async fn cmd_tags(state: &SharedState) -> anyhow::Result<()> {
    print_json(&state.recipes.all_tags().await?)
}

pub async fn cmd_categories(state: &SharedState, lang: &str) -> anyhow::Result<()> {
    print_json(&state.ingredients.categories(lang).await?)
}

pub async fn cmd_ingredients(
    state: &SharedState,
    search: Option<&str>,
    lang: &str,
) -> anyhow::Result<()> {
    match search {
        Some(query) => print_json(&state.ingredients.search_ingredients(query, lang).await?),
        None => print_json(&state.ingredients.grouped_ingredients(lang).await?),
    }
}

pub async fn cmd_popular_ingredients(
    state: &SharedState,
    lang: &str,
    limit: Option<u64>,
) -> anyhow::Result<()> {
    let limit = limit.unwrap_or(state.config.engine.popular_limit);
    print_json(&state.ingredients.popular_ingredients(lang, limit).await?)
}
