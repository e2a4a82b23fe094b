mod cache;
mod catalog;
mod recipes;
mod saved;

pub use cache::cmd_cache;
pub use catalog::{cmd_categories, cmd_ingredients, cmd_popular_ingredients, cmd_tags};
pub use recipes::{cmd_list_recipes, cmd_popular_recipes, cmd_recipe};
pub use saved::{cmd_saved_add, cmd_saved_list, cmd_saved_remove};

use serde::Serialize;

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
