//! Saved recipe command handlers

use super::print_json;
use crate::domain::{RecipeId, UserId};
use crate::state::SharedState;
use serde_json::json;

pub async fn cmd_saved_list(state: &SharedState, user: i32, full: bool) -> anyhow::Result<()> {
    let user = UserId::new(user);
    if full {
        print_json(&state.saved.list_full(user).await?)
    } else {
        print_json(&state.saved.list(user).await?)
    }
}

pub async fn cmd_saved_add(state: &SharedState, user: i32, recipe: i32) -> anyhow::Result<()> {
    let added = state
        .saved
        .save(UserId::new(user), RecipeId::new(recipe))
        .await?;
    print_json(&json!({ "saved": added }))
}

pub async fn cmd_saved_remove(state: &SharedState, user: i32, recipe: i32) -> anyhow::Result<()> {
    let removed = state
        .saved
        .unsave(UserId::new(user), RecipeId::new(recipe))
        .await?;
    print_json(&json!({ "removed": removed }))
}
