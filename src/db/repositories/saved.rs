use crate::entities::{prelude::*, recipes, saved_recipes};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

pub struct SavedRecipeRepository {
    conn: DatabaseConnection,
}

impl SavedRecipeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts the pair unless it already exists. Returns whether a row was added.
    pub async fn save(&self, user_id: i32, recipe_id: i32) -> anyhow::Result<bool> {
        let model = saved_recipes::ActiveModel {
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };

        let inserted = SavedRecipes::insert(model)
            .on_conflict(
                OnConflict::columns([saved_recipes::Column::UserId, saved_recipes::Column::RecipeId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(inserted > 0)
    }

    pub async fn unsave(&self, user_id: i32, recipe_id: i32) -> anyhow::Result<bool> {
        let result = SavedRecipes::delete_many()
            .filter(saved_recipes::Column::UserId.eq(user_id))
            .filter(saved_recipes::Column::RecipeId.eq(recipe_id))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Most recently saved first, recipe id ascending on equal timestamps.
    pub async fn list(
        &self,
        user_id: i32,
        limit: u64,
    ) -> anyhow::Result<Vec<(saved_recipes::Model, recipes::Model)>> {
        let rows = SavedRecipes::find()
            .filter(saved_recipes::Column::UserId.eq(user_id))
            .order_by_desc(saved_recipes::Column::CreatedAt)
            .order_by_asc(saved_recipes::Column::RecipeId)
            .limit(limit)
            .find_also_related(Recipes)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(saved, recipe)| recipe.map(|r| (saved, r)))
            .collect())
    }
}
