use std::collections::HashMap;

use crate::domain::TagKind;
use crate::entities::{
    ingredients, prelude::*, recipe_diets, recipe_ingredients, recipe_kitchens,
    recipe_meal_types, recipes,
};
use anyhow::Context;
use sea_orm::sea_query::{Alias, Expr, Func, JoinType, Order, Query, SelectStatement};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

const MATCHES: &str = "matches";
const MATCHED_COUNT: &str = "matched_count";
const TOTAL_COUNT: &str = "total_count";

pub type IngredientRow = (recipe_ingredients::Model, Option<ingredients::Model>);

#[derive(Debug, FromQueryResult)]
struct ScoredRow {
    id: i32,
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    count: i64,
}

pub struct RecipeRepository {
    conn: DatabaseConnection,
}

impl RecipeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> anyhow::Result<Option<recipes::Model>> {
        Ok(Recipes::find_by_id(id).one(&self.conn).await?)
    }

    /// Plain listing, newest first. Callers pass `fetch = limit + 1`.
    pub async fn list_unscored(
        &self,
        condition: Condition,
        fetch: u64,
        offset: u64,
    ) -> anyhow::Result<Vec<recipes::Model>> {
        let rows = Recipes::find()
            .filter(condition)
            .order_by_desc(recipes::Column::Id)
            .limit(fetch)
            .offset(offset)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    /// Scored listing: recipes sharing at least one ingredient with
    /// `ingredient_ids`, best coverage first, id ascending on ties.
    /// Ids are ranked in SQL, then the page is hydrated in one query.
    pub async fn list_scored(
        &self,
        condition: Condition,
        ingredient_ids: &[i32],
        fetch: u64,
        offset: u64,
    ) -> anyhow::Result<Vec<recipes::Model>> {
        let matches = Alias::new(MATCHES);

        let stmt = Query::select()
            .column((recipes::Entity, recipes::Column::Id))
            .from(recipes::Entity)
            .join_subquery(
                JoinType::InnerJoin,
                Self::match_aggregate(ingredient_ids),
                matches.clone(),
                Expr::col((matches.clone(), recipe_ingredients::Column::RecipeId))
                    .equals((recipes::Entity, recipes::Column::Id)),
            )
            .cond_where(condition.add(Expr::col((matches, Alias::new(MATCHED_COUNT))).gt(0)))
            .order_by_expr(
                Expr::cust(format!(
                    "ROUND(\"{MATCHES}\".\"{MATCHED_COUNT}\" * 100.0 / \"{MATCHES}\".\"{TOTAL_COUNT}\")"
                )),
                Order::Desc,
            )
            .order_by((recipes::Entity, recipes::Column::Id), Order::Asc)
            .limit(fetch)
            .offset(offset)
            .to_owned();

        let backend = self.conn.get_database_backend();
        let scored = ScoredRow::find_by_statement(backend.build(&stmt))
            .all(&self.conn)
            .await
            .context("Failed to run scored recipe listing")?;

        if scored.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = scored.iter().map(|row| row.id).collect();
        let mut by_id: HashMap<i32, recipes::Model> = Recipes::find()
            .filter(recipes::Column::Id.is_in(ids))
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|recipe| (recipe.id, recipe))
            .collect();

        Ok(scored
            .into_iter()
            .filter_map(|row| by_id.remove(&row.id))
            .collect())
    }

    pub async fn count(&self, condition: Condition) -> anyhow::Result<u64> {
        Ok(Recipes::find().filter(condition).count(&self.conn).await?)
    }

    /// Counts recipes whose every linked ingredient is in `ingredient_ids`.
    pub async fn count_perfect_matches(
        &self,
        condition: Condition,
        ingredient_ids: &[i32],
    ) -> anyhow::Result<u64> {
        let matches = Alias::new(MATCHES);

        let stmt = Query::select()
            .expr_as(
                Func::count(Expr::col((recipes::Entity, recipes::Column::Id))),
                Alias::new("count"),
            )
            .from(recipes::Entity)
            .join_subquery(
                JoinType::InnerJoin,
                Self::match_aggregate(ingredient_ids),
                matches.clone(),
                Expr::col((matches.clone(), recipe_ingredients::Column::RecipeId))
                    .equals((recipes::Entity, recipes::Column::Id)),
            )
            .cond_where(
                condition.add(
                    Expr::col((matches.clone(), Alias::new(MATCHED_COUNT)))
                        .equals((matches, Alias::new(TOTAL_COUNT))),
                ),
            )
            .to_owned();

        let backend = self.conn.get_database_backend();
        let row = CountRow::find_by_statement(backend.build(&stmt))
            .one(&self.conn)
            .await
            .context("Failed to count perfect matches")?;

        Ok(row.map_or(0, |r| u64::try_from(r.count).unwrap_or(0)))
    }

    /// Per recipe: how many linked ingredients there are and how many of them
    /// the caller holds. Unmatched lines (null ingredient) are left out.
    fn match_aggregate(ingredient_ids: &[i32]) -> SelectStatement {
        Query::select()
            .column(recipe_ingredients::Column::RecipeId)
            .expr_as(
                Func::count(Expr::col(recipe_ingredients::Column::IngredientId)),
                Alias::new(TOTAL_COUNT),
            )
            .expr_as(
                Func::sum(
                    Expr::case(
                        Expr::col(recipe_ingredients::Column::IngredientId)
                            .is_in(ingredient_ids.iter().copied()),
                        1,
                    )
                    .finally(0),
                ),
                Alias::new(MATCHED_COUNT),
            )
            .from(recipe_ingredients::Entity)
            .and_where(Expr::col(recipe_ingredients::Column::IngredientId).is_not_null())
            .group_by_col(recipe_ingredients::Column::RecipeId)
            .to_owned()
    }

    /// Loads every ingredient line for the given recipes in one query.
    pub async fn ingredient_lines(
        &self,
        recipe_ids: &[i32],
    ) -> anyhow::Result<HashMap<i32, Vec<IngredientRow>>> {
        if recipe_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = RecipeIngredients::find()
            .filter(recipe_ingredients::Column::RecipeId.is_in(recipe_ids.iter().copied()))
            .order_by_asc(recipe_ingredients::Column::Id)
            .find_also_related(Ingredients)
            .all(&self.conn)
            .await?;

        let mut grouped: HashMap<i32, Vec<IngredientRow>> = HashMap::new();
        for (line, ingredient) in rows {
            grouped
                .entry(line.recipe_id)
                .or_default()
                .push((line, ingredient));
        }
        Ok(grouped)
    }

    /// Loads `(recipe_id, tag_id)` pairs of one tag axis for the given recipes.
    pub async fn tag_links(
        &self,
        kind: TagKind,
        recipe_ids: &[i32],
    ) -> anyhow::Result<Vec<(i32, i32)>> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = recipe_ids.iter().copied();
        let links = match kind {
            TagKind::Diet => RecipeDiets::find()
                .filter(recipe_diets::Column::RecipeId.is_in(ids))
                .all(&self.conn)
                .await?
                .into_iter()
                .map(|l| (l.recipe_id, l.diet_id))
                .collect(),
            TagKind::MealType => RecipeMealTypes::find()
                .filter(recipe_meal_types::Column::RecipeId.is_in(ids))
                .all(&self.conn)
                .await?
                .into_iter()
                .map(|l| (l.recipe_id, l.meal_type_id))
                .collect(),
            TagKind::Kitchen => RecipeKitchens::find()
                .filter(recipe_kitchens::Column::RecipeId.is_in(ids))
                .all(&self.conn)
                .await?
                .into_iter()
                .map(|l| (l.recipe_id, l.kitchen_id))
                .collect(),
        };
        Ok(links)
    }

    /// Bumps the view counter. Returns `false` when the recipe does not exist.
    pub async fn increment_views(&self, id: i32) -> anyhow::Result<bool> {
        let result = Recipes::update_many()
            .col_expr(
                recipes::Column::Viewed,
                Expr::col(recipes::Column::Viewed).add(1),
            )
            .filter(recipes::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn most_viewed(&self, lang: &str, limit: u64) -> anyhow::Result<Vec<recipes::Model>> {
        let rows = Recipes::find()
            .filter(recipes::Column::Lang.eq(lang))
            .order_by_desc(recipes::Column::Viewed)
            .order_by_asc(recipes::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }
}
