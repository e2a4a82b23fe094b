use crate::entities::{ingredient_categories, ingredients, prelude::*, recipe_ingredients};
use crate::models::ingredient::{
    Category, IngredientGroup, IngredientSummary, PopularIngredient, resolve_name,
};
use sea_orm::sea_query::{
    Alias, Expr, Func, IntoColumnRef, LikeExpr, Order, Query, SimpleExpr,
};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, QuerySelect,
};

#[derive(Debug, FromQueryResult)]
struct PopularRow {
    id: i32,
    name: String,
    names: Option<serde_json::Value>,
    recipe_count: i64,
}

pub struct IngredientRepository {
    conn: DatabaseConnection,
}

impl IngredientRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn to_category(model: &ingredient_categories::Model, lang: &str) -> Category {
        Category {
            id: model.id,
            name: resolve_name(Some(&model.names), lang, ""),
            icon: model.icon.clone(),
            sort_order: model.sort_order,
        }
    }

    fn to_summary(model: &ingredients::Model, lang: &str) -> IngredientSummary {
        IngredientSummary {
            id: model.id,
            name: resolve_name(model.names.as_ref(), lang, &model.name),
        }
    }

    pub async fn categories(&self, lang: &str) -> anyhow::Result<Vec<Category>> {
        let rows = IngredientCategories::find()
            .filter(ingredient_categories::Column::IsActive.eq(true))
            .order_by_asc(ingredient_categories::Column::SortOrder)
            .order_by_asc(ingredient_categories::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.iter().map(|c| Self::to_category(c, lang)).collect())
    }

    /// Category tree of active ingredients in `lang`, from one joined query.
    pub async fn grouped(&self, lang: &str) -> anyhow::Result<Vec<IngredientGroup>> {
        let rows = IngredientCategories::find()
            .find_with_related(Ingredients)
            .filter(ingredient_categories::Column::IsActive.eq(true))
            .filter(ingredients::Column::IsActive.eq(true))
            .filter(ingredients::Column::Language.eq(lang))
            .order_by_asc(ingredient_categories::Column::SortOrder)
            .order_by_asc(ingredient_categories::Column::Id)
            .order_by_asc(ingredients::Column::Name)
            .all(&self.conn)
            .await?;

        // Results come back grouped by category id; reapply the display order.
        let mut groups: Vec<IngredientGroup> = rows
            .into_iter()
            .map(|(category, mut members)| {
                members.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
                IngredientGroup {
                    category: Self::to_category(&category, lang),
                    ingredients: members.iter().map(|i| Self::to_summary(i, lang)).collect(),
                }
            })
            .collect();
        groups.sort_by_key(|g| (g.category.sort_order, g.category.id));

        Ok(groups)
    }

    /// Case-insensitive substring search over active ingredient names.
    pub async fn search(
        &self,
        query: &str,
        lang: &str,
        limit: u64,
    ) -> anyhow::Result<Vec<IngredientSummary>> {
        let rows = Ingredients::find()
            .filter(ingredients::Column::Language.eq(lang))
            .filter(ingredients::Column::IsActive.eq(true))
            .filter(contains_ignoring_case(
                ingredients::Column::Name,
                &query.trim().to_lowercase(),
            ))
            .order_by_asc(ingredients::Column::Name)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(rows.iter().map(|i| Self::to_summary(i, lang)).collect())
    }

    /// Ingredients of `lang` ranked by how many recipes use them.
    pub async fn popular(&self, lang: &str, limit: u64) -> anyhow::Result<Vec<PopularIngredient>> {
        let recipe_count = Alias::new("recipe_count");

        let stmt = Query::select()
            .column((ingredients::Entity, ingredients::Column::Id))
            .column((ingredients::Entity, ingredients::Column::Name))
            .column((ingredients::Entity, ingredients::Column::Names))
            .expr_as(
                Func::count(Expr::col((
                    recipe_ingredients::Entity,
                    recipe_ingredients::Column::RecipeId,
                ))),
                recipe_count.clone(),
            )
            .from(ingredients::Entity)
            .inner_join(
                recipe_ingredients::Entity,
                Expr::col((
                    recipe_ingredients::Entity,
                    recipe_ingredients::Column::IngredientId,
                ))
                .equals((ingredients::Entity, ingredients::Column::Id)),
            )
            .and_where(Expr::col((ingredients::Entity, ingredients::Column::Language)).eq(lang))
            .and_where(Expr::col((ingredients::Entity, ingredients::Column::IsActive)).eq(true))
            .group_by_col((ingredients::Entity, ingredients::Column::Id))
            .order_by(recipe_count, Order::Desc)
            .order_by((ingredients::Entity, ingredients::Column::Id), Order::Asc)
            .limit(limit)
            .to_owned();

        let backend = self.conn.get_database_backend();
        let rows = PopularRow::find_by_statement(backend.build(&stmt))
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| PopularIngredient {
                id: row.id,
                name: resolve_name(row.names.as_ref(), lang, &row.name),
                recipe_count: row.recipe_count,
            })
            .collect())
    }
}

/// Escapes LIKE wildcards so user text matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Casings of already lower-cased text tried against the raw column.
///
/// SQLite's `lower()` and `LIKE` only fold ASCII, so non-ASCII titles are
/// matched through these spellings instead. All of them derive from the
/// lower-cased text so equal cache keys always mean equal predicates.
fn case_variants(lowered: &str) -> Vec<String> {
    let words = lowered
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    let mut variants = vec![
        lowered.to_string(),
        capitalize(lowered),
        words,
        lowered.to_uppercase(),
    ];
    variants.sort();
    variants.dedup();
    variants
}

fn like_contains(expr: SimpleExpr, text: &str) -> SimpleExpr {
    Expr::expr(expr).like(LikeExpr::new(format!("%{}%", escape_like(text))).escape('\\'))
}

/// Case-insensitive substring match of `column` against `lowered`.
pub fn contains_ignoring_case<C>(column: C, lowered: &str) -> Condition
where
    C: IntoColumnRef + Copy,
{
    case_variants(lowered).iter().fold(
        Condition::any().add(like_contains(Func::lower(Expr::col(column)).into(), lowered)),
        |condition, variant| condition.add(like_contains(Expr::col(column).into(), variant)),
    )
}
