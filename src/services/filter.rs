//! Turns request parameters into a normalized, composable predicate set.

use crate::cache::keys::{self, CacheKey, TagKeyPart};
use crate::constants::limits;
use crate::db::repositories::ingredient::contains_ignoring_case;
use crate::domain::TagKind;
use crate::entities::{recipe_diets, recipe_kitchens, recipe_meal_types, recipes};
use crate::services::recipe_service::RecipeError;
use metrics::counter;
use sea_orm::sea_query::{Alias, BinOper, Expr, Func, Query, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, DatabaseBackend, EntityTrait};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::debug;

/// Raw listing parameters as handed over by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeQuery {
    pub ingredient_ids: Vec<i32>,
    pub diet_tag_ids: Vec<i32>,
    pub meal_type_ids: Vec<i32>,
    pub kitchen_ids: Vec<i32>,
    pub language: String,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// `to_tsvector('simple', title) @@ plainto_tsquery('simple', q)`, PostgreSQL only.
    FullText,
    /// Case-insensitive title substring.
    Substring,
}

/// Normalized filter: sorted unique id lists, clamped paging, trimmed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    pub language: String,
    pub ingredient_ids: Vec<i32>,
    pub diet_tag_ids: Vec<i32>,
    pub meal_type_ids: Vec<i32>,
    pub kitchen_ids: Vec<i32>,
    pub search: Option<String>,
    pub limit: u64,
    pub offset: u64,
}

fn canonical_ids(ids: &[i32]) -> Vec<i32> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn clamp(value: Option<i64>, default: u64, min: u64, max: u64) -> u64 {
    value.map_or(default, |v| u64::try_from(v).unwrap_or(0).clamp(min, max))
}

impl FilterSet {
    /// Validates and normalizes a query. Fails before any I/O when the
    /// language is missing.
    pub fn assemble(query: &RecipeQuery) -> Result<Self, RecipeError> {
        let language = language_code(&query.language)?;

        let search = Some(keys::search_text(query.search.as_deref())).filter(|s| !s.is_empty());

        Ok(Self {
            language: language.to_string(),
            ingredient_ids: canonical_ids(&query.ingredient_ids),
            diet_tag_ids: canonical_ids(&query.diet_tag_ids),
            meal_type_ids: canonical_ids(&query.meal_type_ids),
            kitchen_ids: canonical_ids(&query.kitchen_ids),
            search,
            limit: clamp(
                query.limit,
                limits::DEFAULT_PAGE_SIZE,
                limits::MIN_PAGE_SIZE,
                limits::MAX_PAGE_SIZE,
            ),
            offset: clamp(query.offset, 0, 0, limits::MAX_OFFSET),
        })
    }

    /// Listings with ingredient ids are ranked by match percentage.
    #[must_use]
    pub fn is_scored(&self) -> bool {
        !self.ingredient_ids.is_empty()
    }

    /// Neither ingredients nor search: the short-lived "plain" listing.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        !self.is_scored() && self.search.is_none()
    }

    #[must_use]
    pub fn tag_ids(&self, kind: TagKind) -> &[i32] {
        match kind {
            TagKind::Diet => &self.diet_tag_ids,
            TagKind::MealType => &self.meal_type_ids,
            TagKind::Kitchen => &self.kitchen_ids,
        }
    }

    /// Rows requested from the store: one more than the page to detect `hasMore`.
    #[must_use]
    pub const fn fetch_size(&self) -> u64 {
        self.limit + 1
    }

    /// Full-text search is only attempted on PostgreSQL.
    #[must_use]
    pub fn uses_full_text(&self, backend: DatabaseBackend) -> bool {
        self.search.is_some() && backend == DatabaseBackend::Postgres
    }

    /// Language, tag axes and search, ANDed together.
    #[must_use]
    pub fn condition(&self, mode: SearchMode) -> Condition {
        let mut condition = Condition::all().add(recipes::Column::Lang.eq(self.language.as_str()));

        for kind in TagKind::ALL {
            let ids = self.tag_ids(kind);
            if !ids.is_empty() {
                condition = condition.add(tag_axis_exists(kind, ids));
            }
        }

        if let Some(search) = &self.search {
            condition = condition.add(search_predicate(search, mode));
        }

        condition
    }

    fn id_parts(&self) -> (String, String, String) {
        (
            keys::id_list(&self.diet_tag_ids),
            keys::id_list(&self.meal_type_ids),
            keys::id_list(&self.kitchen_ids),
        )
    }

    #[must_use]
    pub fn listing_key(&self) -> String {
        let (diet, meal, kitchen) = self.id_parts();
        let tags = TagKeyPart {
            diet: &diet,
            meal: &meal,
            kitchen: &kitchen,
        };

        if self.is_plain() {
            CacheKey::plain_listing(&self.language, self.limit, self.offset, &tags)
        } else {
            CacheKey::filtered_listing(
                &self.language,
                self.limit,
                self.offset,
                &keys::id_list(&self.ingredient_ids),
                &tags,
                &keys::search_text(self.search.as_deref()),
            )
        }
    }

    #[must_use]
    pub fn count_key(&self) -> String {
        let (diet, meal, kitchen) = self.id_parts();
        let tags = TagKeyPart {
            diet: &diet,
            meal: &meal,
            kitchen: &kitchen,
        };
        let search = keys::search_text(self.search.as_deref());

        if self.is_scored() {
            CacheKey::match_count(
                &self.language,
                &keys::id_list(&self.ingredient_ids),
                &tags,
                &search,
            )
        } else {
            CacheKey::plain_count(&self.language, &tags, &search)
        }
    }
}

/// "Some link row for this recipe has a tag id in `ids`".
fn tag_axis_exists(kind: TagKind, ids: &[i32]) -> SimpleExpr {
    match kind {
        TagKind::Diet => link_exists(
            recipe_diets::Entity,
            recipe_diets::Column::RecipeId,
            recipe_diets::Column::DietId,
            ids,
        ),
        TagKind::MealType => link_exists(
            recipe_meal_types::Entity,
            recipe_meal_types::Column::RecipeId,
            recipe_meal_types::Column::MealTypeId,
            ids,
        ),
        TagKind::Kitchen => link_exists(
            recipe_kitchens::Entity,
            recipe_kitchens::Column::RecipeId,
            recipe_kitchens::Column::KitchenId,
            ids,
        ),
    }
}

fn link_exists<E, C>(link: E, recipe_col: C, tag_col: C, ids: &[i32]) -> SimpleExpr
where
    E: EntityTrait + Copy + 'static,
    C: ColumnTrait + Copy + 'static,
{
    Expr::exists(
        Query::select()
            .expr(Expr::val(1))
            .from(link)
            .and_where(Expr::col((link, recipe_col)).equals((recipes::Entity, recipes::Column::Id)))
            .and_where(Expr::col((link, tag_col)).is_in(ids.iter().copied()))
            .to_owned(),
    )
}

fn search_predicate(search: &str, mode: SearchMode) -> Condition {
    let title = (recipes::Entity, recipes::Column::Title);
    match mode {
        SearchMode::FullText => Condition::all().add(
            Expr::expr(
                Func::cust(Alias::new("to_tsvector"))
                    .arg(Expr::cust("'simple'"))
                    .arg(Expr::col(title)),
            )
            .binary(
                BinOper::Custom("@@"),
                Func::cust(Alias::new("plainto_tsquery"))
                    .arg(Expr::cust("'simple'"))
                    .arg(Expr::val(search)),
            ),
        ),
        SearchMode::Substring => contains_ignoring_case(title, search),
    }
}

/// Runs `run` with the full-text condition where available, retrying with the
/// substring condition if the full-text query fails.
pub async fn run_with_search_fallback<T, F, Fut>(
    filter: &FilterSet,
    backend: DatabaseBackend,
    run: F,
) -> anyhow::Result<T>
where
    F: Fn(Condition) -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    if filter.uses_full_text(backend) {
        match run(filter.condition(SearchMode::FullText)).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                debug!(error = %e, "Full-text search failed, retrying as substring match");
                counter!("pantry_search_fallbacks_total").increment(1);
            }
        }
    }
    run(filter.condition(SearchMode::Substring)).await
}

/// Trims and checks a language code such as `en` or `pt-BR`. Codes end up
/// inside `:` separated cache keys, so only ASCII alphanumerics and `-` pass.
pub fn language_code(raw: &str) -> Result<&str, RecipeError> {
    let lang = raw.trim();
    if lang.is_empty() {
        return Err(RecipeError::validation("language is required"));
    }
    if lang.len() > limits::MAX_LANGUAGE_LEN
        || !lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(RecipeError::validation(format!("invalid language: {lang:?}")));
    }
    Ok(lang)
}

/// Splits the `limit + 1` rows fetched from the store into the page and the
/// `hasMore` flag.
#[must_use]
pub fn split_page<T>(mut rows: Vec<T>, limit: u64) -> (Vec<T>, bool) {
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let has_more = rows.len() > limit;
    rows.truncate(limit);
    (rows, has_more)
}

/// Parses a comma separated id list such as `"1, 2,3"`. Empty input yields
/// an empty list; any non-numeric element is a validation error.
pub fn parse_id_list(raw: &str) -> Result<Vec<i32>, RecipeError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i32>()
                .map_err(|_| RecipeError::validation(format!("invalid id: {part:?}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{EntityTrait, QueryFilter, QueryTrait};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn query() -> RecipeQuery {
        RecipeQuery {
            language: "en".to_string(),
            ..RecipeQuery::default()
        }
    }

    #[test]
    fn test_missing_language_is_validation_error() {
        let err = FilterSet::assemble(&RecipeQuery::default()).unwrap_err();
        assert!(err.is_validation());

        let err = FilterSet::assemble(&RecipeQuery {
            language: "  ".into(),
            ..RecipeQuery::default()
        })
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_language_code() {
        assert_eq!(language_code(" ru ").unwrap(), "ru");
        assert_eq!(language_code("pt-BR").unwrap(), "pt-BR");
        assert!(language_code("20:0").unwrap_err().is_validation());
        assert!(language_code("en*").unwrap_err().is_validation());
        assert!(language_code("e n").unwrap_err().is_validation());
        assert!(language_code(&"x".repeat(17)).unwrap_err().is_validation());
    }

    #[test]
    fn test_delimiter_in_language_cannot_forge_a_key() {
        let forged = FilterSet::assemble(&RecipeQuery {
            language: "20:0".to_string(),
            kitchen_ids: vec![5],
            ..RecipeQuery::default()
        });
        assert!(forged.unwrap_err().is_validation());

        let filtered = FilterSet::assemble(&RecipeQuery {
            language: "plain".to_string(),
            ingredient_ids: vec![20],
            diet_tag_ids: vec![0],
            search: Some("5".into()),
            ..RecipeQuery::default()
        })
        .unwrap();
        assert_eq!(filtered.listing_key(), "recipes:plain:20:0:20:0:::5");

        let plain = FilterSet::assemble(&RecipeQuery {
            kitchen_ids: vec![5],
            ..query()
        })
        .unwrap();
        assert_eq!(plain.listing_key().split(':').count(), 8);
        assert!(filtered.listing_key().split(':').count() > 8);
    }

    #[test]
    fn test_paging_is_clamped() {
        let f = FilterSet::assemble(&query()).unwrap();
        assert_eq!((f.limit, f.offset), (20, 0));

        let f = FilterSet::assemble(&RecipeQuery {
            limit: Some(500),
            offset: Some(99_999),
            ..query()
        })
        .unwrap();
        assert_eq!((f.limit, f.offset), (40, 10_000));

        let f = FilterSet::assemble(&RecipeQuery {
            limit: Some(0),
            offset: Some(-5),
            ..query()
        })
        .unwrap();
        assert_eq!((f.limit, f.offset), (1, 0));
        assert_eq!(f.fetch_size(), 2);
    }

    #[test]
    fn test_keys_ignore_array_order() {
        let a = FilterSet::assemble(&RecipeQuery {
            ingredient_ids: vec![3, 1, 2],
            diet_tag_ids: vec![9, 4],
            search: Some(" Pasta  Bake".into()),
            ..query()
        })
        .unwrap();
        let b = FilterSet::assemble(&RecipeQuery {
            ingredient_ids: vec![2, 3, 1, 1],
            diet_tag_ids: vec![4, 9],
            search: Some("pasta bake ".into()),
            ..query()
        })
        .unwrap();

        assert_eq!(a.listing_key(), b.listing_key());
        assert_eq!(a.count_key(), b.count_key());
        assert_eq!(a.listing_key(), "recipes:en:20:0:1,2,3:4,9:::pasta bake");
        assert_eq!(a.count_key(), "recipe_count:match:en:1,2,3:4,9:::pasta bake");
    }

    #[test]
    fn test_plain_keys() {
        let f = FilterSet::assemble(&RecipeQuery {
            kitchen_ids: vec![5],
            ..query()
        })
        .unwrap();
        assert!(f.is_plain());
        assert_eq!(f.listing_key(), "recipes:plain:en:20:0:::5");
        assert_eq!(f.count_key(), "recipe_count:plain:en:::5:");
    }

    #[test]
    fn test_blank_search_is_dropped() {
        let f = FilterSet::assemble(&RecipeQuery {
            search: Some("   ".into()),
            ..query()
        })
        .unwrap();
        assert!(f.search.is_none());
        assert!(f.is_plain());
    }

    #[test]
    fn test_condition_sql_shape() {
        let f = FilterSet::assemble(&RecipeQuery {
            diet_tag_ids: vec![1, 2],
            kitchen_ids: vec![7],
            search: Some("Soup".into()),
            ..query()
        })
        .unwrap();

        let sql = recipes::Entity::find()
            .filter(f.condition(SearchMode::Substring))
            .build(DatabaseBackend::Sqlite)
            .to_string();
        assert!(sql.contains("\"recipes\".\"lang\" = 'en'"));
        assert!(sql.contains("EXISTS"));
        assert!(sql.contains("FROM \"recipe_diets\""));
        assert!(sql.contains("FROM \"recipe_kitchens\""));
        assert!(!sql.contains("recipe_meal_types"));
        assert!(sql.contains("LIKE '%soup%'"));

        let pg = recipes::Entity::find()
            .filter(f.condition(SearchMode::FullText))
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(pg.contains("to_tsvector('simple', \"recipes\".\"title\")"));
        assert!(pg.contains("@@"));
        assert!(pg.contains("plainto_tsquery('simple', 'soup')"));
    }

    #[test]
    fn test_full_text_only_on_postgres() {
        let f = FilterSet::assemble(&RecipeQuery {
            search: Some("soup".into()),
            ..query()
        })
        .unwrap();
        assert!(f.uses_full_text(DatabaseBackend::Postgres));
        assert!(!f.uses_full_text(DatabaseBackend::Sqlite));
    }

    fn searching(text: &str) -> FilterSet {
        FilterSet::assemble(&RecipeQuery {
            search: Some(text.into()),
            ..query()
        })
        .unwrap()
    }

    fn render(condition: Condition) -> String {
        recipes::Entity::find()
            .filter(condition)
            .build(DatabaseBackend::Postgres)
            .to_string()
    }

    #[tokio::test]
    async fn test_failed_full_text_retries_as_substring() {
        let filter = searching("soup");
        let calls = AtomicUsize::new(0);

        let sql = run_with_search_fallback(&filter, DatabaseBackend::Postgres, |condition| {
            calls.fetch_add(1, Ordering::SeqCst);
            let sql = render(condition);
            async move {
                if sql.contains("to_tsvector") {
                    return Err(anyhow::anyhow!("text search configuration \"simple\" does not exist"));
                }
                Ok(sql)
            }
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!sql.contains("to_tsvector"));
        assert!(sql.contains("LIKE '%soup%'"), "{sql}");
    }

    #[tokio::test]
    async fn test_full_text_result_is_kept() {
        let filter = searching("soup");
        let calls = AtomicUsize::new(0);

        let sql = run_with_search_fallback(&filter, DatabaseBackend::Postgres, |condition| {
            calls.fetch_add(1, Ordering::SeqCst);
            let sql = render(condition);
            async move { Ok::<_, anyhow::Error>(sql) }
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(sql.contains("plainto_tsquery"));
    }

    #[tokio::test]
    async fn test_substring_errors_are_not_retried() {
        let filter = searching("soup");
        let calls = AtomicUsize::new(0);

        let result: anyhow::Result<()> =
            run_with_search_fallback(&filter, DatabaseBackend::Sqlite, |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(anyhow::anyhow!("database is locked")) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_split_page() {
        let (page, more) = split_page((0..21).collect::<Vec<_>>(), 20);
        assert_eq!(page.len(), 20);
        assert!(more);

        let (page, more) = split_page(vec![1, 2], 20);
        assert_eq!(page, vec![1, 2]);
        assert!(!more);

        let (page, more) = split_page((0..20).collect::<Vec<_>>(), 20);
        assert_eq!(page.len(), 20);
        assert!(!more);
    }

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("1, 2,3").unwrap(), vec![1, 2, 3]);
        assert!(parse_id_list("").unwrap().is_empty());
        assert!(parse_id_list("1,x").unwrap_err().is_validation());
    }
}
