//! Canonical cache key construction.
//!
//! Array parameters are deduplicated and sorted before they are joined, so two
//! logically equal requests always land on the same key.

use crate::constants::prefix;
use crate::domain::UserId;

/// Deduplicated, ascending, comma-joined id list.
#[must_use]
pub fn id_list(ids: &[i32]) -> String {
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Trimmed, whitespace-collapsed, lower-cased search text.
#[must_use]
pub fn search_text(search: Option<&str>) -> String {
    search
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase())
        .unwrap_or_default()
}

/// Tag id lists of the three axes, already canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagKeyPart<'a> {
    pub diet: &'a str,
    pub meal: &'a str,
    pub kitchen: &'a str,
}

pub struct CacheKey;

impl CacheKey {
    #[must_use]
    pub fn plain_listing(lang: &str, limit: u64, offset: u64, tags: &TagKeyPart<'_>) -> String {
        format!(
            "{}plain:{lang}:{limit}:{offset}:{}:{}:{}",
            prefix::RECIPES,
            tags.diet,
            tags.meal,
            tags.kitchen
        )
    }

    #[must_use]
    pub fn filtered_listing(
        lang: &str,
        limit: u64,
        offset: u64,
        ingredients: &str,
        tags: &TagKeyPart<'_>,
        search: &str,
    ) -> String {
        format!(
            "{}{lang}:{limit}:{offset}:{ingredients}:{}:{}:{}:{search}",
            prefix::RECIPES,
            tags.diet,
            tags.meal,
            tags.kitchen
        )
    }

    #[must_use]
    pub fn plain_count(lang: &str, tags: &TagKeyPart<'_>, search: &str) -> String {
        format!(
            "{}plain:{lang}:{}:{}:{}:{search}",
            prefix::RECIPE_COUNT,
            tags.diet,
            tags.meal,
            tags.kitchen
        )
    }

    #[must_use]
    pub fn match_count(
        lang: &str,
        ingredients: &str,
        tags: &TagKeyPart<'_>,
        search: &str,
    ) -> String {
        format!(
            "{}match:{lang}:{ingredients}:{}:{}:{}:{search}",
            prefix::RECIPE_COUNT,
            tags.diet,
            tags.meal,
            tags.kitchen
        )
    }

    #[must_use]
    pub fn recipe_detail(id: i32, ingredient_ids: &[i32]) -> String {
        format!("{}{id}:{}", prefix::RECIPE, id_list(ingredient_ids))
    }

    #[must_use]
    pub fn all_tags() -> String {
        format!("{}all", prefix::TAGS)
    }

    #[must_use]
    pub fn categories(lang: &str) -> String {
        format!("{}{lang}", prefix::CATEGORIES)
    }

    #[must_use]
    pub fn grouped_ingredients(lang: &str) -> String {
        format!("{}{lang}", prefix::GROUPED_INGREDIENTS)
    }

    #[must_use]
    pub fn popular_recipes(lang: &str, limit: u64) -> String {
        format!("{}{lang}:{limit}", prefix::POPULAR_RECIPES)
    }

    #[must_use]
    pub fn popular_ingredients(lang: &str, limit: u64) -> String {
        format!("{}popular:{lang}:{limit}", prefix::INGREDIENT_STATS)
    }

    #[must_use]
    pub fn saved_recipes(user: UserId, full: bool) -> String {
        if full {
            format!("{}{user}:full", prefix::SAVED_RECIPES)
        } else {
            format!("{}{user}", prefix::SAVED_RECIPES)
        }
    }
}
