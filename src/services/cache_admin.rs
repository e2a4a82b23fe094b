//! Administrative cache control.

use crate::cache::{CacheError, CacheStats, QueryCache};
use crate::constants::prefix;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    Stats,
    ClearRecipes,
    ClearIngredients,
    ClearTags,
    ClearIngredientStats,
    ClearRecipeCounts,
    ClearAll,
    FlushAll,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheActionError {
    #[error("Unknown cache action: {0}")]
    UnknownAction(String),
}

impl CacheAction {
    pub const ALL: [Self; 8] = [
        Self::Stats,
        Self::ClearRecipes,
        Self::ClearIngredients,
        Self::ClearTags,
        Self::ClearIngredientStats,
        Self::ClearRecipeCounts,
        Self::ClearAll,
        Self::FlushAll,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stats => "stats",
            Self::ClearRecipes => "clear-recipes",
            Self::ClearIngredients => "clear-ingredients",
            Self::ClearTags => "clear-tags",
            Self::ClearIngredientStats => "clear-ingredient-stats",
            Self::ClearRecipeCounts => "clear-recipe-counts",
            Self::ClearAll => "clear-all",
            Self::FlushAll => "flush-all",
        }
    }

    /// Key prefixes removed by a scoped clear. Empty for the other actions.
    #[must_use]
    pub const fn prefixes(self) -> &'static [&'static str] {
        match self {
            Self::ClearRecipes => &[prefix::RECIPES, prefix::RECIPE, prefix::POPULAR_RECIPES],
            Self::ClearIngredients => &[prefix::CATEGORIES, prefix::GROUPED_INGREDIENTS],
            Self::ClearTags => &[prefix::TAGS],
            Self::ClearIngredientStats => &[prefix::INGREDIENT_STATS],
            Self::ClearRecipeCounts => &[prefix::RECIPE_COUNT],
            Self::Stats | Self::ClearAll | Self::FlushAll => &[],
        }
    }
}

impl fmt::Display for CacheAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheAction {
    type Err = CacheActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CacheActionError::UnknownAction(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum CacheActionOutcome {
    Stats(CacheStats),
    Cleared { action: String, keys: u64 },
    Flushed { success: bool },
}

pub struct CacheAdmin {
    cache: Arc<QueryCache>,
}

impl CacheAdmin {
    #[must_use]
    pub const fn new(cache: Arc<QueryCache>) -> Self {
        Self { cache }
    }

    /// Runs one admin action. Backend errors are returned, not swallowed.
    pub async fn run(&self, action: CacheAction) -> Result<CacheActionOutcome, CacheError> {
        let outcome = match action {
            CacheAction::Stats => CacheActionOutcome::Stats(self.cache.stats().await?),
            CacheAction::ClearAll => CacheActionOutcome::Cleared {
                action: action.to_string(),
                keys: self.cache.clear_all().await?,
            },
            CacheAction::FlushAll => {
                self.cache.flush().await?;
                CacheActionOutcome::Flushed { success: true }
            }
            scoped => {
                let mut keys = 0;
                for prefix in scoped.prefixes() {
                    keys += self.cache.clear_prefix(prefix).await?;
                }
                CacheActionOutcome::Cleared {
                    action: scoped.to_string(),
                    keys,
                }
            }
        };

        info!(%action, ?outcome, "Cache action completed");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions() {
        for action in CacheAction::ALL {
            assert_eq!(action.as_str().parse::<CacheAction>(), Ok(action));
        }
        assert_eq!(" Clear-Tags ".parse::<CacheAction>(), Ok(CacheAction::ClearTags));
        assert_eq!(
            "drop-everything".parse::<CacheAction>(),
            Err(CacheActionError::UnknownAction("drop-everything".to_string()))
        );
    }

    #[test]
    fn test_scoped_prefixes() {
        assert_eq!(
            CacheAction::ClearRecipes.prefixes(),
            &["recipes:", "recipe:", "popular_recipes:"]
        );
        assert!(CacheAction::ClearAll.prefixes().is_empty());
        assert!(CacheAction::Stats.prefixes().is_empty());
    }
}
