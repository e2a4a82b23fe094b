//! Recipe listing and detail operations.
//!
//! Callers hand in already-parsed parameters and get typed results back;
//! [`RecipeError`] separates caller mistakes from transient failures.

use crate::domain::RecipeId;
use crate::models::recipe::{Recipe, RecipeCard, RecipePage};
use crate::models::tag::Tag;
use crate::services::filter::RecipeQuery;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Recipe not found: {0}")]
    NotFound(RecipeId),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl RecipeError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether retrying the same call later could succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Timeout(_))
    }

    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<sea_orm::DbErr> for RecipeError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for RecipeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Domain service for recipe queries.
///
/// # Examples
///
/// ```rust,ignore
/// use pantry::services::{RecipeQuery, RecipeService};
///
/// async fn example(service: &dyn RecipeService) {
///     let page = service
///         .list_recipes(&RecipeQuery {
///             ingredient_ids: vec![1, 2, 3],
///             language: "en".into(),
///             ..RecipeQuery::default()
///         })
///         .await;
/// }
/// ```
#[async_trait::async_trait]
pub trait RecipeService: Send + Sync {
    /// Lists recipes for a filter combination, scored when ingredient ids
    /// were supplied.
    ///
    /// # Errors
    ///
    /// - [`RecipeError::Validation`] for a missing language, before any I/O
    /// - [`RecipeError::Database`] / [`RecipeError::Timeout`] on store failures
    async fn list_recipes(&self, query: &RecipeQuery) -> Result<RecipePage, RecipeError>;

    /// Fetches one recipe scored against `ingredient_ids` and bumps its view
    /// counter.
    ///
    /// # Errors
    ///
    /// - [`RecipeError::NotFound`] if the recipe does not exist
    async fn get_recipe(
        &self,
        id: RecipeId,
        ingredient_ids: &[i32],
    ) -> Result<RecipeCard, RecipeError>;

    /// Most viewed recipes of a language.
    async fn popular_recipes(&self, lang: &str, limit: u64) -> Result<Vec<Recipe>, RecipeError>;

    /// Every diet, meal-type and kitchen tag.
    async fn all_tags(&self) -> Result<Vec<Tag>, RecipeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(RecipeError::validation("lang").is_validation());
        assert!(RecipeError::Timeout(Duration::from_millis(5)).is_transient());
        assert!(RecipeError::Database("gone".into()).is_transient());
        assert!(!RecipeError::NotFound(RecipeId::new(1)).is_transient());
        assert!(RecipeError::NotFound(RecipeId::new(1)).is_not_found());
    }

    #[test]
    fn test_anyhow_context_is_kept() {
        let err: RecipeError = anyhow::anyhow!("connection reset")
            .context("Failed to count recipes")
            .into();
        assert_eq!(
            err.to_string(),
            "Database error: Failed to count recipes: connection reset"
        );
    }
}
