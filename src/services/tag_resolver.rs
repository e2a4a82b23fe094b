use crate::cache::{CacheKey, QueryCache};
use crate::constants::ttl;
use crate::db::Store;
use crate::domain::TagKind;
use crate::models::tag::Tag;
use crate::services::recipe_service::RecipeError;
use futures::future::try_join_all;
use std::collections::HashMap;
use std::sync::Arc;

/// Tags attached to one recipe, split by axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeTags {
    pub diets: Vec<Tag>,
    pub meal_types: Vec<Tag>,
    pub kitchens: Vec<Tag>,
}

impl RecipeTags {
    fn push(&mut self, tag: Tag) {
        match tag.kind {
            TagKind::Diet => self.diets.push(tag),
            TagKind::MealType => self.meal_types.push(tag),
            TagKind::Kitchen => self.kitchens.push(tag),
        }
    }
}

/// Serves the near-static diet / meal-type / kitchen reference rows from one
/// cache entry and resolves recipe tag links against it.
pub struct TagResolver {
    store: Arc<Store>,
    cache: Arc<QueryCache>,
}

impl TagResolver {
    #[must_use]
    pub const fn new(store: Arc<Store>, cache: Arc<QueryCache>) -> Self {
        Self { store, cache }
    }

    pub async fn all(&self) -> Result<Vec<Tag>, RecipeError> {
        let store = &self.store;
        self.cache
            .get_or_compute("tags", &CacheKey::all_tags(), ttl::TAGS, move || async move {
                store.list_tags().await.map_err(RecipeError::from)
            })
            .await
    }

    /// Tags for each of `recipe_ids`: one link query per axis, display data
    /// from the cached tag list.
    pub async fn tags_for(
        &self,
        recipe_ids: &[i32],
    ) -> Result<HashMap<i32, RecipeTags>, RecipeError> {
        if recipe_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let index: HashMap<(TagKind, i32), Tag> = self
            .all()
            .await?
            .into_iter()
            .map(|tag| ((tag.kind, tag.id), tag))
            .collect();

        let links = try_join_all(TagKind::ALL.into_iter().map(|kind| async move {
            self.store
                .tag_links(kind, recipe_ids)
                .await
                .map(|pairs| (kind, pairs))
        }))
        .await?;

        let mut by_recipe: HashMap<i32, RecipeTags> = HashMap::new();
        for (kind, pairs) in links {
            for (recipe_id, tag_id) in pairs {
                if let Some(tag) = index.get(&(kind, tag_id)) {
                    by_recipe.entry(recipe_id).or_default().push(tag.clone());
                }
            }
        }

        for tags in by_recipe.values_mut() {
            tags.diets.sort_by_key(|t| t.id);
            tags.meal_types.sort_by_key(|t| t.id);
            tags.kitchens.sort_by_key(|t| t.id);
        }

        Ok(by_recipe)
    }
}
