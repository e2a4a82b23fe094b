//! Listing totals, cached apart from the listings themselves.
//!
//! Without ingredients the total is every recipe passing the filter. With
//! ingredients it is only the recipes the caller can make completely, even
//! though the listing also pages through partial matches.

use crate::cache::QueryCache;
use crate::constants::ttl;
use crate::db::Store;
use crate::services::filter::{FilterSet, run_with_search_fallback};
use crate::services::recipe_service::RecipeError;
use std::sync::Arc;

pub struct CountEstimator {
    store: Arc<Store>,
    cache: Arc<QueryCache>,
}

impl CountEstimator {
    #[must_use]
    pub const fn new(store: Arc<Store>, cache: Arc<QueryCache>) -> Self {
        Self { store, cache }
    }

    pub async fn total(&self, filter: &FilterSet) -> Result<u64, RecipeError> {
        let store: &Store = &self.store;
        let backend = store.backend();

        if filter.is_scored() {
            let ids = filter.ingredient_ids.as_slice();
            self.cache
                .get_or_compute(
                    "recipe_count",
                    &filter.count_key(),
                    ttl::MATCH_COUNT,
                    move || async move {
                        run_with_search_fallback(filter, backend, move |condition| {
                            store.count_perfect_matches(condition, ids)
                        })
                        .await
                        .map_err(RecipeError::from)
                    },
                )
                .await
        } else {
            self.cache
                .get_or_compute(
                    "recipe_count",
                    &filter.count_key(),
                    ttl::PLAIN_COUNT,
                    move || async move {
                        run_with_search_fallback(filter, backend, move |condition| {
                            store.count_recipes(condition)
                        })
                        .await
                        .map_err(RecipeError::from)
                    },
                )
                .await
        }
    }
}
