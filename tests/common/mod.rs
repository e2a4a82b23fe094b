#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pantry::cache::{CacheBackend, CacheError, CacheStats, MemoryCache};
use pantry::config::Config;
use pantry::db::Store;
use pantry::entities::{
    diets, ingredient_categories, ingredient_category_links, ingredients, kitchens, meal_types,
    recipe_diets, recipe_ingredients, recipe_kitchens, recipe_meal_types, recipes,
};
use pantry::SharedState;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::json;

pub struct Fixture {
    pub state: SharedState,
    pub cache: Arc<MemoryCache>,
}

impl Fixture {
    pub fn store(&self) -> &Store {
        &self.state.store
    }
}

pub async fn fixture() -> Fixture {
    let store = Store::in_memory().await.expect("in-memory store");
    let cache = Arc::new(MemoryCache::new());
    let state = SharedState::new(store, cache.clone(), Config::default());
    Fixture { state, cache }
}

/// Fixture whose connection counts every statement it executes.
pub async fn counting_fixture() -> (Fixture, Arc<AtomicUsize>) {
    let mut store = Store::in_memory().await.expect("in-memory store");
    let statements = Arc::new(AtomicUsize::new(0));
    let counter = statements.clone();
    store.conn.set_metric_callback(move |_info| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let cache = Arc::new(MemoryCache::new());
    let state = SharedState::new(store, cache.clone(), Config::default());
    (Fixture { state, cache }, statements)
}

/// Engine over a cache backend that rejects every call.
pub async fn failing_fixture() -> SharedState {
    let store = Store::in_memory().await.expect("in-memory store");
    SharedState::new(store, Arc::new(FailingCache), Config::default())
}

pub struct FailingCache;

fn down() -> CacheError {
    CacheError::Backend("connection refused".to_string())
}

#[async_trait::async_trait]
impl CacheBackend for FailingCache {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(down())
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<(), CacheError> {
        Err(down())
    }

    async fn del(&self, _keys: &[String]) -> Result<u64, CacheError> {
        Err(down())
    }

    async fn clear_prefix(&self, _prefix: &str) -> Result<u64, CacheError> {
        Err(down())
    }

    async fn flush(&self) -> Result<(), CacheError> {
        Err(down())
    }

    async fn stats(&self) -> Result<CacheStats, CacheError> {
        Err(down())
    }
}

pub async fn recipe(store: &Store, id: i32, title: &str, lang: &str) {
    recipes::ActiveModel {
        id: Set(id),
        title: Set(title.to_string()),
        description: Set(Some(format!("{title} description"))),
        prep_time: Set(Some(30)),
        rating: Set(Some(4)),
        difficulty: Set(Some("easy".to_string())),
        image_url: Set(None),
        instructions: Set(Some(json!(["Prepare", "Cook"]))),
        lang: Set(lang.to_string()),
        source_url: Set(None),
        viewed: Set(0),
        created_at: Set(None),
    }
    .insert(&store.conn)
    .await
    .expect("insert recipe");
}

pub async fn ingredient(store: &Store, id: i32, name: &str, lang: &str) {
    let mut names = serde_json::Map::new();
    names.insert(lang.to_string(), json!(name));

    ingredients::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        language: Set(lang.to_string()),
        names: Set(Some(serde_json::Value::Object(names))),
        is_active: Set(true),
        nutritional_data: Set(None),
        created_at: Set(None),
    }
    .insert(&store.conn)
    .await
    .expect("insert ingredient");
}

/// Adds one ingredient line per entry; `None` is an unmatched line.
pub async fn lines(store: &Store, recipe_id: i32, ingredient_ids: &[Option<i32>]) {
    for ingredient_id in ingredient_ids {
        recipe_ingredients::ActiveModel {
            recipe_id: Set(recipe_id),
            ingredient_id: Set(*ingredient_id),
            line: Set(ingredient_id.map_or_else(
                || "a pinch of something".to_string(),
                |id| format!("ingredient {id}"),
            )),
            amount: Set(Some("1".to_string())),
            required: Set(true),
            ..Default::default()
        }
        .insert(&store.conn)
        .await
        .expect("insert recipe ingredient");
    }
}

/// Recipe with fully matched lines for `ingredient_ids`.
pub async fn recipe_with(store: &Store, id: i32, title: &str, ingredient_ids: &[i32]) {
    recipe(store, id, title, "en").await;
    let ids: Vec<Option<i32>> = ingredient_ids.iter().copied().map(Some).collect();
    lines(store, id, &ids).await;
}

/// Ingredients 1..=n named `ingredient-<id>`.
pub async fn ingredients_upto(store: &Store, n: i32) {
    for id in 1..=n {
        ingredient(store, id, &format!("ingredient-{id}"), "en").await;
    }
}

pub async fn diet(store: &Store, id: i32, name: &str) {
    diets::ActiveModel {
        id: Set(id),
        kind: Set("diet".to_string()),
        tag: Set(format!("diet-{id}")),
        slug: Set(name.to_lowercase()),
        name: Set(name.to_string()),
        created_at: Set(None),
    }
    .insert(&store.conn)
    .await
    .expect("insert diet");
}

pub async fn meal_type(store: &Store, id: i32, name: &str) {
    meal_types::ActiveModel {
        id: Set(id),
        kind: Set("meal_type".to_string()),
        tag: Set(format!("meal-{id}")),
        slug: Set(name.to_lowercase()),
        name: Set(name.to_string()),
        created_at: Set(None),
    }
    .insert(&store.conn)
    .await
    .expect("insert meal type");
}

pub async fn kitchen(store: &Store, id: i32, name: &str) {
    kitchens::ActiveModel {
        id: Set(id),
        kind: Set("kitchen".to_string()),
        tag: Set(format!("kitchen-{id}")),
        slug: Set(name.to_lowercase()),
        name: Set(name.to_string()),
        created_at: Set(None),
    }
    .insert(&store.conn)
    .await
    .expect("insert kitchen");
}

pub async fn link_diet(store: &Store, recipe_id: i32, diet_id: i32) {
    recipe_diets::Entity::insert(recipe_diets::ActiveModel {
        recipe_id: Set(recipe_id),
        diet_id: Set(diet_id),
    })
    .exec_without_returning(&store.conn)
    .await
    .expect("link diet");
}

pub async fn link_meal_type(store: &Store, recipe_id: i32, meal_type_id: i32) {
    recipe_meal_types::Entity::insert(recipe_meal_types::ActiveModel {
        recipe_id: Set(recipe_id),
        meal_type_id: Set(meal_type_id),
    })
    .exec_without_returning(&store.conn)
    .await
    .expect("link meal type");
}

pub async fn link_kitchen(store: &Store, recipe_id: i32, kitchen_id: i32) {
    recipe_kitchens::Entity::insert(recipe_kitchens::ActiveModel {
        recipe_id: Set(recipe_id),
        kitchen_id: Set(kitchen_id),
    })
    .exec_without_returning(&store.conn)
    .await
    .expect("link kitchen");
}

pub async fn category(store: &Store, id: i32, names: serde_json::Value, sort_order: i32) {
    ingredient_categories::ActiveModel {
        id: Set(id),
        external_id: Set(id * 100),
        names: Set(names),
        icon: Set(None),
        is_active: Set(true),
        sort_order: Set(sort_order),
    }
    .insert(&store.conn)
    .await
    .expect("insert category");
}

pub async fn categorize(store: &Store, ingredient_id: i32, category_id: i32) {
    ingredient_category_links::Entity::insert(ingredient_category_links::ActiveModel {
        ingredient_id: Set(ingredient_id),
        category_id: Set(category_id),
    })
    .exec_without_returning(&store.conn)
    .await
    .expect("categorize ingredient");
}
