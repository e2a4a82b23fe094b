use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientSummary {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub icon: Option<String>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientGroup {
    pub category: Category,
    pub ingredients: Vec<IngredientSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularIngredient {
    pub id: i32,
    pub name: String,
    pub recipe_count: i64,
}

/// Picks the display name for `lang` from a JSON translation map.
///
/// Falls back to English, then to any translation, then to `fallback`.
#[must_use]
pub fn resolve_name(names: Option<&serde_json::Value>, lang: &str, fallback: &str) -> String {
    let Some(map) = names.and_then(serde_json::Value::as_object) else {
        return fallback.to_string();
    };

    [lang, crate::constants::DEFAULT_LANGUAGE]
        .iter()
        .find_map(|key| map.get(*key).and_then(serde_json::Value::as_str))
        .or_else(|| map.values().find_map(serde_json::Value::as_str))
        .filter(|name| !name.is_empty())
        .map_or_else(|| fallback.to_string(), ToString::to_string)
}
