//! Domain primitives for the recipe engine.
//!
//! Identifiers are newtypes so recipe ids and user ids cannot be swapped at a
//! call site.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a recipe.
///
/// # Examples
///
/// ```rust
/// use pantry::domain::RecipeId;
///
/// let id = RecipeId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(i32);

impl RecipeId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for RecipeId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl From<RecipeId> for i32 {
    fn from(id: RecipeId) -> Self {
        id.0
    }
}

/// Identifier of the user owning a saved-recipe list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

/// One of the three independent categorical filter axes.
///
/// Within an axis tag ids are OR'd; across axes they are AND'd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    Diet,
    MealType,
    Kitchen,
}

impl TagKind {
    pub const ALL: [Self; 3] = [Self::Diet, Self::MealType, Self::Kitchen];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Diet => "diet",
            Self::MealType => "meal_type",
            Self::Kitchen => "kitchen",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_id_roundtrip() {
        let id = RecipeId::from(7);
        assert_eq!(i32::from(id), 7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }

    #[test]
    fn test_tag_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TagKind::MealType).unwrap(),
            "\"meal_type\""
        );
        assert_eq!(TagKind::Kitchen.to_string(), "kitchen");
    }
}
