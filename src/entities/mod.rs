pub mod prelude;

pub mod diets;
pub mod ingredient_categories;
pub mod ingredient_category_links;
pub mod ingredients;
pub mod kitchens;
pub mod meal_types;
pub mod recipe_diets;
pub mod recipe_ingredients;
pub mod recipe_kitchens;
pub mod recipe_meal_types;
pub mod recipes;
pub mod saved_recipes;
