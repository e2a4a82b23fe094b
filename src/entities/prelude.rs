pub use super::diets::Entity as Diets;
pub use super::ingredient_categories::Entity as IngredientCategories;
pub use super::ingredient_category_links::Entity as IngredientCategoryLinks;
pub use super::ingredients::Entity as Ingredients;
pub use super::kitchens::Entity as Kitchens;
pub use super::meal_types::Entity as MealTypes;
pub use super::recipe_diets::Entity as RecipeDiets;
pub use super::recipe_ingredients::Entity as RecipeIngredients;
pub use super::recipe_kitchens::Entity as RecipeKitchens;
pub use super::recipe_meal_types::Entity as RecipeMealTypes;
pub use super::recipes::Entity as Recipes;
pub use super::saved_recipes::Entity as SavedRecipes;
