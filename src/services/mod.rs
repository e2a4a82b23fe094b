pub mod assembler;
pub mod cache_admin;
pub mod count;
pub mod filter;
pub mod scoring;
pub mod tag_resolver;

pub use assembler::RecipeAssembler;
pub use cache_admin::{CacheAction, CacheActionError, CacheActionOutcome, CacheAdmin};
pub use count::CountEstimator;
pub use filter::{FilterSet, RecipeQuery, SearchMode, language_code, parse_id_list};
pub use scoring::MatchScore;
pub use tag_resolver::{RecipeTags, TagResolver};

pub mod recipe_service;
pub mod recipe_service_impl;
pub use recipe_service::{RecipeError, RecipeService};
pub use recipe_service_impl::SeaOrmRecipeService;

pub mod ingredient_service;
pub use ingredient_service::IngredientCatalog;

pub mod saved_service;
pub mod saved_service_impl;
pub use saved_service::SavedRecipeService;
pub use saved_service_impl::SeaOrmSavedRecipeService;
