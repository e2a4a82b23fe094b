pub mod ingredient;
pub mod recipe;
pub mod saved;
pub mod tag;
