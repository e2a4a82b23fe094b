pub mod ingredient;
pub mod recipe;
pub mod tag;
