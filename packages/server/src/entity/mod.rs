pub mod recipe;
pub mod recipe_ingredient;
pub mod user;
