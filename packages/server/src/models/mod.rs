pub mod meta;
pub mod recipe;
pub mod shared;
pub mod user;
