pub mod api_key;
pub mod json;
pub mod path;
