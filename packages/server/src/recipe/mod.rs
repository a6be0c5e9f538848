//! Recipe aggregate: a recipe row plus the ingredient rows it owns.
//!
//! Layering, leaves first:
//!
//! * [`ingredient_store`]: row-level access to `recipe_ingredients`, always
//!   scoped to a parent recipe.
//! * [`store`]: reads and writes whole aggregates. Every write runs in one
//!   transaction so readers never see a half-replaced ingredient list.
//! * [`service`]: business rules (required fields, name uniqueness) checked
//!   before anything is written.

pub mod ingredient_store;
pub mod service;
pub mod store;

use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use thiserror::Error;

use crate::entity::{recipe, recipe_ingredient};

pub use ingredient_store::IngredientStore;
pub use service::RecipeService;
pub use store::RecipeStore;

/// Failures surfaced by the recipe stores and service.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("{0}")]
    Validation(String),

    #[error("Recipe with this name already exists")]
    DuplicateName,

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Persistence(#[from] DbErr),
}

pub type Result<T> = std::result::Result<T, RecipeError>;

/// A recipe together with its ingredients, ordered by ascending id.
#[derive(Clone, Debug, PartialEq)]
pub struct Recipe {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ingredients: Vec<recipe_ingredient::Model>,
}

impl Recipe {
    pub(crate) fn from_parts(
        row: recipe::Model,
        ingredients: Vec<recipe_ingredient::Model>,
    ) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            instructions: row.instructions,
            created_at: row.created_at,
            updated_at: row.updated_at,
            ingredients,
        }
    }
}

/// Input for a single ingredient. `product_name` stays optional here so a
/// missing name is reported as a validation error instead of a decode error.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewIngredient {
    pub product_name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub prep_time: Option<i32>,
}

impl NewIngredient {
    pub fn named(product_name: impl Into<String>) -> Self {
        Self {
            product_name: Some(product_name.into()),
            ..Default::default()
        }
    }

    /// The product name as given, or `None` if it is missing or blank.
    pub fn product_name(&self) -> Option<&str> {
        self.product_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewRecipe {
    pub name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub ingredients: Option<Vec<NewIngredient>>,
}

/// Partial update of a recipe.
///
/// * `None`             => leave the field as is
/// * `Some(None)`       => clear a nullable field
/// * `Some(Some(v))`    => set the field to `v` (an empty string included)
///
/// `ingredients: Some(list)` replaces the whole ingredient set, even when
/// `list` is empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecipeChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub instructions: Option<Option<String>>,
    pub ingredients: Option<Vec<NewIngredient>>,
}

impl RecipeChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
