use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::double_option;
use crate::entity::recipe_ingredient;
use crate::error::AppError;
use crate::recipe::{NewIngredient, NewRecipe, Recipe, RecipeChanges};

/// One ingredient in a create/update request.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct IngredientRequest {
    /// Product name (required, non-empty).
    #[schema(example = "Water")]
    pub product_name: Option<String>,
    /// Amount in `unit`.
    #[schema(example = 1.5)]
    pub quantity: Option<f64>,
    #[schema(example = "L")]
    pub unit: Option<String>,
    /// Preparation time in minutes.
    #[schema(example = 5)]
    pub prep_time: Option<i32>,
}

impl From<IngredientRequest> for NewIngredient {
    fn from(req: IngredientRequest) -> Self {
        Self {
            product_name: req.product_name,
            quantity: req.quantity,
            unit: req.unit,
            prep_time: req.prep_time,
        }
    }
}

/// Request body for creating a recipe.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateRecipeRequest {
    /// Unique recipe name (case-sensitive).
    #[schema(example = "Tomato Soup")]
    pub name: Option<String>,
    #[schema(example = "Simple tomato soup")]
    pub description: Option<String>,
    #[schema(example = "Blend tomatoes with cream")]
    pub instructions: Option<String>,
    /// At least one ingredient.
    pub ingredients: Option<Vec<IngredientRequest>>,
}

/// Request body for a partial recipe update.
///
/// Omitted fields are left untouched. `description` and `instructions` may be
/// set to `null` to clear them. A supplied `ingredients` list replaces the
/// current one entirely.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateRecipeRequest {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, example = "Creamy Tomato Soup")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub instructions: Option<Option<String>>,
    pub ingredients: Option<Vec<IngredientRequest>>,
}

/// Request body for removing one ingredient from a recipe.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RemoveIngredientRequest {
    #[serde(rename = "ingredientId", alias = "ingredient_id")]
    #[schema(example = 3)]
    pub ingredient_id: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct IngredientResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Tomatoes")]
    pub product_name: String,
    #[schema(example = 500.0)]
    pub quantity: Option<f64>,
    #[schema(example = "g")]
    pub unit: Option<String>,
    #[schema(example = 15)]
    pub prep_time: Option<i32>,
}

/// A recipe with its ingredients in creation order.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RecipeResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Tomato Soup")]
    pub name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ingredients: Vec<IngredientResponse>,
}

impl From<recipe_ingredient::Model> for IngredientResponse {
    fn from(m: recipe_ingredient::Model) -> Self {
        Self {
            id: m.id,
            product_name: m.product_name,
            quantity: m.quantity,
            unit: m.unit,
            prep_time: m.prep_time,
        }
    }
}

impl From<Recipe> for RecipeResponse {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            instructions: r.instructions,
            created_at: r.created_at,
            updated_at: r.updated_at,
            ingredients: r.ingredients.into_iter().map(Into::into).collect(),
        }
    }
}

/// Checks the HTTP layer adds on top of the recipe service: a name must be
/// present and a new recipe must come with at least one ingredient.
pub fn validate_create_recipe(req: &CreateRecipeRequest) -> Result<(), AppError> {
    if req.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
        return Err(AppError::Validation("Recipe name is required".into()));
    }
    if req.ingredients.as_ref().is_none_or(Vec::is_empty) {
        return Err(AppError::Validation(
            "Recipe must have at least one ingredient".into(),
        ));
    }
    Ok(())
}

pub fn validate_update_recipe(req: &UpdateRecipeRequest) -> Result<(), AppError> {
    if let Some(None) = req.name {
        return Err(AppError::Validation("Recipe name cannot be null".into()));
    }
    Ok(())
}

impl From<CreateRecipeRequest> for NewRecipe {
    fn from(req: CreateRecipeRequest) -> Self {
        Self {
            name: req.name.unwrap_or_default(),
            description: req.description,
            instructions: req.instructions,
            ingredients: req
                .ingredients
                .map(|list| list.into_iter().map(Into::into).collect()),
        }
    }
}

impl From<UpdateRecipeRequest> for RecipeChanges {
    fn from(req: UpdateRecipeRequest) -> Self {
        Self {
            name: req.name.flatten(),
            description: req.description,
            instructions: req.instructions,
            ingredients: req
                .ingredients
                .map(|list| list.into_iter().map(Into::into).collect()),
        }
    }
}
