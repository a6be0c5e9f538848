use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::api_key::RequireApiKey;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::recipe::*;
use crate::recipe::RecipeService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/recipes",
    tag = "Recipes",
    operation_id = "listRecipes",
    summary = "List all recipes",
    description = "Returns every recipe ordered by ID, each with its ingredients in creation order.",
    responses(
        (status = 200, description = "List of recipes", body = Vec<RecipeResponse>),
        (status = 401, description = "Unauthorized (API_KEY_MISSING, API_KEY_INVALID)", body = ErrorBody),
    ),
    security(("api_key" = [])),
)]
#[instrument(skip(_key, state))]
pub async fn list_recipes(
    _key: RequireApiKey,
    State(state): State<AppState>,
) -> Result<Json<Vec<RecipeResponse>>, AppError> {
    let recipes = RecipeService::new(&state.db).list_recipes().await?;
    Ok(Json(recipes.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/recipes/{id}",
    tag = "Recipes",
    operation_id = "getRecipe",
    summary = "Get a recipe by ID",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe with ingredients", body = RecipeResponse),
        (status = 401, description = "Unauthorized (API_KEY_MISSING, API_KEY_INVALID)", body = ErrorBody),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("api_key" = [])),
)]
#[instrument(skip(_key, state))]
pub async fn get_recipe(
    _key: RequireApiKey,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<RecipeResponse>, AppError> {
    let recipe = RecipeService::new(&state.db)
        .get_recipe(id)
        .await?
        .ok_or_else(recipe_not_found)?;
    Ok(Json(recipe.into()))
}

#[utoipa::path(
    post,
    path = "/recipes",
    tag = "Recipes",
    operation_id = "createRecipe",
    summary = "Create a recipe with its ingredients",
    description = "Creates a recipe and its ingredients in one transaction. The name must be unique (case-sensitive) and at least one ingredient with a product name is required.",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (API_KEY_MISSING, API_KEY_INVALID)", body = ErrorBody),
        (status = 409, description = "Name already taken (DUPLICATE_NAME)", body = ErrorBody),
    ),
    security(("api_key" = [])),
)]
#[instrument(skip(_key, state, payload), fields(name = ?payload.name))]
pub async fn create_recipe(
    _key: RequireApiKey,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateRecipeRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_recipe(&payload)?;

    let recipe = RecipeService::new(&state.db)
        .create_recipe(payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(RecipeResponse::from(recipe))))
}

#[utoipa::path(
    put,
    path = "/recipes/{id}",
    tag = "Recipes",
    operation_id = "updateRecipe",
    summary = "Update a recipe",
    description = "Partially updates a recipe: omitted fields are left unchanged, `description` and `instructions` may be set to null. A supplied `ingredients` list replaces all existing ingredients and must not be empty.",
    params(("id" = i32, Path, description = "Recipe ID")),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (API_KEY_MISSING, API_KEY_INVALID)", body = ErrorBody),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Name already taken (DUPLICATE_NAME)", body = ErrorBody),
    ),
    security(("api_key" = [])),
)]
#[instrument(skip(_key, state, payload))]
pub async fn update_recipe(
    _key: RequireApiKey,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateRecipeRequest>,
) -> Result<Json<RecipeResponse>, AppError> {
    validate_update_recipe(&payload)?;

    let recipe = RecipeService::new(&state.db)
        .update_recipe(id, payload.into())
        .await?
        .ok_or_else(recipe_not_found)?;

    Ok(Json(recipe.into()))
}

#[utoipa::path(
    delete,
    path = "/recipes/{id}",
    tag = "Recipes",
    operation_id = "deleteRecipe",
    summary = "Delete a recipe",
    description = "Deletes a recipe together with all of its ingredients.",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized (API_KEY_MISSING, API_KEY_INVALID)", body = ErrorBody),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("api_key" = [])),
)]
#[instrument(skip(_key, state))]
pub async fn delete_recipe(
    _key: RequireApiKey,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    if !RecipeService::new(&state.db).delete_recipe(id).await? {
        return Err(recipe_not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/recipes/{id}/ingredients",
    tag = "Recipe Ingredients",
    operation_id = "addRecipeIngredient",
    summary = "Add an ingredient to a recipe",
    description = "Appends one ingredient and returns the updated recipe.",
    params(("id" = i32, Path, description = "Recipe ID")),
    request_body = IngredientRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (API_KEY_MISSING, API_KEY_INVALID)", body = ErrorBody),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("api_key" = [])),
)]
#[instrument(skip(_key, state, payload))]
pub async fn add_recipe_ingredient(
    _key: RequireApiKey,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<IngredientRequest>,
) -> Result<Json<RecipeResponse>, AppError> {
    let recipe = RecipeService::new(&state.db)
        .add_recipe_ingredient(id, payload.into())
        .await?;
    Ok(Json(recipe.into()))
}

#[utoipa::path(
    delete,
    path = "/recipes/{id}/ingredients",
    tag = "Recipe Ingredients",
    operation_id = "removeRecipeIngredient",
    summary = "Remove an ingredient from a recipe",
    description = "Removes the ingredient named by `ingredientId` and returns the updated recipe. An ID that does not belong to the recipe leaves it unchanged.",
    params(("id" = i32, Path, description = "Recipe ID")),
    request_body = RemoveIngredientRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeResponse),
        (status = 400, description = "Missing ingredientId (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (API_KEY_MISSING, API_KEY_INVALID)", body = ErrorBody),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("api_key" = [])),
)]
#[instrument(skip(_key, state, payload))]
pub async fn remove_recipe_ingredient(
    _key: RequireApiKey,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<RemoveIngredientRequest>,
) -> Result<Json<RecipeResponse>, AppError> {
    let ingredient_id = payload
        .ingredient_id
        .ok_or_else(|| AppError::Validation("Ingredient ID is required".into()))?;

    let recipe = RecipeService::new(&state.db)
        .remove_recipe_ingredient(id, ingredient_id)
        .await?;
    Ok(Json(recipe.into()))
}

fn recipe_not_found() -> AppError {
    AppError::NotFound("Recipe not found".into())
}
