use sea_orm::{ConnectionTrait, TransactionSession, TransactionTrait};
use tracing::instrument;

use super::{
    IngredientStore, NewIngredient, NewRecipe, Recipe, RecipeChanges, RecipeError, RecipeStore,
    Result,
};

/// Business rules for recipes. Every check here runs before the first write.
pub struct RecipeService<'a, C: ConnectionTrait + TransactionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait + TransactionTrait> RecipeService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    fn store(&self) -> RecipeStore<'a, C> {
        RecipeStore::new(self.conn)
    }

    pub async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        self.store().list().await
    }

    pub async fn get_recipe(&self, id: i32) -> Result<Option<Recipe>> {
        self.store().get_by_id(id).await
    }

    #[instrument(skip(self, data), fields(name = %data.name))]
    pub async fn create_recipe(&self, data: NewRecipe) -> Result<Recipe> {
        let name = validate_name(&data.name)?.to_string();
        if let Some(ref ingredients) = data.ingredients {
            validate_ingredients(ingredients)?;
        }
        if self.store().find_by_name(&name).await?.is_some() {
            return Err(RecipeError::DuplicateName);
        }

        let recipe = self.store().create(&NewRecipe { name, ..data }).await?;
        tracing::info!(id = recipe.id, "Recipe created");
        Ok(recipe)
    }

    /// Returns `None` if the recipe does not exist.
    #[instrument(skip(self, changes))]
    pub async fn update_recipe(
        &self,
        id: i32,
        mut changes: RecipeChanges,
    ) -> Result<Option<Recipe>> {
        let Some(existing) = self.store().get_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(ref name) = changes.name {
            let name = validate_name(name)?.to_string();
            if name != existing.name
                && let Some(other) = self.store().find_by_name(&name).await?
                && other.id != id
            {
                return Err(RecipeError::DuplicateName);
            }
            changes.name = Some(name);
        }
        if let Some(ref ingredients) = changes.ingredients {
            validate_ingredients(ingredients)?;
        }

        self.store().update(id, &changes).await
    }

    #[instrument(skip(self))]
    pub async fn delete_recipe(&self, id: i32) -> Result<bool> {
        self.store().delete(id).await
    }

    /// Append one ingredient and return the refreshed aggregate.
    #[instrument(skip(self, ingredient))]
    pub async fn add_recipe_ingredient(
        &self,
        recipe_id: i32,
        ingredient: NewIngredient,
    ) -> Result<Recipe> {
        self.require_recipe(recipe_id).await?;
        if ingredient.product_name().is_none() {
            return Err(RecipeError::Validation(
                "Ingredient must have a product name".into(),
            ));
        }

        let txn = self.conn.begin().await?;
        IngredientStore::new(&txn).add(recipe_id, &ingredient).await?;
        RecipeStore::new(&txn).touch(recipe_id).await?;
        txn.commit().await?;

        self.require_recipe(recipe_id).await
    }

    /// Remove one ingredient from the recipe. An ingredient id that does not
    /// belong to the recipe leaves it unchanged.
    #[instrument(skip(self))]
    pub async fn remove_recipe_ingredient(
        &self,
        recipe_id: i32,
        ingredient_id: i32,
    ) -> Result<Recipe> {
        self.require_recipe(recipe_id).await?;

        let txn = self.conn.begin().await?;
        let removed = IngredientStore::new(&txn)
            .remove(ingredient_id, recipe_id)
            .await?;
        if removed {
            RecipeStore::new(&txn).touch(recipe_id).await?;
        }
        txn.commit().await?;

        self.require_recipe(recipe_id).await
    }

    async fn require_recipe(&self, id: i32) -> Result<Recipe> {
        self.store()
            .get_by_id(id)
            .await?
            .ok_or_else(|| RecipeError::NotFound("Recipe not found".into()))
    }
}

/// Recipe name exactly as given; blank names are rejected.
pub fn validate_name(name: &str) -> Result<&str> {
    if name.trim().is_empty() {
        return Err(RecipeError::Validation("Recipe name is required".into()));
    }
    Ok(name)
}

/// A supplied ingredient list must be non-empty and every entry needs a
/// product name. Reports the first offender, counting from 1.
pub fn validate_ingredients(ingredients: &[NewIngredient]) -> Result<()> {
    if ingredients.is_empty() {
        return Err(RecipeError::Validation(
            "Recipe must have at least one ingredient".into(),
        ));
    }
    if let Some(index) = ingredients.iter().position(|i| i.product_name().is_none()) {
        return Err(RecipeError::Validation(format!(
            "Ingredient {} must have a product name",
            index + 1
        )));
    }
    Ok(())
}
