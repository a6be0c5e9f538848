use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{NewIngredient, RecipeError, Result};
use crate::entity::recipe_ingredient;

/// Upper bound on ids per `IN (...)` list, well below SQLite's bind limit.
const IDS_PER_QUERY: usize = 500;

/// Ingredient rows, always addressed through their owning recipe.
pub struct IngredientStore<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> IngredientStore<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Ingredients of one recipe in creation order.
    pub async fn list_by_recipe(&self, recipe_id: i32) -> Result<Vec<recipe_ingredient::Model>> {
        let rows = recipe_ingredient::Entity::find()
            .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
            .order_by_asc(recipe_ingredient::Column::Id)
            .all(self.conn)
            .await?;
        Ok(rows)
    }

    /// Ingredients of several recipes, grouped by recipe id, one query per
    /// batch of [`IDS_PER_QUERY`] ids. Recipes without ingredients have no
    /// entry in the map.
    pub async fn list_for_recipes(
        &self,
        recipe_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<recipe_ingredient::Model>>> {
        let mut grouped: HashMap<i32, Vec<recipe_ingredient::Model>> = HashMap::new();

        for batch in recipe_ids.chunks(IDS_PER_QUERY) {
            let rows = recipe_ingredient::Entity::find()
                .filter(recipe_ingredient::Column::RecipeId.is_in(batch.iter().copied()))
                .order_by_asc(recipe_ingredient::Column::Id)
                .all(self.conn)
                .await?;

            for row in rows {
                grouped.entry(row.recipe_id).or_default().push(row);
            }
        }
        Ok(grouped)
    }

    pub async fn find(&self, ingredient_id: i32) -> Result<Option<recipe_ingredient::Model>> {
        let row = recipe_ingredient::Entity::find_by_id(ingredient_id)
            .one(self.conn)
            .await?;
        Ok(row)
    }

    /// Insert one ingredient under `recipe_id`. Optional fields that are not
    /// supplied are stored as NULL.
    pub async fn add(
        &self,
        recipe_id: i32,
        ingredient: &NewIngredient,
    ) -> Result<recipe_ingredient::Model> {
        let product_name = ingredient.product_name().ok_or_else(|| {
            RecipeError::Validation("Ingredient must have a product name".into())
        })?;

        let row = recipe_ingredient::ActiveModel {
            recipe_id: Set(recipe_id),
            product_name: Set(product_name.to_string()),
            quantity: Set(ingredient.quantity),
            unit: Set(ingredient.unit.clone()),
            prep_time: Set(ingredient.prep_time),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        Ok(row.insert(self.conn).await?)
    }

    /// Delete the ingredient only if it belongs to `recipe_id`.
    /// Returns whether a row was removed; a non-matching id is a no-op.
    pub async fn remove(&self, ingredient_id: i32, recipe_id: i32) -> Result<bool> {
        let res = recipe_ingredient::Entity::delete_many()
            .filter(recipe_ingredient::Column::Id.eq(ingredient_id))
            .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
            .exec(self.conn)
            .await?;
        Ok(res.rows_affected > 0)
    }

    /// Delete every ingredient of `recipe_id`, returning how many went away.
    pub async fn remove_all_by_recipe(&self, recipe_id: i32) -> Result<u64> {
        let res = recipe_ingredient::Entity::delete_many()
            .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
            .exec(self.conn)
            .await?;
        Ok(res.rows_affected)
    }
}
