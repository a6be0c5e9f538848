use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionSession, TransactionTrait,
};

use super::{IngredientStore, NewRecipe, Recipe, RecipeChanges, RecipeError, Result};
use crate::entity::recipe;

/// Whole-aggregate persistence for recipes.
pub struct RecipeStore<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> RecipeStore<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// All recipes by ascending id, each with its ingredients.
    pub async fn list(&self) -> Result<Vec<Recipe>> {
        let rows = recipe::Entity::find()
            .order_by_asc(recipe::Column::Id)
            .all(self.conn)
            .await?;

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut ingredients = IngredientStore::new(self.conn)
            .list_for_recipes(&ids)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = ingredients.remove(&row.id).unwrap_or_default();
                Recipe::from_parts(row, items)
            })
            .collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Recipe>> {
        match recipe::Entity::find_by_id(id).one(self.conn).await? {
            Some(row) => Ok(Some(self.assemble(row).await?)),
            None => Ok(None),
        }
    }

    /// Exact, case-sensitive lookup by name.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<recipe::Model>> {
        let row = recipe::Entity::find()
            .filter(recipe::Column::Name.eq(name))
            .one(self.conn)
            .await?;
        Ok(row)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(recipe::Entity::find().count(self.conn).await?)
    }

    /// Refresh `updated_at` without touching any other column.
    pub async fn touch(&self, id: i32) -> Result<()> {
        recipe::Entity::update_many()
            .col_expr(
                recipe::Column::UpdatedAt,
                sea_orm::prelude::Expr::value(Utc::now()),
            )
            .filter(recipe::Column::Id.eq(id))
            .exec(self.conn)
            .await?;
        Ok(())
    }

    async fn assemble(&self, row: recipe::Model) -> Result<Recipe> {
        let ingredients = IngredientStore::new(self.conn)
            .list_by_recipe(row.id)
            .await?;
        Ok(Recipe::from_parts(row, ingredients))
    }

    async fn reload(&self, id: i32) -> Result<Recipe> {
        self.get_by_id(id).await?.ok_or_else(|| {
            RecipeError::Persistence(DbErr::RecordNotFound(format!(
                "recipe {id} vanished inside its own transaction"
            )))
        })
    }
}

impl<'a, C: ConnectionTrait + TransactionTrait> RecipeStore<'a, C> {
    /// Insert the recipe and its ingredients (in input order) atomically.
    ///
    /// The UNIQUE constraint on `name` is authoritative: a collision that
    /// slipped past any pre-check surfaces as [`RecipeError::DuplicateName`].
    pub async fn create(&self, data: &NewRecipe) -> Result<Recipe> {
        let txn = self.conn.begin().await?;

        let now = Utc::now();
        let row = recipe::ActiveModel {
            name: Set(data.name.clone()),
            description: Set(data.description.clone()),
            instructions: Set(data.instructions.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(name_conflict)?;

        let ingredients = IngredientStore::new(&txn);
        for ingredient in data.ingredients.iter().flatten() {
            ingredients.add(row.id, ingredient).await?;
        }

        let created = RecipeStore::new(&txn).reload(row.id).await?;
        txn.commit().await?;

        Ok(created)
    }

    /// Apply a partial update. A supplied ingredient list (even an empty one)
    /// replaces the stored set; delete and re-insert share one transaction.
    ///
    /// Returns `None` if the recipe does not exist.
    pub async fn update(&self, id: i32, changes: &RecipeChanges) -> Result<Option<Recipe>> {
        let txn = self.conn.begin().await?;

        let Some(existing) = recipe::Entity::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        if changes.is_empty() {
            return RecipeStore::new(&txn).assemble(existing).await.map(Some);
        }

        let mut active: recipe::ActiveModel = existing.into();
        if let Some(ref name) = changes.name {
            active.name = Set(name.clone());
        }
        if let Some(ref description) = changes.description {
            active.description = Set(description.clone());
        }
        if let Some(ref instructions) = changes.instructions {
            active.instructions = Set(instructions.clone());
        }
        active.updated_at = Set(Utc::now());
        active.update(&txn).await.map_err(name_conflict)?;

        if let Some(ref replacement) = changes.ingredients {
            let ingredients = IngredientStore::new(&txn);
            ingredients.remove_all_by_recipe(id).await?;
            for ingredient in replacement {
                ingredients.add(id, ingredient).await?;
            }
        }

        let updated = RecipeStore::new(&txn).reload(id).await?;
        txn.commit().await?;

        Ok(Some(updated))
    }

    /// Delete the recipe and its ingredients in one transaction.
    /// Returns whether the recipe existed.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        IngredientStore::new(&txn).remove_all_by_recipe(id).await?;
        let res = recipe::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(res.rows_affected > 0)
    }
}

fn name_conflict(err: DbErr) -> RecipeError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            tracing::debug!("Recipe name race: unique constraint caught on write");
            RecipeError::DuplicateName
        }
        _ => RecipeError::Persistence(err),
    }
}
