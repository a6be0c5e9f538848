use sea_orm::*;
use tracing::info;

use crate::entity::user;
use crate::recipe::{NewIngredient, NewRecipe, RecipeError, RecipeStore};

/// Sample recipes: name, description, instructions and (product, quantity, unit, prep minutes).
const SAMPLE_RECIPES: &[(&str, &str, &str, &[(&str, f64, &str, i32)])] = &[
    (
        "Pasta Carbonara",
        "Classic Italian pasta dish",
        "Cook pasta, fry bacon, mix with eggs and cheese",
        &[
            ("Pasta", 400.0, "g", 5),
            ("Eggs", 3.0, "pieces", 2),
            ("Bacon", 200.0, "g", 10),
        ],
    ),
    (
        "Tomato Soup",
        "Creamy tomato soup",
        "Blend tomatoes, add cream and season",
        &[("Tomatoes", 500.0, "g", 15), ("Cream", 200.0, "ml", 3)],
    ),
];

const SAMPLE_USERS: &[(&str, &str)] = &[
    ("John Doe", "john@example.com"),
    ("Jane Smith", "jane@example.com"),
];

/// Insert the sample recipes through the aggregate store, unless recipes exist already.
pub async fn seed_recipes(db: &DatabaseConnection) -> Result<(), RecipeError> {
    let store = RecipeStore::new(db);
    if store.count().await? > 0 {
        info!("Recipes already present, skipping recipe seed");
        return Ok(());
    }

    for &(name, description, instructions, ingredients) in SAMPLE_RECIPES {
        let data = NewRecipe {
            name: name.to_string(),
            description: Some(description.to_string()),
            instructions: Some(instructions.to_string()),
            ingredients: Some(
                ingredients
                    .iter()
                    .map(|&(product, quantity, unit, prep_time)| NewIngredient {
                        quantity: Some(quantity),
                        unit: Some(unit.to_string()),
                        prep_time: Some(prep_time),
                        ..NewIngredient::named(product)
                    })
                    .collect(),
            ),
        };
        store.create(&data).await?;
    }

    info!("Seeded {} recipes", SAMPLE_RECIPES.len());
    Ok(())
}

pub async fn seed_users(db: &DatabaseConnection) -> Result<(), DbErr> {
    if user::Entity::find().count(db).await? > 0 {
        info!("Users already present, skipping user seed");
        return Ok(());
    }

    let now = chrono::Utc::now();
    let models = SAMPLE_USERS.iter().map(|&(name, email)| user::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    });
    user::Entity::insert_many(models).exec(db).await?;

    info!("Seeded {} users", SAMPLE_USERS.len());
    Ok(())
}
