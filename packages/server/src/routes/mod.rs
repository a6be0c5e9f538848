use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::{meta, recipe, user};
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(meta_routes())
        .merge(recipe_routes())
        .merge(user_routes())
}

fn meta_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(meta::welcome))
        .routes(routes!(meta::health))
}

fn recipe_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(recipe::list_recipes, recipe::create_recipe))
        .routes(routes!(
            recipe::get_recipe,
            recipe::update_recipe,
            recipe::delete_recipe
        ))
        .routes(routes!(
            recipe::add_recipe_ingredient,
            recipe::remove_recipe_ingredient
        ))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(user::list_users, user::create_user))
        .routes(routes!(user::get_user, user::update_user, user::delete_user))
}
