use serde_json::json;

use crate::common::{TestApp, routes};

mod recipe_creation {
    use super::*;

    #[tokio::test]
    async fn create_returns_the_full_aggregate() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::RECIPES,
                &json!({
                    "name": "Tomato Soup",
                    "description": "Simple tomato soup",
                    "instructions": "Blend and heat",
                    "ingredients": [
                        {"product_name": "Tomatoes", "quantity": 500, "unit": "g", "prep_time": 15},
                        {"product_name": "Cream", "quantity": 200, "unit": "ml"},
                    ],
                }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["name"], "Tomato Soup");
        assert_eq!(res.body["instructions"], "Blend and heat");
        assert_eq!(res.products(), ["Tomatoes", "Cream"]);
        assert_eq!(res.body["ingredients"][0]["quantity"], 500.0);
        assert_eq!(res.body["ingredients"][0]["prep_time"], 15);
        assert!(res.body["ingredients"][1]["prep_time"].is_null());
        assert!(res.body["created_at"].is_string());
    }

    #[tokio::test]
    async fn duplicate_name_is_a_conflict_and_nothing_is_added() {
        let app = TestApp::spawn().await;
        app.create_recipe("Soup", &["Water"]).await;

        let res = app
            .post(
                routes::RECIPES,
                &json!({"name": "Soup", "ingredients": [{"product_name": "Salt"}]}),
            )
            .await;
        assert_eq!(res.status, 409, "{}", res.text);
        assert_eq!(res.code(), "DUPLICATE_NAME");

        let list = app.get(routes::RECIPES).await;
        let soups: Vec<_> = list
            .body
            .as_array()
            .unwrap()
            .iter()
            .filter(|r| r["name"] == "Soup")
            .collect();
        assert_eq!(soups.len(), 1);
        assert_eq!(soups[0]["ingredients"][0]["product_name"], "Water");
    }

    #[tokio::test]
    async fn names_differing_only_in_case_are_distinct() {
        let app = TestApp::spawn().await;
        app.create_recipe("Soup", &["Water"]).await;
        app.create_recipe("soup", &["Water"]).await;

        let list = app.get(routes::RECIPES).await;
        assert_eq!(list.body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn names_are_stored_exactly_as_sent() {
        let app = TestApp::spawn().await;
        app.create_recipe("Soup", &["Water"]).await;

        let res = app
            .post(
                routes::RECIPES,
                &json!({"name": "Soup ", "ingredients": [{"product_name": " Salt"}]}),
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["name"], "Soup ");
        assert_eq!(res.products(), [" Salt"]);
    }

    #[tokio::test]
    async fn missing_name_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::RECIPES,
                &json!({"name": "   ", "ingredients": [{"product_name": "Water"}]}),
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "Recipe name is required");
    }

    #[tokio::test]
    async fn missing_or_empty_ingredients_are_rejected() {
        let app = TestApp::spawn().await;

        for body in [json!({"name": "Soup"}), json!({"name": "Soup", "ingredients": []})] {
            let res = app.post(routes::RECIPES, &body).await;
            assert_eq!(res.status, 400, "{}", res.text);
            assert_eq!(
                res.body["message"],
                "Recipe must have at least one ingredient"
            );
        }
    }

    #[tokio::test]
    async fn ingredient_without_product_name_creates_nothing() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::RECIPES,
                &json!({
                    "name": "Soup",
                    "ingredients": [{"product_name": "Water"}, {"quantity": 2}],
                }),
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Ingredient 2 must have a product name");

        let list = app.get(routes::RECIPES).await;
        assert_eq!(list.body, json!([]));
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .post(format!("http://{}{}", app.addr, routes::RECIPES))
            .header("x-api-key", crate::common::API_KEY)
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 400);

        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}

mod recipe_reading {
    use super::*;

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let app = TestApp::spawn().await;
        let b = app.create_recipe("B", &["x"]).await;
        let a = app.create_recipe("A", &["y"]).await;

        let res = app.get(routes::RECIPES).await;
        assert_eq!(res.status, 200);
        let ids: Vec<i64> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, [b as i64, a as i64]);
    }

    #[tokio::test]
    async fn get_unknown_recipe_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::recipe(999)).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.code(), "NOT_FOUND");
        assert_eq!(res.body["message"], "Recipe not found");
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.get("/recipes/abc").await;
        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }
}

mod recipe_update {
    use super::*;

    #[tokio::test]
    async fn ingredients_are_replaced_entirely() {
        let app = TestApp::spawn().await;
        let id = app.create_recipe("Soup", &["A", "B"]).await;

        let res = app
            .put(
                &routes::recipe(id),
                &json!({"ingredients": [{"product_name": "C"}]}),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.products(), ["C"]);

        let fetched = app.get(&routes::recipe(id)).await;
        assert_eq!(fetched.products(), ["C"]);
    }

    #[tokio::test]
    async fn omitted_fields_are_left_alone() {
        let app = TestApp::spawn().await;
        let id = app.create_recipe("Soup", &["A", "B"]).await;

        let res = app
            .put(&routes::recipe(id), &json!({"name": "Better Soup"}))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["name"], "Better Soup");
        assert_eq!(res.body["description"], "A test recipe");
        assert_eq!(res.products(), ["A", "B"]);
    }

    #[tokio::test]
    async fn null_clears_an_optional_field() {
        let app = TestApp::spawn().await;
        let id = app.create_recipe("Soup", &["A"]).await;

        let res = app
            .put(&routes::recipe(id), &json!({"description": null}))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["description"].is_null());
    }

    #[tokio::test]
    async fn empty_ingredient_list_is_rejected() {
        let app = TestApp::spawn().await;
        let id = app.create_recipe("Soup", &["A"]).await;

        let res = app
            .put(&routes::recipe(id), &json!({"ingredients": []}))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(
            res.body["message"],
            "Recipe must have at least one ingredient"
        );

        let fetched = app.get(&routes::recipe(id)).await;
        assert_eq!(fetched.products(), ["A"]);
    }

    #[tokio::test]
    async fn renaming_onto_another_recipe_is_a_conflict() {
        let app = TestApp::spawn().await;
        app.create_recipe("Soup", &["A"]).await;
        let stew = app.create_recipe("Stew", &["B"]).await;

        let res = app.put(&routes::recipe(stew), &json!({"name": "Soup"})).await;
        assert_eq!(res.status, 409);
        assert_eq!(res.code(), "DUPLICATE_NAME");

        let fetched = app.get(&routes::recipe(stew)).await;
        assert_eq!(fetched.body["name"], "Stew");
    }

    #[tokio::test]
    async fn keeping_the_same_name_is_allowed() {
        let app = TestApp::spawn().await;
        let id = app.create_recipe("Soup", &["A"]).await;

        let res = app
            .put(
                &routes::recipe(id),
                &json!({"name": "Soup", "instructions": "Stir"}),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["instructions"], "Stir");
    }

    #[tokio::test]
    async fn update_of_unknown_recipe_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .put(&routes::recipe(42), &json!({"name": "Ghost"}))
            .await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn null_name_is_rejected() {
        let app = TestApp::spawn().await;
        let id = app.create_recipe("Soup", &["A"]).await;

        let res = app.put(&routes::recipe(id), &json!({"name": null})).await;
        assert_eq!(res.status, 400);
    }
}

mod recipe_deletion {
    use super::*;

    #[tokio::test]
    async fn delete_removes_recipe_and_ingredients() {
        let app = TestApp::spawn().await;
        let id = app.create_recipe("Soup", &["A", "B"]).await;

        let res = app.delete(&routes::recipe(id)).await;
        assert_eq!(res.status, 204);
        assert!(res.text.is_empty());

        let fetched = app.get(&routes::recipe(id)).await;
        assert_eq!(fetched.status, 404);

        let again = app.delete(&routes::recipe(id)).await;
        assert_eq!(again.status, 404);
    }

    #[tokio::test]
    async fn deleted_name_can_be_reused() {
        let app = TestApp::spawn().await;
        let id = app.create_recipe("Soup", &["A"]).await;
        app.delete(&routes::recipe(id)).await;

        app.create_recipe("Soup", &["B"]).await;
    }
}

mod recipe_ingredients {
    use super::*;

    #[tokio::test]
    async fn add_appends_an_ingredient() {
        let app = TestApp::spawn().await;
        let id = app.create_recipe("Soup", &["A"]).await;

        let res = app
            .post(
                &routes::recipe_ingredients(id),
                &json!({"product_name": "Salt", "quantity": 1, "unit": "pinch"}),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.products(), ["A", "Salt"]);
        assert_eq!(res.body["ingredients"][1]["unit"], "pinch");
    }

    #[tokio::test]
    async fn add_without_product_name_is_rejected() {
        let app = TestApp::spawn().await;
        let id = app.create_recipe("Soup", &["A"]).await;

        let res = app
            .post(&routes::recipe_ingredients(id), &json!({"quantity": 1}))
            .await;
        assert_eq!(res.status, 400);

        let fetched = app.get(&routes::recipe(id)).await;
        assert_eq!(fetched.products(), ["A"]);
    }

    #[tokio::test]
    async fn add_to_unknown_recipe_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .post(&routes::recipe_ingredients(7), &json!({"product_name": "Salt"}))
            .await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn remove_drops_the_named_ingredient() {
        let app = TestApp::spawn().await;
        let id = app.create_recipe("Soup", &["A", "B"]).await;
        let fetched = app.get(&routes::recipe(id)).await;
        let a_id = fetched.body["ingredients"][0]["id"].clone();

        let res = app
            .delete_with_body(&routes::recipe_ingredients(id), &json!({"ingredientId": a_id}))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.products(), ["B"]);
    }

    #[tokio::test]
    async fn remove_of_a_foreign_ingredient_changes_nothing() {
        let app = TestApp::spawn().await;
        let soup = app.create_recipe("Soup", &["A"]).await;
        let stew = app.create_recipe("Stew", &["B"]).await;
        let stew_ingredient = app.get(&routes::recipe(stew)).await.body["ingredients"][0]["id"]
            .clone();

        let res = app
            .delete_with_body(
                &routes::recipe_ingredients(soup),
                &json!({"ingredientId": stew_ingredient}),
            )
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.products(), ["A"]);

        let stew_after = app.get(&routes::recipe(stew)).await;
        assert_eq!(stew_after.products(), ["B"]);
    }

    #[tokio::test]
    async fn remove_without_ingredient_id_is_rejected() {
        let app = TestApp::spawn().await;
        let id = app.create_recipe("Soup", &["A"]).await;

        let res = app
            .delete_with_body(&routes::recipe_ingredients(id), &json!({}))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Ingredient ID is required");
    }
}

mod api_key {
    use reqwest::Method;

    use super::*;

    #[tokio::test]
    async fn missing_key_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_key(routes::RECIPES).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.code(), "API_KEY_MISSING");
    }

    #[tokio::test]
    async fn wrong_key_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .request_with_key(Method::GET, routes::RECIPES, None, Some("nope"))
            .await;
        assert_eq!(res.status, 401);
        assert_eq!(res.code(), "API_KEY_INVALID");
    }

    #[tokio::test]
    async fn no_configured_key_leaves_routes_open() {
        let app = TestApp::spawn_with_key(None).await;

        let res = app.get_without_key(routes::RECIPES).await;
        assert_eq!(res.status, 200);
    }
}
