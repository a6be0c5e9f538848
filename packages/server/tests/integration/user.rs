use serde_json::json;

use crate::common::{TestApp, routes};

mod user_registration {
    use super::*;

    #[tokio::test]
    async fn create_returns_the_user() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::USERS,
                &json!({"name": " Jane Smith ", "email": "jane@example.com"}),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["name"], "Jane Smith");
        assert_eq!(res.body["email"], "jane@example.com");
        assert!(res.body["updated_at"].is_string());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let app = TestApp::spawn().await;
        app.create_user("Jane", "jane@example.com").await;

        let res = app
            .post(
                routes::USERS,
                &json!({"name": "Other Jane", "email": "jane@example.com"}),
            )
            .await;
        assert_eq!(res.status, 409);
        assert_eq!(res.code(), "EMAIL_TAKEN");
    }

    #[tokio::test]
    async fn invalid_fields_are_rejected() {
        let app = TestApp::spawn().await;

        for body in [
            json!({"email": "jane@example.com"}),
            json!({"name": "Jane"}),
            json!({"name": "Jane", "email": "not-an-email"}),
            json!({"name": "x".repeat(129), "email": "jane@example.com"}),
        ] {
            let res = app.post(routes::USERS, &body).await;
            assert_eq!(res.status, 400, "{body}: {}", res.text);
            assert_eq!(res.code(), "VALIDATION_ERROR");
        }
    }
}

mod user_management {
    use super::*;

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let app = TestApp::spawn().await;
        let first = app.create_user("Zed", "zed@example.com").await;
        let second = app.create_user("Amy", "amy@example.com").await;

        let res = app.get(routes::USERS).await;
        assert_eq!(res.status, 200);
        let ids: Vec<i64> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, [first as i64, second as i64]);
    }

    #[tokio::test]
    async fn get_unknown_user_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::user(5)).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["message"], "User not found");
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        let app = TestApp::spawn().await;
        let id = app.create_user("Jane", "jane@example.com").await;

        let res = app
            .put(&routes::user(id), &json!({"name": "Jane Doe"}))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["name"], "Jane Doe");
        assert_eq!(res.body["email"], "jane@example.com");
    }

    #[tokio::test]
    async fn update_to_a_taken_email_is_a_conflict() {
        let app = TestApp::spawn().await;
        app.create_user("John", "john@example.com").await;
        let jane = app.create_user("Jane", "jane@example.com").await;

        let res = app
            .put(&routes::user(jane), &json!({"email": "john@example.com"}))
            .await;
        assert_eq!(res.status, 409);

        let same = app
            .put(&routes::user(jane), &json!({"email": "jane@example.com"}))
            .await;
        assert_eq!(same.status, 200, "{}", same.text);
    }

    #[tokio::test]
    async fn update_of_unknown_user_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.put(&routes::user(3), &json!({"name": "Ghost"})).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let app = TestApp::spawn().await;
        let id = app.create_user("Jane", "jane@example.com").await;

        assert_eq!(app.delete(&routes::user(id)).await.status, 204);
        assert_eq!(app.get(&routes::user(id)).await.status, 404);
        assert_eq!(app.delete(&routes::user(id)).await.status, 404);
    }

    #[tokio::test]
    async fn users_require_the_api_key() {
        let app = TestApp::spawn().await;

        let res = app.get_without_key(routes::USERS).await;
        assert_eq!(res.status, 401);
    }
}
