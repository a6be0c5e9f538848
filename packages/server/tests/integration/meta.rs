use crate::common::{TestApp, routes};

#[tokio::test]
async fn welcome_is_public_and_lists_endpoints() {
    let app = TestApp::spawn().await;

    let res = app.get_without_key(routes::ROOT).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["environment"], "test");
    assert_eq!(res.body["endpoints"]["recipes"], "/recipes");
    assert!(res.body["version"].is_string());
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::spawn().await;

    let res = app.get_without_key(routes::HEALTH).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["status"], "OK");
    assert!(res.body["timestamp"].is_string());
}

#[tokio::test]
async fn unknown_route_is_a_structured_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get_without_key("/nowhere").await;
    assert_eq!(res.status, 404);
    assert_eq!(res.code(), "NOT_FOUND");
    assert_eq!(res.body["message"], "Route GET /nowhere not found");
}

#[tokio::test]
async fn api_reference_is_served() {
    let app = TestApp::spawn().await;

    let res = app.get_without_key("/scalar").await;
    assert_eq!(res.status, 200);
    assert!(res.text.to_lowercase().contains("<html"));
}

#[tokio::test]
async fn schema_is_created_on_a_fresh_database() {
    use sea_orm::{EntityTrait, PaginatorTrait};
    use server::entity::recipe;

    let app = TestApp::spawn().await;

    let count = recipe::Entity::find().count(&app.db).await.unwrap();
    assert_eq!(count, 0);
}
