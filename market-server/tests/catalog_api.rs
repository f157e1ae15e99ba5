//! Public catalog reads, manager-only writes and health

mod common;

use common::TestApp;
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let reply = app.get("/health", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "ok");
}

#[tokio::test]
async fn test_catalog_reads_are_public_writes_are_not() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let region_id = app.create_region(&admin).await;
    let (_, customer) = app.customer("+998902000001", region_id).await;

    let body = json!({ "nameUz": "Bosch" });
    assert_eq!(
        app.post("/api/brands", None, body.clone()).await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.post("/api/brands", Some(&customer), body.clone()).await.status,
        StatusCode::FORBIDDEN
    );
    let reply = app.post("/api/brands", Some(&admin), body).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    let brand_id = reply.body["id"].as_i64().unwrap();

    let reply = app.get("/api/brands", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["total"], 1);
    assert_eq!(reply.body["currentPage"], 1);
    assert_eq!(reply.body["data"][0]["nameUz"], "Bosch");

    let reply = app.get(&format!("/api/brands/{brand_id}"), None).await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = app
        .patch(
            &format!("/api/brands/{brand_id}"),
            Some(&admin),
            json!({ "nameRu": "Бош" }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    assert_eq!(reply.body["nameUz"], "Bosch");
    assert_eq!(reply.body["nameRu"], "Бош");

    let reply = app.delete(&format!("/api/brands/{brand_id}"), Some(&admin)).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    let reply = app.get(&format!("/api/brands/{brand_id}"), None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_validation() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let reply = app.post("/api/brands", Some(&admin), json!({ "nameUz": "" })).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = app
        .post(
            "/api/tools",
            Some(&admin),
            json!({ "nameUz": "Drill", "price": 10.0, "quantity": -1 }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tools_listing() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let first = app.create_tool(&admin, 2).await;
    let second = app.create_tool(&admin, 5).await;
    assert_ne!(first, second);

    let reply = app.get("/api/tools?page=1&limit=1", None).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    assert_eq!(reply.body["total"], 2);
    assert_eq!(reply.body["totalPages"], 2);
    assert_eq!(reply.body["data"].as_array().unwrap().len(), 1);
}
