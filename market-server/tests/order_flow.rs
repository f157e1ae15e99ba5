//! Order lifecycle with tool stock reservation over HTTP

mod common;

use common::{TestApp, tool_order};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_create_reserves_and_cancel_restores_stock() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let region_id = app.create_region(&admin).await;
    let (customer_id, customer) = app.customer("+998901000001", region_id).await;
    let tool_id = app.create_tool(&admin, 3).await;

    let reply = app.post("/api/orders", Some(&customer), tool_order(tool_id, 2)).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    assert_eq!(reply.body["status"], "PENDING");
    assert_eq!(reply.body["ownerId"], customer_id);
    let order_id = reply.body["id"].as_i64().unwrap();
    assert_eq!(app.tool_quantity(tool_id).await, 1);

    let reply = app
        .patch(
            &format!("/api/orders/{order_id}"),
            Some(&admin),
            json!({ "status": "CANCELLED" }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    assert_eq!(reply.body["message"], "Order updated successfully");
    assert_eq!(reply.body["data"]["status"], "CANCELLED");
    assert_eq!(app.tool_quantity(tool_id).await, 3);

    // Terminal orders stay put and stock is not released twice
    let reply = app
        .patch(
            &format!("/api/orders/{order_id}"),
            Some(&admin),
            json!({ "status": "ACCEPTED" }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(app.tool_quantity(tool_id).await, 3);
}

#[tokio::test]
async fn test_insufficient_stock_leaves_inventory_untouched() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let region_id = app.create_region(&admin).await;
    let (_, customer) = app.customer("+998901000002", region_id).await;
    let tool_id = app.create_tool(&admin, 1).await;

    let reply = app.post("/api/orders", Some(&customer), tool_order(tool_id, 2)).await;
    assert_eq!(reply.status, StatusCode::CONFLICT, "{}", reply.body);
    assert_eq!(app.tool_quantity(tool_id).await, 1);

    let reply = app.get("/api/orders", Some(&customer)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["total"], 0);
}

#[tokio::test]
async fn test_invalid_line_items() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let region_id = app.create_region(&admin).await;
    let (_, customer) = app.customer("+998901000003", region_id).await;

    let mut body = tool_order(999, 1);
    let reply = app.post("/api/orders", Some(&customer), body.clone()).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{}", reply.body);

    body["orderProducts"] = json!([]);
    let reply = app.post("/api/orders", Some(&customer), body.clone()).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{}", reply.body);

    body["orderProducts"] = json!([{ "toolId": 1, "professionId": 1, "quantity": 1, "price": 1.0 }]);
    let reply = app.post("/api/orders", Some(&customer), body).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{}", reply.body);
}

#[tokio::test]
async fn test_huge_quantities_are_rejected_without_touching_stock() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let region_id = app.create_region(&admin).await;
    let (_, customer) = app.customer("+998901000009", region_id).await;
    let tool_id = app.create_tool(&admin, 5).await;

    let half = i64::MAX / 2 + 2;
    let mut body = tool_order(tool_id, half);
    body["orderProducts"] = json!([
        { "toolId": tool_id, "quantity": half, "price": 1.0 },
        { "toolId": tool_id, "quantity": half, "price": 1.0 }
    ]);
    let reply = app.post("/api/orders", Some(&customer), body).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{}", reply.body);

    let reply = app
        .post(
            "/api/baskets",
            Some(&customer),
            json!({ "toolId": tool_id, "quantity": 1_000_001, "price": 1.0 }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{}", reply.body);

    assert_eq!(app.tool_quantity(tool_id).await, 5);
    assert_eq!(app.get("/api/orders", Some(&customer)).await.body["total"], 0);
}

#[tokio::test]
async fn test_customers_only_see_their_orders() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let region_id = app.create_region(&admin).await;
    let (_, alice) = app.customer("+998901000004", region_id).await;
    let (_, bob) = app.customer("+998901000005", region_id).await;
    let tool_id = app.create_tool(&admin, 10).await;

    let reply = app.post("/api/orders", Some(&alice), tool_order(tool_id, 1)).await;
    let order_id = reply.body["id"].as_i64().unwrap();
    app.post("/api/orders", Some(&bob), tool_order(tool_id, 1)).await;

    let reply = app.get("/api/orders", Some(&alice)).await;
    assert_eq!(reply.body["total"], 1);
    let reply = app.get("/api/orders", Some(&admin)).await;
    assert_eq!(reply.body["total"], 2);

    let path = format!("/api/orders/{order_id}");
    assert_eq!(app.get(&path, Some(&alice)).await.status, StatusCode::OK);
    assert_eq!(app.get(&path, Some(&bob)).await.status, StatusCode::FORBIDDEN);
    assert_eq!(
        app.get("/api/orders/9999", Some(&admin)).await.status,
        StatusCode::NOT_FOUND
    );

    // Customers cannot drive the lifecycle
    let reply = app
        .patch(&path, Some(&alice), json!({ "status": "COMPLETED" }))
        .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_pending_order_restores_stock() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let region_id = app.create_region(&admin).await;
    let (_, customer) = app.customer("+998901000006", region_id).await;
    let tool_id = app.create_tool(&admin, 4).await;

    let reply = app.post("/api/orders", Some(&customer), tool_order(tool_id, 3)).await;
    let order_id = reply.body["id"].as_i64().unwrap();
    assert_eq!(app.tool_quantity(tool_id).await, 1);

    let reply = app.delete(&format!("/api/orders/{order_id}"), Some(&admin)).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    assert_eq!(reply.body["message"], "Order deleted successfully");
    assert_eq!(app.tool_quantity(tool_id).await, 4);
    assert_eq!(
        app.get(&format!("/api/orders/{order_id}"), Some(&admin)).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_order_clears_basket_and_completion_returns_tools() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let region_id = app.create_region(&admin).await;
    let (_, customer) = app.customer("+998901000007", region_id).await;
    let tool_id = app.create_tool(&admin, 2).await;

    let reply = app
        .post(
            "/api/baskets",
            Some(&customer),
            json!({ "toolId": tool_id, "quantity": 2, "price": 50.0 }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);

    // A rejected order leaves the basket alone
    let reply = app.post("/api/orders", Some(&customer), tool_order(tool_id, 3)).await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(app.get("/api/baskets", Some(&customer)).await.body["total"], 1);

    let reply = app.post("/api/orders", Some(&customer), tool_order(tool_id, 2)).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    let order_id = reply.body["id"].as_i64().unwrap();
    assert_eq!(app.get("/api/baskets", Some(&customer)).await.body["total"], 0);
    assert_eq!(app.tool_quantity(tool_id).await, 0);

    let path = format!("/api/orders/{order_id}");
    for status in ["ACCEPTED", "IN_PROGRESS"] {
        let reply = app.patch(&path, Some(&admin), json!({ "status": status })).await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
        assert_eq!(app.tool_quantity(tool_id).await, 0);
    }

    let reply = app.patch(&path, Some(&admin), json!({ "status": "COMPLETED" })).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    assert_eq!(app.tool_quantity(tool_id).await, 2);

    // Re-applying the terminal status is a no-op
    let reply = app.patch(&path, Some(&admin), json!({ "status": "COMPLETED" })).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    assert_eq!(app.tool_quantity(tool_id).await, 2);

    // Going backwards is refused
    let reply = app.patch(&path, Some(&admin), json!({ "status": "PENDING" })).await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
}
