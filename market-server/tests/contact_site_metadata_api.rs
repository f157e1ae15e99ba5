//! Contact requests and site metadata over HTTP

mod common;

use common::TestApp;
use http::StatusCode;
use serde_json::{Value, json};

fn contact(first_name: &str, phone: &str) -> Value {
    json!({
        "firstName": first_name,
        "lastName": "Karimov",
        "phoneNumber": phone,
        "address": "Yunusobod 5, Tashkent",
        "message": "Please call after 6 PM"
    })
}

fn metadata() -> Value {
    json!({
        "aboutUz": "Biz haqimizda",
        "aboutRu": "О нас",
        "privacyPolicyUz": "Maxfiylik siyosati",
        "email": "info@usta.uz",
        "phoneNumber": "+998712000000",
        "socialMedia": { "telegram": "https://t.me/usta" }
    })
}

#[tokio::test]
async fn test_contact_requests_are_owner_scoped() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let region_id = app.create_region(&admin).await;
    let (alice_id, alice) = app.customer("+998905000001", region_id).await;
    let (_, bob) = app.customer("+998905000002", region_id).await;

    assert_eq!(
        app.post("/api/contacts", None, contact("Ali", "+998901111111")).await.status,
        StatusCode::UNAUTHORIZED
    );

    let reply = app
        .post("/api/contacts", Some(&alice), contact("Ali", "+998901111111"))
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    assert_eq!(reply.body["userId"], alice_id);
    let path = format!("/api/contacts/{}", reply.body["id"]);

    let reply = app
        .post("/api/contacts", Some(&bob), contact("Sobir", "+998902222222"))
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);

    assert_eq!(app.get("/api/contacts", Some(&alice)).await.body["total"], 1);
    assert_eq!(app.get("/api/contacts", Some(&admin)).await.body["total"], 2);

    let reply = app.get("/api/contacts?search=Sobir", Some(&admin)).await;
    assert_eq!(reply.body["total"], 1);
    assert_eq!(reply.body["data"][0]["firstName"], "Sobir");

    assert_eq!(app.get(&path, Some(&alice)).await.status, StatusCode::OK);
    assert_eq!(app.get(&path, Some(&admin)).await.status, StatusCode::OK);
    assert_eq!(app.get(&path, Some(&bob)).await.status, StatusCode::FORBIDDEN);

    // editing is for managers only
    let patch = json!({ "address": "Chilonzor 9" });
    assert_eq!(app.patch(&path, Some(&alice), patch.clone()).await.status, StatusCode::FORBIDDEN);
    let reply = app.patch(&path, Some(&admin), patch).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    assert_eq!(reply.body["address"], "Chilonzor 9");
    assert_eq!(reply.body["firstName"], "Ali");

    assert_eq!(app.delete(&path, Some(&alice)).await.status, StatusCode::FORBIDDEN);
    assert_eq!(app.delete(&path, Some(&admin)).await.status, StatusCode::OK);
    assert_eq!(app.get(&path, Some(&admin)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&path, Some(&admin)).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_contact_validation() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let region_id = app.create_region(&admin).await;
    let (_, customer) = app.customer("+998905000003", region_id).await;

    for body in [
        contact("Ali7", "+998901111111"),
        contact("Ali", "901111111"),
        json!({ "firstName": "Ali", "lastName": "Karimov", "phoneNumber": "+998901111111", "address": "" }),
    ] {
        let reply = app.post("/api/contacts", Some(&customer), body).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{}", reply.body);
    }
    assert_eq!(app.get("/api/contacts", Some(&customer)).await.body["total"], 0);
}

#[tokio::test]
async fn test_site_metadata_is_a_single_public_row() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let region_id = app.create_region(&admin).await;
    let (_, customer) = app.customer("+998905000004", region_id).await;

    let reply = app.get("/api/site-metadata", None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["message"], "No site metadata found!");

    assert_eq!(
        app.post("/api/site-metadata", Some(&customer), metadata()).await.status,
        StatusCode::FORBIDDEN
    );

    let reply = app.post("/api/site-metadata", Some(&admin), metadata()).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    let id = reply.body["id"].as_i64().unwrap();

    let reply = app.post("/api/site-metadata", Some(&admin), metadata()).await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.body["message"], "Site metadata already exists");

    // anonymous visitors can read it
    let reply = app.get("/api/site-metadata", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body.as_array().map(Vec::len), Some(1));
    assert_eq!(reply.body[0]["socialMedia"]["telegram"], "https://t.me/usta");

    let path = format!("/api/site-metadata/{id}");
    let reply = app.patch(&path, Some(&admin), json!({ "email": "hello@usta.uz" })).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    assert_eq!(reply.body["email"], "hello@usta.uz");
    assert_eq!(reply.body["aboutUz"], "Biz haqimizda");

    let reply = app.patch(&path, Some(&admin), json!({ "email": "not-an-email" })).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let missing = format!("/api/site-metadata/{}", id + 1);
    assert_eq!(
        app.patch(&missing, Some(&admin), json!({ "aboutEn": "About" })).await.status,
        StatusCode::NOT_FOUND
    );

    assert_eq!(app.delete(&path, Some(&customer)).await.status, StatusCode::FORBIDDEN);
    let reply = app.delete(&path, Some(&admin)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["id"], id);
    assert_eq!(app.get("/api/site-metadata", None).await.status, StatusCode::NOT_FOUND);
}
