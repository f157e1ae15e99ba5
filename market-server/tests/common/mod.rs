//! Test harness: in-memory database, captured OTPs and a oneshot client

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use market_server::auth::OtpSender;
use market_server::auth::password::hash_password;
use market_server::db::DbService;
use market_server::db::repository::user::{self, NewUser};
use market_server::routes::build_app;
use market_server::{Config, ServerState};
use shared::models::{UserRole, UserStatus};

pub const ADMIN_PHONE: &str = "+998900000001";
pub const PASSWORD: &str = "secret123";

/// Keeps the last code sent to each phone
#[derive(Debug, Default)]
pub struct CapturingOtpSender {
    codes: Mutex<HashMap<String, String>>,
}

impl CapturingOtpSender {
    pub fn last_code(&self, phone: &str) -> Option<String> {
        self.codes.lock().ok()?.get(phone).cloned()
    }
}

#[async_trait]
impl OtpSender for CapturingOtpSender {
    async fn send(&self, phone_number: &str, code: &str) {
        if let Ok(mut codes) = self.codes.lock() {
            codes.insert(phone_number.to_string(), code.to_string());
        }
    }
}

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
    pub otps: Arc<CapturingOtpSender>,
    _dir: TempDir,
}

pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::for_tests(dir.path());
        std::fs::create_dir_all(config.uploads_dir()).unwrap();
        let db = DbService::in_memory().await.unwrap();
        let otps = Arc::new(CapturingOtpSender::default());
        let state = ServerState::new(config, db.pool, None).with_otp_sender(otps.clone());
        let app = build_app(state.clone());
        Self {
            app,
            state,
            otps,
            _dir: dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Reply {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        Reply { status, body }
    }

    pub async fn call(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Reply {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Reply {
        self.call("GET", path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Reply {
        self.call("POST", path, token, Some(body)).await
    }

    pub async fn patch(&self, path: &str, token: Option<&str>, body: Value) -> Reply {
        self.call("PATCH", path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Reply {
        self.call("DELETE", path, token, None).await
    }

    pub async fn login(&self, phone: &str, password: &str) -> Reply {
        self.post(
            "/api/auth/login",
            None,
            json!({ "phoneNumber": phone, "password": password }),
        )
        .await
    }

    /// Seed a SUPER_ADMIN directly and log in
    pub async fn admin_token(&self) -> String {
        let password_hash = hash_password(PASSWORD).unwrap();
        user::create(
            &self.state.pool,
            &NewUser {
                first_name: "Root",
                last_name: "Admin",
                phone_number: ADMIN_PHONE,
                password_hash: &password_hash,
                role: UserRole::SuperAdmin,
                status: UserStatus::Active,
                region_id: None,
            },
            None,
        )
        .await
        .unwrap();
        let reply = self.login(ADMIN_PHONE, PASSWORD).await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
        reply.body["accessToken"].as_str().unwrap().to_string()
    }

    pub async fn create_region(&self, admin: &str) -> i64 {
        let reply = self
            .post("/api/regions", Some(admin), json!({ "nameUz": "Toshkent" }))
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
        reply.body["id"].as_i64().unwrap()
    }

    /// Register, activate with the captured OTP and log in
    pub async fn customer(&self, phone: &str, region_id: i64) -> (i64, String) {
        let reply = self
            .post(
                "/api/auth/register",
                None,
                json!({
                    "firstName": "Ali",
                    "lastName": "Valiyev",
                    "phoneNumber": phone,
                    "password": PASSWORD,
                    "regionId": region_id,
                    "role": "USER_FIZ",
                }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
        let id = reply.body["id"].as_i64().unwrap();

        let code = self.otps.last_code(phone).unwrap();
        let reply = self
            .post(
                "/api/auth/activate",
                None,
                json!({ "phoneNumber": phone, "otp": code }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);

        let reply = self.login(phone, PASSWORD).await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
        (id, reply.body["accessToken"].as_str().unwrap().to_string())
    }

    pub async fn create_tool(&self, admin: &str, quantity: i64) -> i64 {
        let reply = self
            .post(
                "/api/tools",
                Some(admin),
                json!({ "nameUz": "Perforator", "price": 50.0, "quantity": quantity }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
        reply.body["id"].as_i64().unwrap()
    }

    pub async fn tool_quantity(&self, tool_id: i64) -> i64 {
        let reply = self.get(&format!("/api/tools/{tool_id}"), None).await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
        reply.body["quantity"].as_i64().unwrap()
    }
}

pub fn tool_order(tool_id: i64, quantity: i64) -> Value {
    json!({
        "address": "Chilonzor 7",
        "date": "2026-12-01T10:00:00Z",
        "totalPrice": 50.0 * quantity as f64,
        "paymentType": "CASH",
        "orderProducts": [
            { "toolId": tool_id, "quantity": quantity, "price": 50.0 }
        ]
    })
}
