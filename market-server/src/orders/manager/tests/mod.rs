//! OrderManager tests
//!
//! Most tests run against the SQLite storage on an in-memory pool.
//! `test_port.rs` swaps in a recording fake to check what reaches storage.

mod test_port;

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use shared::models::{OrderCreate, OrderProductInput, PaymentType, TimeUnit, UserRole};
use sqlx::SqlitePool;
use tokio::sync::mpsc;

use super::OrderManager;
use crate::db::DbService;
use crate::db::repository::order::SqliteOrderStorage;
use crate::notify::{Notifier, OrderNotification};

pub(super) struct TestEnv {
    pub manager: OrderManager,
    pub pool: SqlitePool,
    pub notifications: mpsc::Receiver<OrderNotification>,
    pub customer: i64,
    pub other_customer: i64,
    pub profession: i64,
    pub level: i64,
}

pub(super) async fn setup() -> TestEnv {
    let db = DbService::in_memory().await.unwrap();
    let pool = db.pool.clone();
    let (notifier, notifications) = Notifier::channel(16);
    let manager = OrderManager::new(
        Arc::new(SqliteOrderStorage::new(pool.clone())),
        Some(notifier),
    );

    let customer = seed_user(&pool, "+998901000001", UserRole::UserFiz).await;
    let other_customer = seed_user(&pool, "+998901000002", UserRole::UserYur).await;
    let profession: i64 = sqlx::query_scalar(
        "INSERT INTO professions (name_uz, created_at, updated_at) VALUES ('Santexnik', 0, 0) RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    let level: i64 = sqlx::query_scalar(
        "INSERT INTO levels (name_uz, created_at, updated_at) VALUES ('Senior', 0, 0) RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    TestEnv {
        manager,
        pool,
        notifications,
        customer,
        other_customer,
        profession,
        level,
    }
}

pub(super) async fn seed_user(pool: &SqlitePool, phone: &str, role: UserRole) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO users (first_name, last_name, phone_number, password_hash, role, status, created_at, updated_at) \
         VALUES ('Dilshod', 'Rahimov', ?, 'x', ?, 'ACTIVE', 0, 0) RETURNING id",
    )
    .bind(phone)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub(super) async fn seed_tool(pool: &SqlitePool, name: &str, quantity: i64) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO tools (code, name_uz, price, quantity, created_at, updated_at) \
         VALUES ((SELECT COALESCE(MAX(code), 100000) + 1 FROM tools), ?, 100, ?, 0, 0) RETURNING id",
    )
    .bind(name)
    .bind(quantity)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub(super) async fn seed_master(pool: &SqlitePool, phone: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO masters (first_name, last_name, phone_number, created_at, updated_at) \
         VALUES ('Bobur', 'Usmonov', ?, 0, 0) RETURNING id",
    )
    .bind(phone)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub(super) async fn seed_basket(pool: &SqlitePool, owner_id: i64, tool_id: i64) {
    sqlx::query(
        "INSERT INTO baskets (owner_id, tool_id, quantity, price, created_at, updated_at) \
         VALUES (?, ?, 1, 100, 0, 0)",
    )
    .bind(owner_id)
    .bind(tool_id)
    .execute(pool)
    .await
    .unwrap();
}

pub(super) async fn tool_quantity(pool: &SqlitePool, tool_id: i64) -> i64 {
    sqlx::query_scalar("SELECT quantity FROM tools WHERE id = ?")
        .bind(tool_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub(super) async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

pub(super) fn tool_line(tool_id: i64, quantity: i64) -> OrderProductInput {
    OrderProductInput {
        profession_id: None,
        tool_id: Some(tool_id),
        level_id: None,
        quantity,
        time_unit: None,
        working_time: None,
        price: 100.0,
    }
}

pub(super) fn profession_line(profession_id: i64, level_id: Option<i64>) -> OrderProductInput {
    OrderProductInput {
        profession_id: Some(profession_id),
        tool_id: None,
        level_id,
        quantity: 1,
        time_unit: Some(TimeUnit::Daily),
        working_time: Some(2),
        price: 400.0,
    }
}

pub(super) fn order_input(products: Vec<OrderProductInput>) -> OrderCreate {
    OrderCreate {
        address: "Toshkent, Chilonzor 9".into(),
        latitude: Some(41.28),
        longitude: Some(69.20),
        date: Utc.with_ymd_and_hms(2026, 11, 2, 9, 0, 0).unwrap(),
        total_price: products.iter().map(|p| p.price * p.quantity as f64).sum(),
        payment_type: PaymentType::Cash,
        with_delivery: true,
        delivery_comment: None,
        order_products: products,
    }
}
