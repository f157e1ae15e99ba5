//! Order Repository
//!
//! SQLite implementation of [`OrderStorage`]. Stock reservation is a
//! conditional decrement (`quantity >= ?`) inside the creating
//! transaction, so concurrent orders for the same tool cannot oversell.

use async_trait::async_trait;
use shared::models::{
    LineRefs, Order, OrderDetail, OrderOwner, OrderProductDetail, OrderQuery, OrderStatus,
};
use shared::pagination::page_window;
use shared::util::now_millis;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::{all_exist, basket, begin_write, line_refs_exist};
use crate::orders::storage::{
    NewOrder, OrderPatch, OrderStorage, StorageError, StorageResult,
};

const ORDER_COLUMNS: &str = "id, owner_id, address, latitude, longitude, date, total_price, \
     payment_type, with_delivery, delivery_comment, paid, status, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct SqliteOrderStorage {
    pool: SqlitePool,
}

impl SqliteOrderStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Fail with the first tool whose stock cannot cover `demand`
async fn check_stock(conn: &mut SqliteConnection, demand: &[(i64, i64)]) -> StorageResult<()> {
    for &(tool_id, quantity) in demand {
        let stock: Option<i64> = sqlx::query_scalar("SELECT quantity FROM tools WHERE id = ?")
            .bind(tool_id)
            .fetch_optional(&mut *conn)
            .await?;
        if stock.is_none_or(|stock| stock < quantity) {
            return Err(StorageError::InsufficientStock { tool_id });
        }
    }
    Ok(())
}

async fn reserve_stock(conn: &mut SqliteConnection, demand: &[(i64, i64)]) -> StorageResult<()> {
    for &(tool_id, quantity) in demand {
        let rows = sqlx::query(
            "UPDATE tools SET quantity = quantity - ?, updated_at = ? WHERE id = ? AND quantity >= ?",
        )
        .bind(quantity)
        .bind(now_millis())
        .bind(tool_id)
        .bind(quantity)
        .execute(&mut *conn)
        .await?;
        if rows.rows_affected() == 0 {
            return Err(StorageError::InsufficientStock { tool_id });
        }
    }
    Ok(())
}

/// Add every tool line item of `order_id` back to stock
async fn release_stock(conn: &mut SqliteConnection, order_id: i64) -> StorageResult<u64> {
    let rows = sqlx::query(
        "UPDATE tools SET quantity = quantity + ( \
             SELECT SUM(op.quantity) FROM order_products op \
             WHERE op.order_id = ? AND op.tool_id = tools.id), updated_at = ? \
         WHERE id IN (SELECT tool_id FROM order_products WHERE order_id = ? AND tool_id IS NOT NULL)",
    )
    .bind(order_id)
    .bind(now_millis())
    .bind(order_id)
    .execute(&mut *conn)
    .await?;
    Ok(rows.rows_affected())
}

/// Write `to` only if the stored status is still `from`
async fn compare_and_set_status(
    conn: &mut SqliteConnection,
    id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> StorageResult<()> {
    let rows = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
        .bind(to)
        .bind(now_millis())
        .bind(id)
        .bind(from)
        .execute(&mut *conn)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(StorageError::StatusChanged(id));
    }
    Ok(())
}

async fn replace_masters(conn: &mut SqliteConnection, id: i64, master_ids: &[i64]) -> StorageResult<()> {
    sqlx::query("DELETE FROM order_masters WHERE order_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    for master_id in master_ids {
        sqlx::query("INSERT OR IGNORE INTO order_masters (order_id, master_id) VALUES (?, ?)")
            .bind(id)
            .bind(master_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, query: &OrderQuery, owner_id: Option<i64>) {
    qb.push(" WHERE 1 = 1");
    if let Some(owner_id) = owner_id {
        qb.push(" AND owner_id = ").push_bind(owner_id);
    }
    if let Some(status) = query.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(payment_type) = query.payment_type {
        qb.push(" AND payment_type = ").push_bind(payment_type);
    }
    if let Some(paid) = query.paid {
        qb.push(" AND paid = ").push_bind(paid);
    }
    if let Some(with_delivery) = query.with_delivery {
        qb.push(" AND with_delivery = ").push_bind(with_delivery);
    }
    if let Some(date) = query.date {
        qb.push(" AND date = ").push_bind(date.timestamp_millis());
    }
    if let Some(date) = query.gte_date {
        qb.push(" AND date >= ").push_bind(date.timestamp_millis());
    }
    if let Some(date) = query.lte_date {
        qb.push(" AND date <= ").push_bind(date.timestamp_millis());
    }
    if let Some(sum) = query.total_sum {
        qb.push(" AND total_price = ").push_bind(sum);
    }
    if let Some(sum) = query.gte_total_sum {
        qb.push(" AND total_price >= ").push_bind(sum);
    }
    if let Some(sum) = query.lte_total_sum {
        qb.push(" AND total_price <= ").push_bind(sum);
    }
}

#[async_trait]
impl OrderStorage for SqliteOrderStorage {
    async fn refs_exist(&self, refs: &LineRefs) -> StorageResult<bool> {
        let mut conn = self.pool.acquire().await?;
        Ok(line_refs_exist(&mut conn, refs).await?)
    }

    async fn masters_exist(&self, ids: &[i64]) -> StorageResult<bool> {
        Ok(all_exist(&self.pool, "masters", ids).await?)
    }

    async fn create(&self, order: &NewOrder) -> StorageResult<i64> {
        let demand = order.tool_demand()?;
        let mut tx = begin_write(&self.pool).await?;

        check_stock(&mut tx, &demand).await?;

        let now = now_millis();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO orders (owner_id, address, latitude, longitude, date, total_price, payment_type, with_delivery, delivery_comment, paid, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?) RETURNING id",
        )
        .bind(order.owner_id)
        .bind(&order.address)
        .bind(order.latitude)
        .bind(order.longitude)
        .bind(order.date)
        .bind(order.total_price)
        .bind(order.payment_type)
        .bind(order.with_delivery)
        .bind(&order.delivery_comment)
        .bind(OrderStatus::Pending)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for product in &order.products {
            sqlx::query(
                "INSERT INTO order_products (order_id, profession_id, tool_id, level_id, quantity, time_unit, working_time, price) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(id)
            .bind(product.profession_id)
            .bind(product.tool_id)
            .bind(product.level_id)
            .bind(product.quantity)
            .bind(product.time_unit)
            .bind(product.working_time)
            .bind(product.price)
            .execute(&mut *tx)
            .await?;
        }

        reserve_stock(&mut tx, &demand).await?;
        let cleared = basket::clear_owner(&mut tx, order.owner_id).await?;
        tx.commit().await?;

        tracing::debug!(order_id = id, tools = demand.len(), basket_cleared = cleared, "Order stored");
        Ok(id)
    }

    async fn find(&self, id: i64) -> StorageResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(order)
    }

    async fn find_detail(&self, id: i64) -> StorageResult<Option<OrderDetail>> {
        let Some(order) = self.find(id).await? else {
            return Ok(None);
        };

        let order_products = sqlx::query_as::<_, OrderProductDetail>(
            "SELECT op.id, op.order_id, op.profession_id, op.tool_id, op.level_id, op.quantity, \
             op.time_unit, op.working_time, op.price, \
             p.name_uz AS profession_name, t.name_uz AS tool_name, l.name_uz AS level_name \
             FROM order_products op \
             LEFT JOIN professions p ON p.id = op.profession_id \
             LEFT JOIN tools t ON t.id = op.tool_id \
             LEFT JOIN levels l ON l.id = op.level_id \
             WHERE op.order_id = ? ORDER BY op.id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let master_ids: Vec<i64> = sqlx::query_scalar(
            "SELECT master_id FROM order_masters WHERE order_id = ? ORDER BY master_id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let owner = sqlx::query_as::<_, OrderOwner>(
            "SELECT id, first_name, last_name, phone_number FROM users WHERE id = ?",
        )
        .bind(order.owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(Some(OrderDetail {
            order,
            order_products,
            master_ids,
            owner,
        }))
    }

    async fn apply(&self, id: i64, patch: &OrderPatch) -> StorageResult<()> {
        let mut tx = begin_write(&self.pool).await?;

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if exists == 0 {
            return Err(StorageError::OrderNotFound(id));
        }

        if let Some(change) = patch.status {
            compare_and_set_status(&mut tx, id, change.from, change.to).await?;
            if change.release {
                let tools = release_stock(&mut tx, id).await?;
                tracing::debug!(order_id = id, tools, "Released reserved stock");
            }
        }
        if let Some(master_ids) = &patch.master_ids {
            replace_masters(&mut tx, id, master_ids).await?;
        }

        sqlx::query("UPDATE orders SET paid = COALESCE(?, paid), updated_at = ? WHERE id = ?")
            .bind(patch.paid)
            .bind(now_millis())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: i64, expected: OrderStatus, release: bool) -> StorageResult<()> {
        let mut tx = begin_write(&self.pool).await?;

        // Release before the delete: line items go with the order row
        if release {
            release_stock(&mut tx, id).await?;
        }
        let rows = sqlx::query("DELETE FROM orders WHERE id = ? AND status = ?")
            .bind(id)
            .bind(expected)
            .execute(&mut *tx)
            .await?;
        if rows.rows_affected() == 0 {
            return Err(StorageError::StatusChanged(id));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list(
        &self,
        query: &OrderQuery,
        owner_id: Option<i64>,
    ) -> StorageResult<(Vec<Order>, i64)> {
        let (_, limit, offset) = page_window(query.page, query.limit);

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM orders");
        push_filters(&mut count, query, owner_id);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {ORDER_COLUMNS} FROM orders"));
        push_filters(&mut select, query, owner_id);
        let direction = query.order_by.as_sql();
        select
            .push(format!(
                " ORDER BY {} {direction}, id {direction} LIMIT ",
                query.sort_by.column()
            ))
            .push_bind(limit as i64)
            .push(" OFFSET ")
            .push_bind(offset);
        let orders = select.build_query_as::<Order>().fetch_all(&self.pool).await?;
        Ok((orders, total))
    }
}
