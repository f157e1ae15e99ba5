//! Basket Repository
//!
//! Line-item rules are checked by the caller. This module only stores rows.

use shared::models::{Basket, BasketCreate, BasketQuery};
use shared::pagination::page_window;
use shared::util::now_millis;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult};

const BASKET_COLUMNS: &str = "id, owner_id, profession_id, tool_id, level_id, quantity, \
     time_unit, working_time, price, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Basket>> {
    let row = sqlx::query_as::<_, Basket>(&format!(
        "SELECT {BASKET_COLUMNS} FROM baskets WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, owner_id: i64, data: &BasketCreate) -> RepoResult<Basket> {
    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO baskets (owner_id, profession_id, tool_id, level_id, quantity, time_unit, working_time, price, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(owner_id)
    .bind(data.profession_id)
    .bind(data.tool_id)
    .bind(data.level_id)
    .bind(data.quantity)
    .bind(data.time_unit)
    .bind(data.working_time)
    .bind(data.price)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create basket".into()))
}

/// Overwrite a row with an already merged and checked item
pub async fn save(pool: &SqlitePool, item: &Basket) -> RepoResult<Basket> {
    let rows = sqlx::query(
        "UPDATE baskets SET profession_id = ?, tool_id = ?, level_id = ?, quantity = ?, \
         time_unit = ?, working_time = ?, price = ?, updated_at = ? WHERE id = ?",
    )
    .bind(item.profession_id)
    .bind(item.tool_id)
    .bind(item.level_id)
    .bind(item.quantity)
    .bind(item.time_unit)
    .bind(item.working_time)
    .bind(item.price)
    .bind(now_millis())
    .bind(item.id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Basket {} not found", item.id)));
    }
    find_by_id(pool, item.id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Basket {} not found", item.id)))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM baskets WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Remove every basket row of `owner_id`, returning how many were removed
pub async fn clear_owner(conn: &mut SqliteConnection, owner_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM baskets WHERE owner_id = ?")
        .bind(owner_id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected())
}

fn push_scope(qb: &mut QueryBuilder<'_, Sqlite>, owner_id: Option<i64>) {
    if let Some(owner_id) = owner_id {
        qb.push(" WHERE owner_id = ").push_bind(owner_id);
    }
}

/// Paginated listing, restricted to one owner when `owner_id` is set
pub async fn list(
    pool: &SqlitePool,
    query: &BasketQuery,
    owner_id: Option<i64>,
) -> RepoResult<(Vec<Basket>, i64)> {
    let (_, limit, offset) = page_window(query.page, query.limit);

    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM baskets");
    push_scope(&mut count, owner_id);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {BASKET_COLUMNS} FROM baskets"));
    push_scope(&mut select, owner_id);
    let direction = query.order_by.as_sql();
    select
        .push(format!(
            " ORDER BY {} {direction}, id {direction} LIMIT ",
            query.sort_by.column()
        ))
        .push_bind(limit as i64)
        .push(" OFFSET ")
        .push_bind(offset);
    let rows = select.build_query_as::<Basket>().fetch_all(pool).await?;
    Ok((rows, total))
}
