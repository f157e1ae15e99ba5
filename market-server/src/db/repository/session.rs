//! Session Repository
//!
//! One session per (user, client ip).

use shared::models::Session;
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::RepoResult;

/// Record a session unless one already exists for this ip
pub async fn record(
    pool: &SqlitePool,
    user_id: i64,
    ip: &str,
    user_agent: Option<&str>,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO sessions (user_id, ip, user_agent, created_at) VALUES (?, ?, ?, ?) \
         ON CONFLICT (user_id, ip) DO NOTHING",
    )
    .bind(user_id)
    .bind(ip)
    .bind(user_agent)
    .bind(now_millis())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn exists(pool: &SqlitePool, user_id: i64, ip: &str) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE user_id = ? AND ip = ?")
        .bind(user_id)
        .bind(ip)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Session>> {
    let sessions = sqlx::query_as::<_, Session>(
        "SELECT id, user_id, ip, user_agent, created_at FROM sessions WHERE user_id = ? ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(sessions)
}

pub async fn delete(pool: &SqlitePool, user_id: i64, ip: &str) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM sessions WHERE user_id = ? AND ip = ?")
        .bind(user_id)
        .bind(ip)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
