//! OTP Repository
//!
//! At most one live code per phone number. Issuing a new code replaces the
//! previous one.

use shared::util::now_millis;
use sqlx::SqlitePool;

use super::RepoResult;

pub async fn upsert(
    pool: &SqlitePool,
    phone: &str,
    code_hash: &str,
    expires_at: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO otp_codes (phone_number, code_hash, expires_at) VALUES (?, ?, ?) \
         ON CONFLICT (phone_number) DO UPDATE SET code_hash = excluded.code_hash, expires_at = excluded.expires_at",
    )
    .bind(phone)
    .bind(code_hash)
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// True when a live code with this hash exists for the phone
pub async fn matches(pool: &SqlitePool, phone: &str, code_hash: &str) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM otp_codes WHERE phone_number = ? AND code_hash = ? AND expires_at > ?",
    )
    .bind(phone)
    .bind(code_hash)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Delete a live matching code. Returns false when there was none.
pub async fn consume(pool: &SqlitePool, phone: &str, code_hash: &str) -> RepoResult<bool> {
    let rows = sqlx::query(
        "DELETE FROM otp_codes WHERE phone_number = ? AND code_hash = ? AND expires_at > ?",
    )
    .bind(phone)
    .bind(code_hash)
    .bind(now_millis())
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn test_consume_is_single_use() {
        let db = DbService::in_memory().await.unwrap();
        let phone = "+998901234567";
        upsert(&db.pool, phone, "h1", now_millis() + 60_000).await.unwrap();
        assert!(matches(&db.pool, phone, "h1").await.unwrap());
        assert!(!matches(&db.pool, phone, "h2").await.unwrap());
        assert!(consume(&db.pool, phone, "h1").await.unwrap());
        assert!(!consume(&db.pool, phone, "h1").await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_and_replaced_codes_fail() {
        let db = DbService::in_memory().await.unwrap();
        let phone = "+998901234567";
        upsert(&db.pool, phone, "old", now_millis() - 1).await.unwrap();
        assert!(!matches(&db.pool, phone, "old").await.unwrap());

        upsert(&db.pool, phone, "new", now_millis() + 60_000).await.unwrap();
        assert!(matches(&db.pool, phone, "new").await.unwrap());
        assert!(!matches(&db.pool, phone, "old").await.unwrap());
    }
}
