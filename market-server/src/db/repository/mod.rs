//! Repository Module
//!
//! Free async functions over a `SqlitePool` (or a transaction), one module
//! per table group.

// Accounts
pub mod otp;
pub mod session;
pub mod user;

// Catalog
pub mod catalog;
pub mod profession;

// Masters
pub mod master;

// Ordering
pub mod basket;
pub mod order;

// Feedback
pub mod comment;
pub mod contact;

// Site content
pub mod site_metadata;

use shared::error::{AppError, ErrorCode};
use shared::models::LineRefs;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool, Transaction};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                RepoError::Validation("Referenced record does not exist".into())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Conflict(msg) => AppError::conflict(msg),
            RepoError::Database(msg) => {
                tracing::error!(target: "database", error = %msg, "Database error occurred");
                AppError::database("Database error")
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Open a write transaction holding the SQLite write lock from the start
///
/// A deferred transaction that reads first cannot be upgraded while another
/// writer is active and fails with `SQLITE_BUSY` at once. `BEGIN IMMEDIATE`
/// takes the lock up front, so concurrent writers wait on `busy_timeout`.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Number of ids in `ids` that exist in `table`
///
/// `table` must be a trusted identifier.
pub async fn count_existing<'e, E>(executor: E, table: &str, ids: &[i64]) -> RepoResult<i64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    if ids.is_empty() {
        return Ok(0);
    }
    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT COUNT(*) FROM {table} WHERE id IN ("));
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
    let count: i64 = qb.build_query_scalar().fetch_one(executor).await?;
    Ok(count)
}

/// True when every id in the deduplicated `ids` exists in `table`
pub async fn all_exist<'e, E>(executor: E, table: &str, ids: &[i64]) -> RepoResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let mut unique = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();
    Ok(count_existing(executor, table, &unique).await? == unique.len() as i64)
}

/// True when every profession, tool and level in `refs` exists
pub async fn line_refs_exist(conn: &mut SqliteConnection, refs: &LineRefs) -> RepoResult<bool> {
    Ok(all_exist(&mut *conn, "professions", &refs.profession_ids).await?
        && all_exist(&mut *conn, "tools", &refs.tool_ids).await?
        && all_exist(&mut *conn, "levels", &refs.level_ids).await?)
}

/// Every column that can hold an uploaded image url
const IMAGE_COLUMNS: &[(&str, &str)] = &[
    ("regions", "image"),
    ("brands", "image"),
    ("capacities", "image"),
    ("sizes", "image"),
    ("levels", "image"),
    ("partners", "image"),
    ("showcases", "image"),
    ("tools", "image"),
    ("professions", "image"),
    ("masters", "image"),
    ("masters", "passport_image"),
];

/// Whether any row still points at the uploaded file `name`
///
/// Uploads are stored under their content hash, so several rows may share
/// one file.
pub async fn image_in_use(pool: &sqlx::SqlitePool, name: &str) -> RepoResult<bool> {
    let url = format!("/uploads/{name}");
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM (");
    for (i, (table, column)) in IMAGE_COLUMNS.iter().enumerate() {
        if i > 0 {
            qb.push(" UNION ALL ");
        }
        qb.push(format!("SELECT 1 FROM {table} WHERE {column} IN ("));
        qb.push_bind(name.to_string());
        qb.push(", ");
        qb.push_bind(url.clone());
        qb.push(")");
    }
    qb.push(")");
    let count: i64 = qb.build_query_scalar().fetch_one(pool).await?;
    Ok(count > 0)
}

/// Escape `%` and `_` for a `LIKE ... ESCAPE '\'` pattern
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
