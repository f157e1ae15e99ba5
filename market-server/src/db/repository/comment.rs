//! Comment Repository
//!
//! Comments belong to one completed order. Ratings hang off the comment
//! and are replaced as a set.

use shared::models::{
    Comment, CommentCreate, CommentDetail, CommentQuery, MasterRating, MasterRatingInput,
    OrderStatus,
};
use shared::pagination::page_window;
use shared::util::now_millis;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult, all_exist, begin_write};

const COMMENT_COLUMNS: &str = "id, order_id, user_id, message, created_at, updated_at";

/// Owner and status of an order, the facts comment creation checks
pub async fn order_owner_status(
    pool: &SqlitePool,
    order_id: i64,
) -> RepoResult<Option<(i64, OrderStatus)>> {
    let row = sqlx::query_as::<_, (i64, OrderStatus)>(
        "SELECT owner_id, status FROM orders WHERE id = ?",
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn exists_for_order(pool: &SqlitePool, order_id: i64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE order_id = ?")
        .bind(order_id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn masters_exist(pool: &SqlitePool, ratings: &[MasterRatingInput]) -> RepoResult<bool> {
    let ids: Vec<i64> = ratings.iter().map(|r| r.master_id).collect();
    all_exist(pool, "masters", &ids).await
}

async fn insert_ratings(
    conn: &mut SqliteConnection,
    comment_id: i64,
    ratings: &[MasterRatingInput],
) -> RepoResult<()> {
    for rating in ratings {
        sqlx::query("INSERT INTO master_ratings (comment_id, master_id, star) VALUES (?, ?, ?)")
            .bind(comment_id)
            .bind(rating.master_id)
            .bind(rating.star)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn ratings_of(pool: &SqlitePool, comment_ids: &[i64]) -> RepoResult<Vec<MasterRating>> {
    if comment_ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT id, comment_id, master_id, star FROM master_ratings WHERE comment_id IN (",
    );
    let mut separated = qb.separated(", ");
    for id in comment_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") ORDER BY id");
    let ratings = qb.build_query_as::<MasterRating>().fetch_all(pool).await?;
    Ok(ratings)
}

async fn with_ratings(pool: &SqlitePool, comments: Vec<Comment>) -> RepoResult<Vec<CommentDetail>> {
    let ids: Vec<i64> = comments.iter().map(|c| c.id).collect();
    let mut ratings = ratings_of(pool, &ids).await?;
    Ok(comments
        .into_iter()
        .map(|comment| {
            let (own, rest): (Vec<_>, Vec<_>) =
                ratings.drain(..).partition(|r| r.comment_id == comment.id);
            ratings = rest;
            CommentDetail {
                comment,
                master_ratings: own,
            }
        })
        .collect())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Comment>> {
    let comment = sqlx::query_as::<_, Comment>(&format!(
        "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(comment)
}

pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<CommentDetail>> {
    let Some(comment) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    Ok(with_ratings(pool, vec![comment]).await?.pop())
}

/// Insert a comment and its ratings in one transaction
pub async fn create(pool: &SqlitePool, user_id: i64, data: &CommentCreate) -> RepoResult<CommentDetail> {
    let now = now_millis();
    let mut tx = begin_write(pool).await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO comments (order_id, user_id, message, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(data.order_id)
    .bind(user_id)
    .bind(&data.message)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!(
            "Order {} already has a comment",
            data.order_id
        )),
        other => other,
    })?;

    insert_ratings(&mut tx, id, &data.master_ratings).await?;
    tx.commit().await?;

    find_detail(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create comment".into()))
}

/// Update the message and, when given, replace the ratings
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    message: Option<&str>,
    ratings: Option<&[MasterRatingInput]>,
) -> RepoResult<CommentDetail> {
    let mut tx = begin_write(pool).await?;

    let rows = sqlx::query(
        "UPDATE comments SET message = COALESCE(?, message), updated_at = ? WHERE id = ?",
    )
    .bind(message)
    .bind(now_millis())
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Comment {id} not found")));
    }

    if let Some(ratings) = ratings {
        sqlx::query("DELETE FROM master_ratings WHERE comment_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_ratings(&mut tx, id, ratings).await?;
    }
    tx.commit().await?;

    find_detail(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Comment {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, query: &CommentQuery, user_id: Option<i64>) {
    qb.push(" WHERE 1 = 1");
    if let Some(user_id) = user_id {
        qb.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(order_id) = query.order_id {
        qb.push(" AND order_id = ").push_bind(order_id);
    }
}

/// Newest first. `user_id` restricts the listing to one author.
pub async fn list(
    pool: &SqlitePool,
    query: &CommentQuery,
    user_id: Option<i64>,
) -> RepoResult<(Vec<CommentDetail>, i64)> {
    let (_, limit, offset) = page_window(query.page, query.limit);

    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM comments");
    push_filters(&mut count, query, user_id);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut select =
        QueryBuilder::<Sqlite>::new(format!("SELECT {COMMENT_COLUMNS} FROM comments"));
    push_filters(&mut select, query, user_id);
    select
        .push(" ORDER BY created_at DESC, id DESC LIMIT ")
        .push_bind(limit as i64)
        .push(" OFFSET ")
        .push_bind(offset);
    let comments = select.build_query_as::<Comment>().fetch_all(pool).await?;

    Ok((with_ratings(pool, comments).await?, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    struct Seed {
        pool: SqlitePool,
        user_id: i64,
        order_id: i64,
        master_id: i64,
    }

    async fn seed() -> Seed {
        let db = DbService::in_memory().await.unwrap();
        let pool = db.pool;
        let user_id: i64 = sqlx::query_scalar(
            "INSERT INTO users (first_name, last_name, phone_number, password_hash, role, status, created_at, updated_at) \
             VALUES ('Dilnoza', 'Rahimova', '+998901112233', 'h', 'USER_FIZ', 'ACTIVE', 0, 0) RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        let order_id: i64 = sqlx::query_scalar(
            "INSERT INTO orders (owner_id, address, latitude, longitude, date, total_price, payment_type, with_delivery, status, paid, created_at, updated_at) \
             VALUES (?, 'Chilonzor 5', 41.28, 69.2, 0, 100.0, 'CASH', 0, 'COMPLETED', 1, 0, 0) RETURNING id",
        )
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        let master_id: i64 = sqlx::query_scalar(
            "INSERT INTO masters (first_name, last_name, phone_number, is_active, birth_year, created_at, updated_at) \
             VALUES ('Bekzod', 'Aliyev', '+998909998877', 1, 1990, 0, 0) RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        Seed {
            pool,
            user_id,
            order_id,
            master_id,
        }
    }

    fn input(order_id: i64, master_id: i64, star: i64) -> CommentCreate {
        CommentCreate {
            order_id,
            message: "Tidy and on time".into(),
            master_ratings: vec![MasterRatingInput { master_id, star }],
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let s = seed().await;
        assert_eq!(
            order_owner_status(&s.pool, s.order_id).await.unwrap(),
            Some((s.user_id, OrderStatus::Completed))
        );

        let created = create(&s.pool, s.user_id, &input(s.order_id, s.master_id, 5))
            .await
            .unwrap();
        assert_eq!(created.master_ratings.len(), 1);
        assert_eq!(created.master_ratings[0].star, 5);
        assert!(exists_for_order(&s.pool, s.order_id).await.unwrap());

        let err = create(&s.pool, s.user_id, &input(s.order_id, s.master_id, 4))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_update_replaces_ratings() {
        let s = seed().await;
        let created = create(&s.pool, s.user_id, &input(s.order_id, s.master_id, 2))
            .await
            .unwrap();

        let kept = update(&s.pool, created.comment.id, Some("Changed my mind"), None)
            .await
            .unwrap();
        assert_eq!(kept.comment.message, "Changed my mind");
        assert_eq!(kept.master_ratings.len(), 1);

        let replaced = update(
            &s.pool,
            created.comment.id,
            None,
            Some(&[MasterRatingInput {
                master_id: s.master_id,
                star: 4,
            }]),
        )
        .await
        .unwrap();
        assert_eq!(replaced.master_ratings.len(), 1);
        assert_eq!(replaced.master_ratings[0].star, 4);
    }

    #[tokio::test]
    async fn test_list_scoped_and_cascade() {
        let s = seed().await;
        create(&s.pool, s.user_id, &input(s.order_id, s.master_id, 3))
            .await
            .unwrap();

        let (mine, total) = list(&s.pool, &CommentQuery::default(), Some(s.user_id))
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(mine[0].master_ratings.len(), 1);

        let (others, total) = list(&s.pool, &CommentQuery::default(), Some(s.user_id + 100))
            .await
            .unwrap();
        assert_eq!(total, 0);
        assert!(others.is_empty());

        sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(s.order_id)
            .execute(&s.pool)
            .await
            .unwrap();
        let (_, total) = list(&s.pool, &CommentQuery::default(), None).await.unwrap();
        assert_eq!(total, 0);
    }
}
