//! Contact Repository

use shared::models::{Contact, ContactCreate, ContactQuery, ContactUpdate};
use shared::pagination::page_window;
use shared::util::now_millis;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{RepoError, RepoResult, like_pattern};

const CONTACT_COLUMNS: &str =
    "id, user_id, first_name, last_name, phone_number, address, message, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Contact>> {
    let row = sqlx::query_as::<_, Contact>(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, user_id: i64, data: &ContactCreate) -> RepoResult<Contact> {
    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO contacts (user_id, first_name, last_name, phone_number, address, message, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(data.first_name.trim())
    .bind(data.last_name.trim())
    .bind(&data.phone_number)
    .bind(&data.address)
    .bind(&data.message)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create contact".into()))
}

/// Absent fields keep their stored value
pub async fn update(pool: &SqlitePool, id: i64, data: &ContactUpdate) -> RepoResult<Contact> {
    let rows = sqlx::query(
        "UPDATE contacts SET first_name = COALESCE(?, first_name), last_name = COALESCE(?, last_name), \
         phone_number = COALESCE(?, phone_number), address = COALESCE(?, address), \
         message = COALESCE(?, message), updated_at = ? WHERE id = ?",
    )
    .bind(data.first_name.as_deref().map(str::trim))
    .bind(data.last_name.as_deref().map(str::trim))
    .bind(&data.phone_number)
    .bind(&data.address)
    .bind(&data.message)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound("Contact not found!".into()));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound("Contact not found!".into()))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM contacts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, query: &ContactQuery, owner_id: Option<i64>) {
    qb.push(" WHERE 1 = 1");
    // the owner scope wins over a requested userId
    match (owner_id, query.user_id) {
        (Some(owner_id), _) | (None, Some(owner_id)) => {
            qb.push(" AND user_id = ").push_bind(owner_id);
        }
        (None, None) => {}
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = like_pattern(search.trim());
        qb.push(" AND (first_name LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR last_name LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR phone_number LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

/// Paginated listing, restricted to one owner when `owner_id` is set
pub async fn list(
    pool: &SqlitePool,
    query: &ContactQuery,
    owner_id: Option<i64>,
) -> RepoResult<(Vec<Contact>, i64)> {
    let (_, limit, offset) = page_window(query.page, query.limit);

    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM contacts");
    push_filters(&mut count, query, owner_id);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {CONTACT_COLUMNS} FROM contacts"));
    push_filters(&mut select, query, owner_id);
    let direction = query.direction().as_sql();
    select
        .push(format!(
            " ORDER BY {} {direction}, id {direction} LIMIT ",
            query.sort_by.column()
        ))
        .push_bind(limit as i64)
        .push(" OFFSET ")
        .push_bind(offset);
    let rows = select.build_query_as::<Contact>().fetch_all(pool).await?;
    Ok((rows, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::ContactSortField;
    use shared::pagination::SortDirection;

    async fn seed_user(pool: &SqlitePool, phone: &str) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO users (first_name, last_name, phone_number, password_hash, role, status, created_at, updated_at) \
             VALUES ('A', 'B', ?, 'x', 'USER_FIZ', 'ACTIVE', 0, 0) RETURNING id",
        )
        .bind(phone)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn contact(first_name: &str, phone: &str) -> ContactCreate {
        ContactCreate {
            first_name: first_name.into(),
            last_name: "Karimov".into(),
            phone_number: phone.into(),
            address: "Yunusobod 5, Tashkent".into(),
            message: None,
        }
    }

    #[tokio::test]
    async fn test_list_scopes_and_searches() {
        let db = DbService::in_memory().await.unwrap();
        let pool = &db.pool;
        let owner = seed_user(pool, "+998900000011").await;
        let other = seed_user(pool, "+998900000012").await;

        create(pool, owner, &contact("Ali", "+998901111111")).await.unwrap();
        create(pool, owner, &contact("Vali", "+998902222222")).await.unwrap();
        create(pool, other, &contact("Sobir", "+998903333333")).await.unwrap();

        let (all, total) = list(pool, &ContactQuery::default(), None).await.unwrap();
        assert_eq!(total, 3);
        // newest first by default
        assert_eq!(all[0].first_name, "Sobir");

        let (own, total) = list(pool, &ContactQuery::default(), Some(owner)).await.unwrap();
        assert_eq!(total, 2);
        assert!(own.iter().all(|c| c.user_id == owner));

        // a customer cannot widen the scope with userId
        let query = ContactQuery {
            user_id: Some(other),
            ..Default::default()
        };
        let (_, total) = list(pool, &query, Some(owner)).await.unwrap();
        assert_eq!(total, 2);

        let query = ContactQuery {
            search: Some("2222".into()),
            ..Default::default()
        };
        let (found, total) = list(pool, &query, None).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(found[0].first_name, "Vali");

        let query = ContactQuery {
            sort_by: ContactSortField::FirstName,
            sort_order: Some(SortDirection::Asc),
            ..Default::default()
        };
        let (sorted, _) = list(pool, &query, None).await.unwrap();
        let names: Vec<_> = sorted.iter().map(|c| c.first_name.as_str()).collect();
        assert_eq!(names, ["Ali", "Sobir", "Vali"]);
    }

    #[tokio::test]
    async fn test_update_keeps_absent_fields() {
        let db = DbService::in_memory().await.unwrap();
        let pool = &db.pool;
        let owner = seed_user(pool, "+998900000013").await;
        let stored = create(pool, owner, &contact("Ali", "+998901111111")).await.unwrap();

        let patch = ContactUpdate {
            address: Some("Chilonzor 9".into()),
            ..Default::default()
        };
        let updated = update(pool, stored.id, &patch).await.unwrap();
        assert_eq!(updated.address, "Chilonzor 9");
        assert_eq!(updated.first_name, "Ali");
        assert_eq!(updated.phone_number, "+998901111111");

        assert!(matches!(
            update(pool, 999, &patch).await,
            Err(RepoError::NotFound(_))
        ));
        assert!(delete(pool, stored.id).await.unwrap());
        assert!(!delete(pool, stored.id).await.unwrap());
    }
}
