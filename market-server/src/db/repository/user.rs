//! User Repository

use shared::models::{Company, CompanyInput, User, UserQuery, UserRole, UserStatus, UserUpdate};
use shared::pagination::page_window;
use shared::util::now_millis;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult, begin_write, like_pattern};

const USER_COLUMNS: &str =
    "id, first_name, last_name, phone_number, role, status, region_id, created_at, updated_at";

/// User row plus the stored password hash, for login only
#[derive(Debug, sqlx::FromRow)]
pub struct UserCredentials {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

/// Insert payload for a new account
#[derive(Debug)]
pub struct NewUser<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone_number: &'a str,
    pub password_hash: &'a str,
    pub role: UserRole,
    pub status: UserStatus,
    pub region_id: Option<i64>,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_phone(pool: &SqlitePool, phone: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE phone_number = ? LIMIT 1"
    ))
    .bind(phone)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_credentials(pool: &SqlitePool, phone: &str) -> RepoResult<Option<UserCredentials>> {
    let row = sqlx::query_as::<_, UserCredentials>(&format!(
        "SELECT {USER_COLUMNS}, password_hash FROM users WHERE phone_number = ? LIMIT 1"
    ))
    .bind(phone)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn phone_exists(pool: &SqlitePool, phone: &str) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE phone_number = ?")
        .bind(phone)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn region_exists(pool: &SqlitePool, region_id: i64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM regions WHERE id = ?")
        .bind(region_id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn insert(conn: &mut SqliteConnection, data: &NewUser<'_>) -> RepoResult<i64> {
    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO users (first_name, last_name, phone_number, password_hash, role, status, region_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(data.first_name)
    .bind(data.last_name)
    .bind(data.phone_number)
    .bind(data.password_hash)
    .bind(data.role)
    .bind(data.status)
    .bind(data.region_id)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

pub async fn insert_company(
    conn: &mut SqliteConnection,
    user_id: i64,
    company: &CompanyInput,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO companies (user_id, name_uz, name_ru, name_en, tax_id, bank_code, bank_account, bank_name, oked, address) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(&company.name_uz)
    .bind(&company.name_ru)
    .bind(&company.name_en)
    .bind(&company.tax_id)
    .bind(&company.bank_code)
    .bind(&company.bank_account)
    .bind(&company.bank_name)
    .bind(&company.oked)
    .bind(&company.address)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Insert a user and optional company in one transaction
pub async fn create(
    pool: &SqlitePool,
    data: &NewUser<'_>,
    company: Option<&CompanyInput>,
) -> RepoResult<User> {
    let mut tx = begin_write(pool).await?;
    let id = insert(&mut tx, data).await.map_err(|e| match e {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!(
            "User with phone number {} already exists",
            data.phone_number
        )),
        other => other,
    })?;
    if let Some(company) = company {
        insert_company(&mut tx, id, company).await?;
    }
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn find_company(pool: &SqlitePool, user_id: i64) -> RepoResult<Option<Company>> {
    let company = sqlx::query_as::<_, Company>(
        "SELECT id, user_id, name_uz, name_ru, name_en, tax_id, bank_code, bank_account, bank_name, oked, address \
         FROM companies WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(company)
}

pub async fn set_status(pool: &SqlitePool, id: i64, status: UserStatus) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE users SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}

/// Store a new password hash and drop the refresh token
pub async fn set_password(pool: &SqlitePool, id: i64, password_hash: &str) -> RepoResult<()> {
    sqlx::query(
        "UPDATE users SET password_hash = ?, refresh_token_hash = NULL, updated_at = ? WHERE id = ?",
    )
    .bind(password_hash)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn set_refresh_hash(pool: &SqlitePool, id: i64, hash: Option<&str>) -> RepoResult<()> {
    sqlx::query("UPDATE users SET refresh_token_hash = ? WHERE id = ?")
        .bind(hash)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Swap the refresh hash only if it still equals `current`
///
/// Two concurrent refreshes with the same token cannot both win.
pub async fn rotate_refresh_hash(
    pool: &SqlitePool,
    id: i64,
    current: &str,
    next: &str,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE users SET refresh_token_hash = ? WHERE id = ? AND refresh_token_hash = ?",
    )
    .bind(next)
    .bind(id)
    .bind(current)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn update(pool: &SqlitePool, id: i64, data: &UserUpdate) -> RepoResult<User> {
    let rows = sqlx::query(
        "UPDATE users SET first_name = COALESCE(?1, first_name), last_name = COALESCE(?2, last_name), \
         region_id = COALESCE(?3, region_id), status = COALESCE(?4, status), updated_at = ?5 WHERE id = ?6",
    )
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(data.region_id)
    .bind(data.status)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, query: &UserQuery, roles: &[UserRole]) {
    qb.push(" WHERE 1 = 1");
    if !roles.is_empty() {
        qb.push(" AND role IN (");
        let mut separated = qb.separated(", ");
        for role in roles {
            separated.push_bind(*role);
        }
        separated.push_unseparated(")");
    }
    if let Some(role) = query.role {
        qb.push(" AND role = ").push_bind(role);
    }
    if let Some(status) = query.status {
        qb.push(" AND status = ").push_bind(status);
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

/// Paginated listing restricted to `roles` (all roles when empty)
pub async fn list(
    pool: &SqlitePool,
    query: &UserQuery,
    roles: &[UserRole],
) -> RepoResult<(Vec<User>, i64)> {
    let (_, limit, offset) = page_window(query.page, query.limit);

    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM users");
    push_filters(&mut count, query, roles);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {USER_COLUMNS} FROM users"));
    push_filters(&mut select, query, roles);
    select
        .push(" ORDER BY created_at DESC, id DESC LIMIT ")
        .push_bind(limit as i64)
        .push(" OFFSET ")
        .push_bind(offset);
    let users = select.build_query_as::<User>().fetch_all(pool).await?;
    Ok((users, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn seed_region(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO regions (name_uz, created_at, updated_at) VALUES ('Toshkent', 0, 0) RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn new_user<'a>(phone: &'a str, role: UserRole, region_id: i64) -> NewUser<'a> {
        NewUser {
            first_name: "Aziz",
            last_name: "Karimov",
            phone_number: phone,
            password_hash: "hash",
            role,
            status: UserStatus::Inactive,
            region_id: Some(region_id),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let db = DbService::in_memory().await.unwrap();
        let region = seed_region(&db.pool).await;
        let user = create(&db.pool, &new_user("+998901234567", UserRole::UserFiz, region), None)
            .await
            .unwrap();
        assert_eq!(user.status, UserStatus::Inactive);

        let creds = find_credentials(&db.pool, "+998901234567").await.unwrap().unwrap();
        assert_eq!(creds.user.id, user.id);
        assert_eq!(creds.password_hash, "hash");
        assert!(find_company(&db.pool, user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_phone_is_rejected() {
        let db = DbService::in_memory().await.unwrap();
        let region = seed_region(&db.pool).await;
        create(&db.pool, &new_user("+998901234567", UserRole::UserFiz, region), None)
            .await
            .unwrap();
        let err = create(&db.pool, &new_user("+998901234567", UserRole::UserYur, region), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_company_rolls_back_with_user() {
        let db = DbService::in_memory().await.unwrap();
        let region = seed_region(&db.pool).await;
        let company = CompanyInput {
            name_uz: "Qurilish MChJ".into(),
            name_ru: None,
            name_en: None,
            tax_id: Some("301234567".into()),
            bank_code: None,
            bank_account: None,
            bank_name: None,
            oked: None,
            address: None,
        };
        let user = create(
            &db.pool,
            &new_user("+998901112233", UserRole::UserYur, region),
            Some(&company),
        )
        .await
        .unwrap();
        let stored = find_company(&db.pool, user.id).await.unwrap().unwrap();
        assert_eq!(stored.tax_id.as_deref(), Some("301234567"));
    }

    #[tokio::test]
    async fn test_list_filters_by_role_and_search() {
        let db = DbService::in_memory().await.unwrap();
        let region = seed_region(&db.pool).await;
        create(&db.pool, &new_user("+998900000001", UserRole::UserFiz, region), None)
            .await
            .unwrap();
        create(&db.pool, &new_user("+998900000002", UserRole::Admin, region), None)
            .await
            .unwrap();

        let query = UserQuery::default();
        let (admins, total) = list(&db.pool, &query, &[UserRole::Admin, UserRole::ViewerAdmin])
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(admins[0].role, UserRole::Admin);

        let query = UserQuery {
            search: Some("0000001".into()),
            ..Default::default()
        };
        let (found, total) = list(&db.pool, &query, &[]).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(found[0].phone_number, "+998900000001");
    }
}
