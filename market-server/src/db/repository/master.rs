//! Master Repository

use shared::models::{
    Master, MasterCreate, MasterDetail, MasterProfession, MasterProfessionInput, MasterQuery,
    MasterSearch, MasterSummary, MasterUpdate,
};
use shared::pagination::page_window;
use shared::util::now_millis;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult, all_exist, begin_write, like_pattern};

pub const INVALID_REFS: &str = "One or more profession/level IDs are invalid.";

const MASTER_COLUMNS: &str = "m.id, m.first_name, m.last_name, m.phone_number, m.is_active, \
     m.birth_year, m.image, m.passport_image, m.about, m.created_at, m.updated_at";

const AVERAGE_RATING: &str =
    "(SELECT AVG(r.star) FROM master_ratings r WHERE r.master_id = m.id) AS average_rating";

const PROFESSION_COLUMNS: &str = "id, master_id, profession_id, level_id, min_working_hours, \
     price_hourly, price_daily, experience";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MasterSummary>> {
    let row = sqlx::query_as::<_, MasterSummary>(&format!(
        "SELECT {MASTER_COLUMNS}, {AVERAGE_RATING} FROM masters m WHERE m.id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn professions_of(pool: &SqlitePool, master_id: i64) -> RepoResult<Vec<MasterProfession>> {
    let rows = sqlx::query_as::<_, MasterProfession>(&format!(
        "SELECT {PROFESSION_COLUMNS} FROM master_professions WHERE master_id = ? ORDER BY id"
    ))
    .bind(master_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<MasterDetail>> {
    let Some(summary) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let master_professions = professions_of(pool, id).await?;
    Ok(Some(MasterDetail {
        master: summary.master,
        average_rating: summary.average_rating,
        master_professions,
    }))
}

async fn validate_professions(
    conn: &mut SqliteConnection,
    items: &[MasterProfessionInput],
) -> RepoResult<()> {
    let profession_ids: Vec<i64> = items.iter().map(|p| p.profession_id).collect();
    let level_ids: Vec<i64> = items.iter().filter_map(|p| p.level_id).collect();
    if !all_exist(&mut *conn, "professions", &profession_ids).await?
        || !all_exist(&mut *conn, "levels", &level_ids).await?
    {
        return Err(RepoError::Validation(INVALID_REFS.into()));
    }
    Ok(())
}

async fn replace_professions(
    conn: &mut SqliteConnection,
    master_id: i64,
    items: &[MasterProfessionInput],
) -> RepoResult<()> {
    sqlx::query("DELETE FROM master_professions WHERE master_id = ?")
        .bind(master_id)
        .execute(&mut *conn)
        .await?;
    for item in items {
        sqlx::query(
            "INSERT INTO master_professions (master_id, profession_id, level_id, min_working_hours, price_hourly, price_daily, experience) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(master_id)
        .bind(item.profession_id)
        .bind(item.level_id)
        .bind(item.min_working_hours)
        .bind(item.price_hourly)
        .bind(item.price_daily)
        .bind(item.experience)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

fn duplicate_phone(phone: &str) -> impl Fn(RepoError) -> RepoError + '_ {
    move |e| match e {
        RepoError::Duplicate(_) => {
            RepoError::Duplicate(format!("Master with phone number {phone} already exists"))
        }
        other => other,
    }
}

pub async fn create(pool: &SqlitePool, data: &MasterCreate) -> RepoResult<MasterDetail> {
    let mut tx = begin_write(pool).await?;
    validate_professions(&mut tx, &data.master_professions).await?;

    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO masters (first_name, last_name, phone_number, is_active, birth_year, image, passport_image, about, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.phone_number)
    .bind(data.is_active)
    .bind(data.birth_year)
    .bind(&data.image)
    .bind(&data.passport_image)
    .bind(&data.about)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(RepoError::from)
    .map_err(duplicate_phone(&data.phone_number))?;

    replace_professions(&mut tx, id, &data.master_professions).await?;
    tx.commit().await?;

    find_detail(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create master".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &MasterUpdate) -> RepoResult<MasterDetail> {
    let mut tx = begin_write(pool).await?;
    if let Some(items) = &data.master_professions {
        validate_professions(&mut tx, items).await?;
    }

    let rows = sqlx::query(
        "UPDATE masters SET \
         first_name = COALESCE(?, first_name), last_name = COALESCE(?, last_name), \
         phone_number = COALESCE(?, phone_number), is_active = COALESCE(?, is_active), \
         birth_year = COALESCE(?, birth_year), image = COALESCE(?, image), \
         passport_image = COALESCE(?, passport_image), about = COALESCE(?, about), \
         updated_at = ? WHERE id = ?",
    )
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.phone_number)
    .bind(data.is_active)
    .bind(data.birth_year)
    .bind(&data.image)
    .bind(&data.passport_image)
    .bind(&data.about)
    .bind(now_millis())
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(RepoError::from)
    .map_err(duplicate_phone(data.phone_number.as_deref().unwrap_or_default()))?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Master {id} not found")));
    }
    if let Some(items) = &data.master_professions {
        replace_professions(&mut tx, id, items).await?;
    }
    tx.commit().await?;

    find_detail(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Master {id} not found")))
}

/// Hard delete. Returns the removed row for image cleanup.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<Master> {
    let summary = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Master {id} not found")))?;
    sqlx::query("DELETE FROM masters WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(summary.master)
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, query: &MasterQuery) {
    qb.push(" WHERE 1 = 1");
    if let Some(name) = query.name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = like_pattern(name);
        qb.push(" AND (m.first_name LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR m.last_name LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
    if let Some(phone) = query.phone_number.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND m.phone_number LIKE ")
            .push_bind(like_pattern(phone))
            .push(" ESCAPE '\\'");
    }
    if let Some(is_active) = query.is_active {
        qb.push(" AND m.is_active = ").push_bind(is_active);
    }
    if let Some(year) = query.birth_year {
        qb.push(" AND m.birth_year = ").push_bind(year);
    }
    if let Some(year) = query.gte_birth_year {
        qb.push(" AND m.birth_year >= ").push_bind(year);
    }
    if let Some(year) = query.lte_birth_year {
        qb.push(" AND m.birth_year <= ").push_bind(year);
    }
}

pub async fn list(pool: &SqlitePool, query: &MasterQuery) -> RepoResult<(Vec<MasterSummary>, i64)> {
    let (_, limit, offset) = page_window(query.page, query.limit);

    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM masters m");
    push_filters(&mut count, query);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut select = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {MASTER_COLUMNS}, {AVERAGE_RATING} FROM masters m"
    ));
    push_filters(&mut select, query);
    let direction = query.order_by.as_sql();
    select
        .push(format!(
            " ORDER BY {} {direction}, m.id {direction} LIMIT ",
            query.sort_by.column()
        ))
        .push_bind(limit as i64)
        .push(" OFFSET ")
        .push_bind(offset);
    let rows = select.build_query_as::<MasterSummary>().fetch_all(pool).await?;
    Ok((rows, total))
}

fn push_search(qb: &mut QueryBuilder<'_, Sqlite>, search: &MasterSearch) {
    qb.push(" WHERE m.id IN (SELECT mp.master_id FROM master_professions mp WHERE 1 = 1");
    if let Some(id) = search.profession_id {
        qb.push(" AND mp.profession_id = ").push_bind(id);
    }
    if let Some(id) = search.level_id {
        qb.push(" AND mp.level_id = ").push_bind(id);
    }
    if let Some(v) = search.gte_min_working_hours {
        qb.push(" AND mp.min_working_hours >= ").push_bind(v);
    }
    if let Some(v) = search.lte_min_working_hours {
        qb.push(" AND mp.min_working_hours <= ").push_bind(v);
    }
    if let Some(v) = search.gte_price_hourly {
        qb.push(" AND mp.price_hourly >= ").push_bind(v);
    }
    if let Some(v) = search.lte_price_hourly {
        qb.push(" AND mp.price_hourly <= ").push_bind(v);
    }
    if let Some(v) = search.gte_price_daily {
        qb.push(" AND mp.price_daily >= ").push_bind(v);
    }
    if let Some(v) = search.lte_price_daily {
        qb.push(" AND mp.price_daily <= ").push_bind(v);
    }
    if let Some(v) = search.gte_experience {
        qb.push(" AND mp.experience >= ").push_bind(v);
    }
    if let Some(v) = search.lte_experience {
        qb.push(" AND mp.experience <= ").push_bind(v);
    }
    qb.push(")");
}

/// Masters offering at least one profession that matches every given filter
pub async fn search(
    pool: &SqlitePool,
    search: &MasterSearch,
) -> RepoResult<(Vec<MasterSummary>, i64)> {
    let (_, limit, offset) = page_window(search.page, search.limit);

    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM masters m");
    push_search(&mut count, search);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut select = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {MASTER_COLUMNS}, {AVERAGE_RATING} FROM masters m"
    ));
    push_search(&mut select, search);
    select
        .push(" ORDER BY m.created_at DESC, m.id DESC LIMIT ")
        .push_bind(limit as i64)
        .push(" OFFSET ")
        .push_bind(offset);
    let rows = select.build_query_as::<MasterSummary>().fetch_all(pool).await?;
    Ok((rows, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn seed_profession(pool: &SqlitePool, name: &str) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO professions (name_uz, created_at, updated_at) VALUES (?, 0, 0) RETURNING id",
        )
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn offer(profession_id: i64, hourly: f64, experience: i64) -> MasterProfessionInput {
        MasterProfessionInput {
            profession_id,
            level_id: None,
            min_working_hours: 2,
            price_hourly: hourly,
            price_daily: hourly * 8.0,
            experience,
        }
    }

    fn master(phone: &str, first_name: &str, offers: Vec<MasterProfessionInput>) -> MasterCreate {
        MasterCreate {
            first_name: first_name.into(),
            last_name: "Usmonov".into(),
            phone_number: phone.into(),
            is_active: true,
            birth_year: Some(1990),
            image: None,
            passport_image: None,
            about: None,
            master_professions: offers,
        }
    }

    #[tokio::test]
    async fn test_create_and_duplicate_phone() {
        let db = DbService::in_memory().await.unwrap();
        let plumber = seed_profession(&db.pool, "Santexnik").await;

        let detail = create(&db.pool, &master("+998901111111", "Bobur", vec![offer(plumber, 50.0, 3)]))
            .await
            .unwrap();
        assert_eq!(detail.master_professions.len(), 1);
        assert_eq!(detail.average_rating, None);

        let err = create(&db.pool, &master("+998901111111", "Jasur", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(msg) if msg.contains("+998901111111")));
    }

    #[tokio::test]
    async fn test_invalid_profession_rejected() {
        let db = DbService::in_memory().await.unwrap();
        let err = create(&db.pool, &master("+998902222222", "Bobur", vec![offer(77, 10.0, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(msg) if msg == INVALID_REFS));
        let (_, total) = list(&db.pool, &MasterQuery::default()).await.unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_search_by_profession_ranges() {
        let db = DbService::in_memory().await.unwrap();
        let plumber = seed_profession(&db.pool, "Santexnik").await;
        let electrician = seed_profession(&db.pool, "Elektrik").await;

        create(&db.pool, &master("+998903333331", "Bobur", vec![offer(plumber, 40.0, 1)]))
            .await
            .unwrap();
        let senior = create(
            &db.pool,
            &master("+998903333332", "Jasur", vec![offer(plumber, 90.0, 10), offer(electrician, 60.0, 2)]),
        )
        .await
        .unwrap();

        let query = MasterSearch {
            profession_id: Some(plumber),
            gte_price_hourly: Some(50.0),
            ..Default::default()
        };
        let (rows, total) = search(&db.pool, &query).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].master.id, senior.master.id);

        let (_, total) = search(&db.pool, &MasterSearch::default()).await.unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_list_filters_and_update_replaces_professions() {
        let db = DbService::in_memory().await.unwrap();
        let plumber = seed_profession(&db.pool, "Santexnik").await;
        let created = create(&db.pool, &master("+998904444444", "Bobur", vec![offer(plumber, 40.0, 1)]))
            .await
            .unwrap();

        let query = MasterQuery {
            name: Some("bob".into()),
            gte_birth_year: Some(1985),
            ..Default::default()
        };
        let (rows, total) = list(&db.pool, &query).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].master.first_name, "Bobur");

        let patch = MasterUpdate {
            about: Some("10 yillik tajriba".into()),
            master_professions: Some(vec![]),
            ..Default::default()
        };
        let detail = update(&db.pool, created.master.id, &patch).await.unwrap();
        assert!(detail.master_professions.is_empty());
        assert_eq!(detail.master.about.as_deref(), Some("10 yillik tajriba"));
        assert_eq!(detail.master.first_name, "Bobur");

        assert!(matches!(
            update(&db.pool, 999, &MasterUpdate::default()).await,
            Err(RepoError::NotFound(_))
        ));
    }
}
