//! Profession Repository
//!
//! A profession is a catalog entity with two join lists: level pricing
//! (`profession_levels`) and linked tools (`profession_tools`). Both are
//! written in the same transaction as the profession row.

use shared::models::{
    Profession, ProfessionCreate, ProfessionDetail, ProfessionLevel, ProfessionLevelInput,
    ProfessionUpdate,
};
use sqlx::{SqliteConnection, SqlitePool};

use super::catalog::{self, CatalogResource, Columns};
use super::{RepoError, RepoResult, all_exist, begin_write};

pub struct Professions;

impl CatalogResource for Professions {
    type Row = Profession;
    type Create = ProfessionCreate;
    type Update = ProfessionUpdate;

    const TABLE: &'static str = "professions";
    const LABEL: &'static str = "Profession";
    const COLUMNS: &'static str =
        "id, name_uz, name_ru, name_en, image, is_active, created_at, updated_at";
    const UNIQUE_COLUMN: &'static str = "name_uz";
    const SEARCH_COLUMNS: &'static [&'static str] = &["name_uz", "name_ru", "name_en"];
    const SORT_COLUMNS: &'static [(&'static str, &'static str)] =
        &[("createdAt", "created_at"), ("nameUz", "name_uz")];

    fn unique_on_create(data: &Self::Create) -> &str {
        &data.name_uz
    }
    fn unique_on_update(data: &Self::Update) -> Option<&str> {
        data.name_uz.as_deref()
    }
    fn create_columns(data: &Self::Create) -> Columns {
        vec![
            ("name_uz", (&data.name_uz).into()),
            ("name_ru", (&data.name_ru).into()),
            ("name_en", (&data.name_en).into()),
            ("image", (&data.image).into()),
            ("is_active", data.is_active.into()),
        ]
    }
    fn update_columns(data: &Self::Update) -> Columns {
        let mut columns = Columns::new();
        if let Some(v) = &data.name_uz {
            columns.push(("name_uz", v.into()));
        }
        if let Some(v) = &data.name_ru {
            columns.push(("name_ru", v.into()));
        }
        if let Some(v) = &data.name_en {
            columns.push(("name_en", v.into()));
        }
        if let Some(v) = &data.image {
            columns.push(("image", v.into()));
        }
        if let Some(v) = data.is_active {
            columns.push(("is_active", v.into()));
        }
        columns
    }
    fn image(row: &Self::Row) -> Option<&str> {
        row.image.as_deref()
    }
}

const INVALID_REFS: &str = "One or more level/tool IDs are invalid.";

async fn validate_joins(
    conn: &mut SqliteConnection,
    levels: &[ProfessionLevelInput],
    tool_ids: &[i64],
) -> RepoResult<()> {
    let level_ids: Vec<i64> = levels.iter().map(|l| l.level_id).collect();
    if !all_exist(&mut *conn, "levels", &level_ids).await?
        || !all_exist(&mut *conn, "tools", tool_ids).await?
    {
        return Err(RepoError::Validation(INVALID_REFS.into()));
    }
    Ok(())
}

async fn replace_levels(
    conn: &mut SqliteConnection,
    profession_id: i64,
    levels: &[ProfessionLevelInput],
) -> RepoResult<()> {
    sqlx::query("DELETE FROM profession_levels WHERE profession_id = ?")
        .bind(profession_id)
        .execute(&mut *conn)
        .await?;
    for level in levels {
        // Duplicate level ids in one payload keep the last entry
        sqlx::query(
            "INSERT INTO profession_levels (profession_id, level_id, min_working_hours, price_hourly, price_daily) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT(profession_id, level_id) DO UPDATE SET \
             min_working_hours = excluded.min_working_hours, \
             price_hourly = excluded.price_hourly, price_daily = excluded.price_daily",
        )
        .bind(profession_id)
        .bind(level.level_id)
        .bind(level.min_working_hours)
        .bind(level.price_hourly)
        .bind(level.price_daily)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn replace_tools(
    conn: &mut SqliteConnection,
    profession_id: i64,
    tool_ids: &[i64],
) -> RepoResult<()> {
    sqlx::query("DELETE FROM profession_tools WHERE profession_id = ?")
        .bind(profession_id)
        .execute(&mut *conn)
        .await?;
    for tool_id in tool_ids {
        sqlx::query(
            "INSERT OR IGNORE INTO profession_tools (profession_id, tool_id) VALUES (?, ?)",
        )
        .bind(profession_id)
        .bind(tool_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<ProfessionDetail>> {
    let Some(profession) = catalog::find_by_id::<Professions>(pool, id).await? else {
        return Ok(None);
    };
    let profession_levels = sqlx::query_as::<_, ProfessionLevel>(
        "SELECT profession_id, level_id, min_working_hours, price_hourly, price_daily \
         FROM profession_levels WHERE profession_id = ? ORDER BY level_id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;
    let tool_ids: Vec<i64> = sqlx::query_scalar(
        "SELECT tool_id FROM profession_tools WHERE profession_id = ? ORDER BY tool_id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(ProfessionDetail {
        profession,
        profession_levels,
        tool_ids,
    }))
}

pub async fn create(pool: &SqlitePool, data: &ProfessionCreate) -> RepoResult<ProfessionDetail> {
    let mut tx = begin_write(pool).await?;
    validate_joins(&mut tx, &data.profession_levels, &data.tool_ids).await?;
    let id = catalog::insert::<Professions>(&mut tx, data).await?;
    replace_levels(&mut tx, id, &data.profession_levels).await?;
    replace_tools(&mut tx, id, &data.tool_ids).await?;
    tx.commit().await?;

    find_detail(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create profession".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: &ProfessionUpdate,
) -> RepoResult<ProfessionDetail> {
    let mut tx = begin_write(pool).await?;
    validate_joins(
        &mut tx,
        data.profession_levels.as_deref().unwrap_or_default(),
        data.tool_ids.as_deref().unwrap_or_default(),
    )
    .await?;
    catalog::apply_update::<Professions>(&mut tx, id, data).await?;
    if let Some(levels) = &data.profession_levels {
        replace_levels(&mut tx, id, levels).await?;
    }
    if let Some(tool_ids) = &data.tool_ids {
        replace_tools(&mut tx, id, tool_ids).await?;
    }
    tx.commit().await?;

    find_detail(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Profession {id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::catalog::Levels;
    use shared::models::NamedEntryCreate;

    fn level_input(level_id: i64, hourly: f64) -> ProfessionLevelInput {
        ProfessionLevelInput {
            level_id,
            min_working_hours: 4,
            price_hourly: hourly,
            price_daily: hourly * 8.0,
        }
    }

    fn profession(name: &str, levels: Vec<ProfessionLevelInput>) -> ProfessionCreate {
        ProfessionCreate {
            name_uz: name.into(),
            name_ru: None,
            name_en: None,
            image: None,
            is_active: true,
            profession_levels: levels,
            tool_ids: vec![],
        }
    }

    async fn seed_level(pool: &SqlitePool, name: &str) -> i64 {
        let entry = NamedEntryCreate {
            name_uz: name.into(),
            name_ru: None,
            name_en: None,
            image: None,
        };
        catalog::create::<Levels>(pool, &entry).await.unwrap().id
    }

    #[tokio::test]
    async fn test_create_with_levels() {
        let db = DbService::in_memory().await.unwrap();
        let junior = seed_level(&db.pool, "Junior").await;
        let senior = seed_level(&db.pool, "Senior").await;

        let detail = create(
            &db.pool,
            &profession("Santexnik", vec![level_input(junior, 50.0), level_input(senior, 90.0)]),
        )
        .await
        .unwrap();
        assert_eq!(detail.profession.name_uz, "Santexnik");
        assert_eq!(detail.profession_levels.len(), 2);
        assert!(detail.tool_ids.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_level_rolls_back() {
        let db = DbService::in_memory().await.unwrap();
        let err = create(&db.pool, &profession("Elektrik", vec![level_input(42, 10.0)]))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(msg) if msg == INVALID_REFS));

        let (rows, total) = catalog::list::<Professions>(&db.pool, &Default::default())
            .await
            .unwrap();
        assert_eq!(total, 0);
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_levels_only_when_given() {
        let db = DbService::in_memory().await.unwrap();
        let junior = seed_level(&db.pool, "Junior").await;
        let senior = seed_level(&db.pool, "Senior").await;
        let created = create(&db.pool, &profession("Usta", vec![level_input(junior, 50.0)]))
            .await
            .unwrap();
        let id = created.profession.id;

        let rename = ProfessionUpdate {
            name_ru: Some("Мастер".into()),
            ..Default::default()
        };
        let detail = update(&db.pool, id, &rename).await.unwrap();
        assert_eq!(detail.profession_levels.len(), 1);

        let replace = ProfessionUpdate {
            profession_levels: Some(vec![level_input(senior, 100.0)]),
            ..Default::default()
        };
        let detail = update(&db.pool, id, &replace).await.unwrap();
        assert_eq!(detail.profession_levels.len(), 1);
        assert_eq!(detail.profession_levels[0].level_id, senior);
        assert_eq!(detail.profession.name_ru.as_deref(), Some("Мастер"));
    }
}
