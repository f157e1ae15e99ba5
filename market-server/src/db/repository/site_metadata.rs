//! Site Metadata Repository
//!
//! The table holds at most one row. A unique `singleton` column pinned to 1
//! turns a second insert into a unique violation, even when two creates
//! race.

use std::collections::BTreeMap;

use shared::models::{SiteMetadata, SiteMetadataCreate, SiteMetadataUpdate};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

pub const MSG_EXISTS: &str = "Site metadata already exists";
pub const MSG_NOT_FOUND: &str = "Site metadata not found with the provided ID!";

const COLUMNS: &str = "id, about_uz, about_ru, about_en, privacy_policy_uz, privacy_policy_ru, \
     privacy_policy_en, email, phone_number, social_media, created_at, updated_at";

/// Stored shape: links are a JSON object in a TEXT column
#[derive(sqlx::FromRow)]
struct SiteMetadataRow {
    id: i64,
    about_uz: String,
    about_ru: Option<String>,
    about_en: Option<String>,
    privacy_policy_uz: String,
    privacy_policy_ru: Option<String>,
    privacy_policy_en: Option<String>,
    email: String,
    phone_number: String,
    social_media: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<SiteMetadataRow> for SiteMetadata {
    type Error = RepoError;

    fn try_from(row: SiteMetadataRow) -> Result<Self, Self::Error> {
        let social_media: BTreeMap<String, String> = serde_json::from_str(&row.social_media)
            .map_err(|e| RepoError::Database(format!("Corrupt social media links: {e}")))?;
        Ok(SiteMetadata {
            id: row.id,
            about_uz: row.about_uz,
            about_ru: row.about_ru,
            about_en: row.about_en,
            privacy_policy_uz: row.privacy_policy_uz,
            privacy_policy_ru: row.privacy_policy_ru,
            privacy_policy_en: row.privacy_policy_en,
            email: row.email,
            phone_number: row.phone_number,
            social_media,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn links_json(links: &BTreeMap<String, String>) -> RepoResult<String> {
    serde_json::to_string(links).map_err(|e| RepoError::Validation(e.to_string()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<SiteMetadata>> {
    let row = sqlx::query_as::<_, SiteMetadataRow>(&format!(
        "SELECT {COLUMNS} FROM site_metadata WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(SiteMetadata::try_from).transpose()
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<SiteMetadata>> {
    let rows = sqlx::query_as::<_, SiteMetadataRow>(&format!(
        "SELECT {COLUMNS} FROM site_metadata ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(SiteMetadata::try_from).collect()
}

pub async fn create(pool: &SqlitePool, data: &SiteMetadataCreate) -> RepoResult<SiteMetadata> {
    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO site_metadata (about_uz, about_ru, about_en, privacy_policy_uz, privacy_policy_ru, \
         privacy_policy_en, email, phone_number, social_media, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.about_uz)
    .bind(&data.about_ru)
    .bind(&data.about_en)
    .bind(&data.privacy_policy_uz)
    .bind(&data.privacy_policy_ru)
    .bind(&data.privacy_policy_en)
    .bind(&data.email)
    .bind(&data.phone_number)
    .bind(links_json(&data.social_media)?)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Conflict(MSG_EXISTS.into()),
        other => other,
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create site metadata".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: &SiteMetadataUpdate,
) -> RepoResult<SiteMetadata> {
    let links = data.social_media.as_ref().map(links_json).transpose()?;
    let rows = sqlx::query(
        "UPDATE site_metadata SET about_uz = COALESCE(?, about_uz), about_ru = COALESCE(?, about_ru), \
         about_en = COALESCE(?, about_en), privacy_policy_uz = COALESCE(?, privacy_policy_uz), \
         privacy_policy_ru = COALESCE(?, privacy_policy_ru), privacy_policy_en = COALESCE(?, privacy_policy_en), \
         email = COALESCE(?, email), phone_number = COALESCE(?, phone_number), \
         social_media = COALESCE(?, social_media), updated_at = ? WHERE id = ?",
    )
    .bind(&data.about_uz)
    .bind(&data.about_ru)
    .bind(&data.about_en)
    .bind(&data.privacy_policy_uz)
    .bind(&data.privacy_policy_ru)
    .bind(&data.privacy_policy_en)
    .bind(&data.email)
    .bind(&data.phone_number)
    .bind(links)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(MSG_NOT_FOUND.into()));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(MSG_NOT_FOUND.into()))
}

/// Delete and return the removed row
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<SiteMetadata> {
    let stored = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(MSG_NOT_FOUND.into()))?;
    sqlx::query("DELETE FROM site_metadata WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn sample() -> SiteMetadataCreate {
        SiteMetadataCreate {
            about_uz: "Biz haqimizda".into(),
            about_ru: None,
            about_en: Some("About us".into()),
            privacy_policy_uz: "Maxfiylik siyosati".into(),
            privacy_policy_ru: None,
            privacy_policy_en: None,
            email: "info@usta.uz".into(),
            phone_number: "+998901234567".into(),
            social_media: BTreeMap::from([("telegram".to_string(), "https://t.me/usta".to_string())]),
        }
    }

    #[tokio::test]
    async fn test_second_create_conflicts() {
        let db = DbService::in_memory().await.unwrap();
        let pool = &db.pool;

        let stored = create(pool, &sample()).await.unwrap();
        assert_eq!(stored.social_media["telegram"], "https://t.me/usta");

        match create(pool, &sample()).await {
            Err(RepoError::Conflict(msg)) => assert_eq!(msg, MSG_EXISTS),
            other => panic!("expected conflict, got {other:?}"),
        }
        assert_eq!(find_all(pool).await.unwrap().len(), 1);

        // the slot frees up after a delete
        delete(pool, stored.id).await.unwrap();
        assert!(find_all(pool).await.unwrap().is_empty());
        create(pool, &sample()).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_replaces_links_and_keeps_rest() {
        let db = DbService::in_memory().await.unwrap();
        let pool = &db.pool;
        let stored = create(pool, &sample()).await.unwrap();

        let patch = SiteMetadataUpdate {
            email: Some("hello@usta.uz".into()),
            social_media: Some(BTreeMap::from([(
                "instagram".to_string(),
                "https://instagram.com/usta".to_string(),
            )])),
            ..Default::default()
        };
        let updated = update(pool, stored.id, &patch).await.unwrap();
        assert_eq!(updated.email, "hello@usta.uz");
        assert_eq!(updated.about_uz, "Biz haqimizda");
        assert_eq!(updated.social_media.len(), 1);
        assert!(updated.social_media.contains_key("instagram"));

        assert!(matches!(
            update(pool, stored.id + 1, &patch).await,
            Err(RepoError::NotFound(_))
        ));
        assert!(matches!(delete(pool, stored.id + 1).await, Err(RepoError::NotFound(_))));
    }
}
