//! Catalog Repository
//!
//! Brands, capacities, sizes, levels, regions, partners, FAQs, showcases and
//! tools share one CRUD implementation. Each entity is a marker type that
//! implements [`CatalogResource`] and describes its table: columns, the
//! unique field, search and sort columns, extra filters and references.

use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{
    CatalogQuery, Faq, FaqCreate, FaqUpdate, NamedEntry, NamedEntryCreate, NamedEntryUpdate,
    Partner, PartnerCreate, PartnerUpdate, Showcase, ShowcaseCreate, ShowcaseUpdate, Tool,
    ToolCreate, ToolUpdate,
};
use shared::pagination::page_window;
use shared::util::now_millis;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use validator::Validate;

use super::{RepoError, RepoResult, like_pattern};

/// A bindable column value
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Text(Option<String>),
    Int(Option<i64>),
    Real(Option<f64>),
    Bool(bool),
}

impl From<&String> for ColumnValue {
    fn from(v: &String) -> Self {
        ColumnValue::Text(Some(v.clone()))
    }
}

impl From<&Option<String>> for ColumnValue {
    fn from(v: &Option<String>) -> Self {
        ColumnValue::Text(v.clone())
    }
}

impl From<Option<i64>> for ColumnValue {
    fn from(v: Option<i64>) -> Self {
        ColumnValue::Int(v)
    }
}

impl From<i64> for ColumnValue {
    fn from(v: i64) -> Self {
        ColumnValue::Int(Some(v))
    }
}

impl From<f64> for ColumnValue {
    fn from(v: f64) -> Self {
        ColumnValue::Real(Some(v))
    }
}

impl From<bool> for ColumnValue {
    fn from(v: bool) -> Self {
        ColumnValue::Bool(v)
    }
}

/// Column assignments for an insert or update
pub type Columns = Vec<(&'static str, ColumnValue)>;

fn push_value(qb: &mut QueryBuilder<'_, Sqlite>, value: ColumnValue) {
    match value {
        ColumnValue::Text(v) => qb.push_bind(v),
        ColumnValue::Int(v) => qb.push_bind(v),
        ColumnValue::Real(v) => qb.push_bind(v),
        ColumnValue::Bool(v) => qb.push_bind(v),
    };
}

/// Push `column` into `columns` when the patch field is present
fn set<V: Into<ColumnValue>>(columns: &mut Columns, column: &'static str, value: Option<V>) {
    if let Some(value) = value {
        columns.push((column, value.into()));
    }
}

/// Table description for a catalog entity
pub trait CatalogResource: Send + Sync + 'static {
    type Row: for<'r> sqlx::FromRow<'r, SqliteRow> + Serialize + Send + Unpin + 'static;
    type Create: Validate + DeserializeOwned + Send + Sync + 'static;
    type Update: Validate + DeserializeOwned + Send + Sync + 'static;

    const TABLE: &'static str;
    /// Human-readable name used in messages
    const LABEL: &'static str;
    const COLUMNS: &'static str;
    const UNIQUE_COLUMN: &'static str;
    const SEARCH_COLUMNS: &'static [&'static str];
    /// `(sortBy value, column)`
    const SORT_COLUMNS: &'static [(&'static str, &'static str)];

    fn unique_on_create(data: &Self::Create) -> &str;
    fn unique_on_update(data: &Self::Update) -> Option<&str>;
    fn create_columns(data: &Self::Create) -> Columns;
    fn update_columns(data: &Self::Update) -> Columns;

    /// Stored upload, removed from disk when the row is deleted
    fn image(_row: &Self::Row) -> Option<&str> {
        None
    }

    /// `(column, SQL expression)` pairs computed by the database on insert
    fn generated_columns() -> &'static [(&'static str, &'static str)] {
        &[]
    }

    /// `(table, label, id)` references that must exist
    fn create_references(_data: &Self::Create) -> Vec<(&'static str, &'static str, i64)> {
        Vec::new()
    }

    fn update_references(_data: &Self::Update) -> Vec<(&'static str, &'static str, i64)> {
        Vec::new()
    }

    /// Entity-specific equality filters
    fn push_filters(_qb: &mut QueryBuilder<'_, Sqlite>, _query: &CatalogQuery) {}
}

// =============================================================================
// Entities
// =============================================================================

const NAMED_COLUMNS: &str = "id, name_uz, name_ru, name_en, image, created_at, updated_at";
const NAME_SEARCH: &[&str] = &["name_uz", "name_ru", "name_en"];
const NAME_SORT: &[(&str, &str)] = &[("createdAt", "created_at"), ("nameUz", "name_uz")];

fn named_create(data: &NamedEntryCreate) -> Columns {
    vec![
        ("name_uz", (&data.name_uz).into()),
        ("name_ru", (&data.name_ru).into()),
        ("name_en", (&data.name_en).into()),
        ("image", (&data.image).into()),
    ]
}

fn named_update(data: &NamedEntryUpdate) -> Columns {
    let mut columns = Columns::new();
    set(&mut columns, "name_uz", data.name_uz.as_ref());
    set(&mut columns, "name_ru", data.name_ru.as_ref());
    set(&mut columns, "name_en", data.name_en.as_ref());
    set(&mut columns, "image", data.image.as_ref());
    columns
}

macro_rules! named_resource {
    ($(#[$meta:meta])* $name:ident, $table:literal, $label:literal) => {
        $(#[$meta])*
        pub struct $name;

        impl CatalogResource for $name {
            type Row = NamedEntry;
            type Create = NamedEntryCreate;
            type Update = NamedEntryUpdate;

            const TABLE: &'static str = $table;
            const LABEL: &'static str = $label;
            const COLUMNS: &'static str = NAMED_COLUMNS;
            const UNIQUE_COLUMN: &'static str = "name_uz";
            const SEARCH_COLUMNS: &'static [&'static str] = NAME_SEARCH;
            const SORT_COLUMNS: &'static [(&'static str, &'static str)] = NAME_SORT;

            fn unique_on_create(data: &Self::Create) -> &str {
                &data.name_uz
            }
            fn unique_on_update(data: &Self::Update) -> Option<&str> {
                data.name_uz.as_deref()
            }
            fn create_columns(data: &Self::Create) -> Columns {
                named_create(data)
            }
            fn update_columns(data: &Self::Update) -> Columns {
                named_update(data)
            }
            fn image(row: &Self::Row) -> Option<&str> {
                row.image.as_deref()
            }
        }
    };
}

named_resource!(Brands, "brands", "Brand");
named_resource!(Capacities, "capacities", "Capacity");
named_resource!(Sizes, "sizes", "Size");
named_resource!(
    /// Skill levels used for profession pricing
    Levels,
    "levels",
    "Level"
);
named_resource!(Regions, "regions", "Region");

pub struct Partners;

impl CatalogResource for Partners {
    type Row = Partner;
    type Create = PartnerCreate;
    type Update = PartnerUpdate;

    const TABLE: &'static str = "partners";
    const LABEL: &'static str = "Partner";
    const COLUMNS: &'static str = "id, name_uz, name_ru, name_en, image, link, created_at, updated_at";
    const UNIQUE_COLUMN: &'static str = "name_uz";
    const SEARCH_COLUMNS: &'static [&'static str] = NAME_SEARCH;
    const SORT_COLUMNS: &'static [(&'static str, &'static str)] = NAME_SORT;

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
            ("link", (&data.link).into()),
        ]
    }
    fn update_columns(data: &Self::Update) -> Columns {
        let mut columns = Columns::new();
        set(&mut columns, "name_uz", data.name_uz.as_ref());
        set(&mut columns, "name_ru", data.name_ru.as_ref());
        set(&mut columns, "name_en", data.name_en.as_ref());
        set(&mut columns, "image", data.image.as_ref());
        set(&mut columns, "link", data.link.as_ref());
        columns
    }
    fn image(row: &Self::Row) -> Option<&str> {
        Some(&row.image)
    }
}

pub struct Faqs;

impl CatalogResource for Faqs {
    type Row = Faq;
    type Create = FaqCreate;
    type Update = FaqUpdate;

    const TABLE: &'static str = "faqs";
    const LABEL: &'static str = "FAQ";
    const COLUMNS: &'static str = "id, question_uz, question_ru, question_en, answer_uz, answer_ru, answer_en, created_at, updated_at";
    const UNIQUE_COLUMN: &'static str = "question_uz";
    const SEARCH_COLUMNS: &'static [&'static str] = &["question_uz", "question_ru", "question_en"];
    const SORT_COLUMNS: &'static [(&'static str, &'static str)] =
        &[("createdAt", "created_at"), ("questionUz", "question_uz")];

    fn unique_on_create(data: &Self::Create) -> &str {
        &data.question_uz
    }
    fn unique_on_update(data: &Self::Update) -> Option<&str> {
        data.question_uz.as_deref()
    }
    fn create_columns(data: &Self::Create) -> Columns {
        vec![
            ("question_uz", (&data.question_uz).into()),
            ("question_ru", (&data.question_ru).into()),
            ("question_en", (&data.question_en).into()),
            ("answer_uz", (&data.answer_uz).into()),
            ("answer_ru", (&data.answer_ru).into()),
            ("answer_en", (&data.answer_en).into()),
        ]
    }
    fn update_columns(data: &Self::Update) -> Columns {
        let mut columns = Columns::new();
        set(&mut columns, "question_uz", data.question_uz.as_ref());
        set(&mut columns, "question_ru", data.question_ru.as_ref());
        set(&mut columns, "question_en", data.question_en.as_ref());
        set(&mut columns, "answer_uz", data.answer_uz.as_ref());
        set(&mut columns, "answer_ru", data.answer_ru.as_ref());
        set(&mut columns, "answer_en", data.answer_en.as_ref());
        columns
    }
}

pub struct Showcases;

impl CatalogResource for Showcases {
    type Row = Showcase;
    type Create = ShowcaseCreate;
    type Update = ShowcaseUpdate;

    const TABLE: &'static str = "showcases";
    const LABEL: &'static str = "Showcase";
    const COLUMNS: &'static str = "id, name_uz, name_ru, name_en, description_uz, description_ru, description_en, image, link, created_at, updated_at";
    const UNIQUE_COLUMN: &'static str = "name_uz";
    const SEARCH_COLUMNS: &'static [&'static str] = NAME_SEARCH;
    const SORT_COLUMNS: &'static [(&'static str, &'static str)] = NAME_SORT;

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
            ("description_uz", (&data.description_uz).into()),
            ("description_ru", (&data.description_ru).into()),
            ("description_en", (&data.description_en).into()),
            ("image", (&data.image).into()),
            ("link", (&data.link).into()),
        ]
    }
    fn update_columns(data: &Self::Update) -> Columns {
        let mut columns = Columns::new();
        set(&mut columns, "name_uz", data.name_uz.as_ref());
        set(&mut columns, "name_ru", data.name_ru.as_ref());
        set(&mut columns, "name_en", data.name_en.as_ref());
        set(&mut columns, "description_uz", data.description_uz.as_ref());
        set(&mut columns, "description_ru", data.description_ru.as_ref());
        set(&mut columns, "description_en", data.description_en.as_ref());
        set(&mut columns, "image", data.image.as_ref());
        set(&mut columns, "link", data.link.as_ref());
        columns
    }
    fn image(row: &Self::Row) -> Option<&str> {
        Some(&row.image)
    }
}

/// Rental tools, with brand/capacity/size references and a stock counter
pub struct Tools;

fn tool_references(
    brand_id: Option<i64>,
    capacity_id: Option<i64>,
    size_id: Option<i64>,
) -> Vec<(&'static str, &'static str, i64)> {
    let mut refs = Vec::new();
    if let Some(id) = brand_id {
        refs.push(("brands", "Brand", id));
    }
    if let Some(id) = capacity_id {
        refs.push(("capacities", "Capacity", id));
    }
    if let Some(id) = size_id {
        refs.push(("sizes", "Size", id));
    }
    refs
}

impl CatalogResource for Tools {
    type Row = Tool;
    type Create = ToolCreate;
    type Update = ToolUpdate;

    const TABLE: &'static str = "tools";
    const LABEL: &'static str = "Tool";
    const COLUMNS: &'static str = "id, code, name_uz, name_ru, name_en, description_uz, description_ru, description_en, \
         price, quantity, brand_id, capacity_id, size_id, image, is_available, created_at, updated_at";
    const UNIQUE_COLUMN: &'static str = "name_uz";
    const SEARCH_COLUMNS: &'static [&'static str] = NAME_SEARCH;
    const SORT_COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("createdAt", "created_at"),
        ("nameUz", "name_uz"),
        ("price", "price"),
        ("quantity", "quantity"),
    ];

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
            ("description_uz", (&data.description_uz).into()),
            ("description_ru", (&data.description_ru).into()),
            ("description_en", (&data.description_en).into()),
            ("price", data.price.into()),
            ("quantity", data.quantity.into()),
            ("brand_id", data.brand_id.into()),
            ("capacity_id", data.capacity_id.into()),
            ("size_id", data.size_id.into()),
            ("image", (&data.image).into()),
            ("is_available", data.is_available.into()),
        ]
    }
    fn update_columns(data: &Self::Update) -> Columns {
        let mut columns = Columns::new();
        set(&mut columns, "name_uz", data.name_uz.as_ref());
        set(&mut columns, "name_ru", data.name_ru.as_ref());
        set(&mut columns, "name_en", data.name_en.as_ref());
        set(&mut columns, "description_uz", data.description_uz.as_ref());
        set(&mut columns, "description_ru", data.description_ru.as_ref());
        set(&mut columns, "description_en", data.description_en.as_ref());
        set(&mut columns, "price", data.price);
        set(&mut columns, "quantity", data.quantity);
        set(&mut columns, "brand_id", data.brand_id);
        set(&mut columns, "capacity_id", data.capacity_id);
        set(&mut columns, "size_id", data.size_id);
        set(&mut columns, "image", data.image.as_ref());
        set(&mut columns, "is_available", data.is_available);
        columns
    }
    fn image(row: &Self::Row) -> Option<&str> {
        row.image.as_deref()
    }
    fn generated_columns() -> &'static [(&'static str, &'static str)] {
        &[("code", "(SELECT COALESCE(MAX(code), 100000) + 1 FROM tools)")]
    }
    fn create_references(data: &Self::Create) -> Vec<(&'static str, &'static str, i64)> {
        tool_references(data.brand_id, data.capacity_id, data.size_id)
    }
    fn update_references(data: &Self::Update) -> Vec<(&'static str, &'static str, i64)> {
        tool_references(data.brand_id, data.capacity_id, data.size_id)
    }
    fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, query: &CatalogQuery) {
        if let Some(brand_id) = query.brand_id {
            qb.push(" AND brand_id = ").push_bind(brand_id);
        }
        if let Some(capacity_id) = query.capacity_id {
            qb.push(" AND capacity_id = ").push_bind(capacity_id);
        }
        if let Some(size_id) = query.size_id {
            qb.push(" AND size_id = ").push_bind(size_id);
        }
        if let Some(is_available) = query.is_available {
            qb.push(" AND is_available = ").push_bind(is_available);
        }
    }
}

// =============================================================================
// Generic CRUD
// =============================================================================

fn push_where<R: CatalogResource>(qb: &mut QueryBuilder<'_, Sqlite>, query: &CatalogQuery) {
    qb.push(" WHERE 1 = 1");
    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = like_pattern(search);
        qb.push(" AND (");
        for (i, column) in R::SEARCH_COLUMNS.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(*column)
                .push(" LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\'");
        }
        qb.push(")");
    }
    R::push_filters(qb, query);
}

fn sort_column<R: CatalogResource>(sort_by: Option<&str>) -> RepoResult<&'static str> {
    let Some(sort_by) = sort_by else {
        return Ok("created_at");
    };
    R::SORT_COLUMNS
        .iter()
        .find(|(name, _)| *name == sort_by)
        .map(|(_, column)| *column)
        .ok_or_else(|| {
            let allowed: Vec<&str> = R::SORT_COLUMNS.iter().map(|(name, _)| *name).collect();
            RepoError::Validation(format!("sortBy must be one of: {}", allowed.join(", ")))
        })
}

/// Paginated listing with OR-search, filters and a single sort column
pub async fn list<R: CatalogResource>(
    pool: &SqlitePool,
    query: &CatalogQuery,
) -> RepoResult<(Vec<R::Row>, i64)> {
    let (_, limit, offset) = page_window(query.page, query.limit);
    let column = sort_column::<R>(query.sort_by.as_deref())?;

    let mut count = QueryBuilder::<Sqlite>::new(format!("SELECT COUNT(*) FROM {}", R::TABLE));
    push_where::<R>(&mut count, query);
    let total: i64 = count.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM {}", R::COLUMNS, R::TABLE));
    push_where::<R>(&mut select, query);
    select
        .push(format!(
            " ORDER BY {column} {}, id {} LIMIT ",
            query.order_by.as_sql(),
            query.order_by.as_sql()
        ))
        .push_bind(limit as i64)
        .push(" OFFSET ")
        .push_bind(offset);
    let rows = select.build_query_as::<R::Row>().fetch_all(pool).await?;
    Ok((rows, total))
}

pub async fn find_by_id<R: CatalogResource>(
    pool: &SqlitePool,
    id: i64,
) -> RepoResult<Option<R::Row>> {
    let row = sqlx::query_as::<_, R::Row>(&format!(
        "SELECT {} FROM {} WHERE id = ?",
        R::COLUMNS,
        R::TABLE
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

async fn ensure_unique<R: CatalogResource>(
    conn: &mut SqliteConnection,
    value: &str,
    exclude_id: Option<i64>,
) -> RepoResult<()> {
    let count: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM {} WHERE {} = ? AND id != ?",
        R::TABLE,
        R::UNIQUE_COLUMN
    ))
    .bind(value)
    .bind(exclude_id.unwrap_or(0))
    .fetch_one(&mut *conn)
    .await?;
    if count > 0 {
        return Err(RepoError::Duplicate(format!(
            "{} '{}' already exists",
            R::LABEL,
            value
        )));
    }
    Ok(())
}

async fn ensure_references(
    conn: &mut SqliteConnection,
    refs: Vec<(&'static str, &'static str, i64)>,
) -> RepoResult<()> {
    for (table, label, id) in refs {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE id = ?"))
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;
        if count == 0 {
            return Err(RepoError::Validation(format!("{label} ID {id} is invalid")));
        }
    }
    Ok(())
}

/// Insert a row on an open connection or transaction
pub async fn insert<R: CatalogResource>(
    conn: &mut SqliteConnection,
    data: &R::Create,
) -> RepoResult<i64> {
    ensure_unique::<R>(conn, R::unique_on_create(data), None).await?;
    ensure_references(conn, R::create_references(data)).await?;

    let now = now_millis();
    let mut columns = R::create_columns(data);
    columns.push(("created_at", ColumnValue::Int(Some(now))));
    columns.push(("updated_at", ColumnValue::Int(Some(now))));
    let generated = R::generated_columns();

    let mut qb = QueryBuilder::<Sqlite>::new(format!("INSERT INTO {} (", R::TABLE));
    let names: Vec<&str> = columns
        .iter()
        .map(|(name, _)| *name)
        .chain(generated.iter().map(|(name, _)| *name))
        .collect();
    qb.push(names.join(", ")).push(") VALUES (");
    let mut first = true;
    for (_, value) in columns {
        if !first {
            qb.push(", ");
        }
        first = false;
        push_value(&mut qb, value);
    }
    for (_, expr) in generated {
        qb.push(", ").push(*expr);
    }
    qb.push(") RETURNING id");

    let id: i64 = qb.build_query_scalar::<i64>().fetch_one(&mut *conn).await?;
    Ok(id)
}

/// Apply a partial update on an open connection or transaction
pub async fn apply_update<R: CatalogResource>(
    conn: &mut SqliteConnection,
    id: i64,
    data: &R::Update,
) -> RepoResult<()> {
    if let Some(value) = R::unique_on_update(data) {
        ensure_unique::<R>(conn, value, Some(id)).await?;
    }
    ensure_references(conn, R::update_references(data)).await?;

    let mut qb = QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET ", R::TABLE));
    for (column, value) in R::update_columns(data) {
        qb.push(column).push(" = ");
        push_value(&mut qb, value);
        qb.push(", ");
    }
    qb.push("updated_at = ")
        .push_bind(now_millis())
        .push(" WHERE id = ")
        .push_bind(id);

    let rows = qb.build().execute(&mut *conn).await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("{} {id} not found", R::LABEL)));
    }
    Ok(())
}

pub async fn create<R: CatalogResource>(pool: &SqlitePool, data: &R::Create) -> RepoResult<R::Row> {
    let mut conn = pool.acquire().await?;
    let id = insert::<R>(&mut conn, data).await?;
    drop(conn);
    find_by_id::<R>(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database(format!("Failed to create {}", R::LABEL)))
}

pub async fn update<R: CatalogResource>(
    pool: &SqlitePool,
    id: i64,
    data: &R::Update,
) -> RepoResult<R::Row> {
    let mut conn = pool.acquire().await?;
    apply_update::<R>(&mut conn, id, data).await?;
    drop(conn);
    find_by_id::<R>(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("{} {id} not found", R::LABEL)))
}

/// Hard delete. Returns the deleted row so callers can clean up its image.
pub async fn delete<R: CatalogResource>(pool: &SqlitePool, id: i64) -> RepoResult<R::Row> {
    let row = find_by_id::<R>(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("{} {id} not found", R::LABEL)))?;
    sqlx::query(&format!("DELETE FROM {} WHERE id = ?", R::TABLE))
        .bind(id)
        .execute(pool)
        .await?;
    Ok(row)
}
