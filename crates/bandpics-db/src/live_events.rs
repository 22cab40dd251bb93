//! Database operations for the `live_events` table.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

const SELECT_COLUMNS: &str = "id, public_id, name, description, event_date, location, data, \
                              created_at, updated_at";

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `live_events` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LiveEventRow {
    pub id: i64,
    pub public_id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub location: Option<serde_json::Value>,
    pub data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values for an insert or a partial update.
///
/// `None` means "not provided": on insert the column is left `NULL`, on
/// update the stored value is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveEventChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub location: Option<serde_json::Value>,
    pub data: Option<serde_json::Value>,
}

impl LiveEventChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.event_date.is_none()
            && self.location.is_none()
            && self.data.is_none()
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns every live event, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_live_events(pool: &PgPool) -> Result<Vec<LiveEventRow>, DbError> {
    let rows = sqlx::query_as::<_, LiveEventRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM live_events ORDER BY created_at, id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single live event by public id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_live_event(
    pool: &PgPool,
    public_id: Uuid,
) -> Result<Option<LiveEventRow>, DbError> {
    let row = sqlx::query_as::<_, LiveEventRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM live_events WHERE public_id = $1"
    ))
    .bind(public_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Inserts a live event and returns the stored row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_live_event(
    pool: &PgPool,
    event: &LiveEventChanges,
) -> Result<LiveEventRow, DbError> {
    let row = sqlx::query_as::<_, LiveEventRow>(&format!(
        "INSERT INTO live_events (public_id, name, description, event_date, location, data) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {SELECT_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(event.name.as_deref())
    .bind(event.description.as_deref())
    .bind(event.event_date)
    .bind(event.location.as_ref())
    .bind(event.data.as_ref())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Applies the provided fields to an existing event and bumps `updated_at`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no event has `public_id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_live_event(
    pool: &PgPool,
    public_id: Uuid,
    changes: &LiveEventChanges,
) -> Result<LiveEventRow, DbError> {
    let row = sqlx::query_as::<_, LiveEventRow>(&format!(
        "UPDATE live_events SET \
             name = COALESCE($2, name), \
             description = COALESCE($3, description), \
             event_date = COALESCE($4, event_date), \
             location = COALESCE($5, location), \
             data = COALESCE($6, data), \
             updated_at = NOW() \
         WHERE public_id = $1 \
         RETURNING {SELECT_COLUMNS}"
    ))
    .bind(public_id)
    .bind(changes.name.as_deref())
    .bind(changes.description.as_deref())
    .bind(changes.event_date)
    .bind(changes.location.as_ref())
    .bind(changes.data.as_ref())
    .fetch_optional(pool)
    .await?;

    row.ok_or(DbError::NotFound)
}

/// Deletes a live event by public id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if nothing was deleted, or
/// [`DbError::Sqlx`] if the delete fails.
pub async fn delete_live_event(pool: &PgPool, public_id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM live_events WHERE public_id = $1")
        .bind(public_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
