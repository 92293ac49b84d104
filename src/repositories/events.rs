// src/repositories/events.rs
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::ApiResult;
use crate::models::Event;

/// Events scheduled at or after `now`, earliest first, at most `limit` rows.
///
/// Dates are compared through `julianday` because rows written outside this
/// crate may use SQLite's `YYYY-MM-DD HH:MM:SS` form instead of RFC 3339.
pub async fn fetch_upcoming_events(
    pool: &SqlitePool,
    now: DateTime<Utc>,
    limit: i64,
) -> ApiResult<Vec<Event>> {
    let events = sqlx::query_as::<_, Event>(
        r#"SELECT id, title, description, location, event_date, created_at
           FROM events
           WHERE julianday(event_date) >= julianday($1)
           ORDER BY julianday(event_date) ASC
           LIMIT $2"#,
    )
    .bind(now)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(events)
}

#[cfg(test)]
pub async fn insert_event(pool: &SqlitePool, title: &str, event_date: DateTime<Utc>) {
    sqlx::query(
        "INSERT INTO events (id, title, description, location, event_date, created_at) \
         VALUES ($1, $2, NULL, NULL, $3, $4)",
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(title)
    .bind(event_date)
    .bind(Utc::now())
    .execute(pool)
    .await
    .expect("insert event");
}
