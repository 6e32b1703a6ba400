use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

use super::now_iso;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    pub id: i64,
    pub child_id: i64,
    pub mode: String,
    pub difficulty: String,
    pub theme_id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub exposure_ms: i64,
    pub items_total: i64,
}

impl SessionRecord {
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewSession<'a> {
    pub child_id: i64,
    pub mode: &'a str,
    pub difficulty: &'a str,
    pub theme_id: i64,
    pub exposure_ms: i64,
    pub items_total: i64,
}

pub async fn insert_session<'e, E>(
    executor: E,
    session: &NewSession<'_>,
) -> Result<SessionRecord, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let started_at = now_iso();
    let result = sqlx::query(
        r#"
        INSERT INTO "sessions"
          ("child_id", "mode", "difficulty", "theme_id", "started_at", "exposure_ms", "items_total")
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(session.child_id)
    .bind(session.mode)
    .bind(session.difficulty)
    .bind(session.theme_id)
    .bind(&started_at)
    .bind(session.exposure_ms)
    .bind(session.items_total)
    .execute(executor)
    .await?;

    Ok(SessionRecord {
        id: result.last_insert_rowid(),
        child_id: session.child_id,
        mode: session.mode.to_string(),
        difficulty: session.difficulty.to_string(),
        theme_id: session.theme_id,
        started_at,
        finished_at: None,
        exposure_ms: session.exposure_ms,
        items_total: session.items_total,
    })
}

pub async fn get_session<'e, E>(
    executor: E,
    session_id: i64,
) -> Result<Option<SessionRecord>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(r#"SELECT * FROM "sessions" WHERE "id" = ? LIMIT 1"#)
        .bind(session_id)
        .fetch_optional(executor)
        .await?;
    row.as_ref().map(map_session).transpose()
}

/// Stored exposure of the most recent finished session for this child, mode and tier.
pub async fn last_finished_exposure<'e, E>(
    executor: E,
    child_id: i64,
    mode: &str,
    difficulty: &str,
) -> Result<Option<i64>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(
        r#"
        SELECT "exposure_ms" FROM "sessions"
        WHERE "child_id" = ? AND "mode" = ? AND "difficulty" = ? AND "finished_at" IS NOT NULL
        ORDER BY "id" DESC
        LIMIT 1
        "#,
    )
    .bind(child_id)
    .bind(mode)
    .bind(difficulty)
    .fetch_optional(executor)
    .await
}

/// Sets `finished_at` (and optionally a new exposure) on an active session.
/// Returns `false` when the session was already finished.
pub async fn mark_session_finished<'e, E>(
    executor: E,
    session_id: i64,
    exposure_ms: Option<i64>,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE "sessions"
        SET "finished_at" = ?, "exposure_ms" = COALESCE(?, "exposure_ms")
        WHERE "id" = ? AND "finished_at" IS NULL
        "#,
    )
    .bind(now_iso())
    .bind(exposure_ms)
    .bind(session_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_finished_sessions_for_child<'e, E>(
    executor: E,
    child_id: i64,
) -> Result<Vec<SessionRecord>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        r#"
        SELECT * FROM "sessions"
        WHERE "child_id" = ? AND "finished_at" IS NOT NULL
        ORDER BY "id" ASC
        "#,
    )
    .bind(child_id)
    .fetch_all(executor)
    .await?;
    rows.iter().map(map_session).collect()
}

fn map_session(row: &SqliteRow) -> Result<SessionRecord, sqlx::Error> {
    Ok(SessionRecord {
        id: row.try_get("id")?,
        child_id: row.try_get("child_id")?,
        mode: row.try_get("mode")?,
        difficulty: row.try_get("difficulty")?,
        theme_id: row.try_get("theme_id")?,
        started_at: row.try_get("started_at")?,
        finished_at: row.try_get("finished_at")?,
        exposure_ms: row.try_get("exposure_ms")?,
        items_total: row.try_get("items_total")?,
    })
}
