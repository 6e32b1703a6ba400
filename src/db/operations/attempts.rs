use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

use super::now_iso;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    pub id: i64,
    pub session_id: i64,
    pub item_id: String,
    pub correct: bool,
    pub reaction_ms: i64,
    pub shown_ms: i64,
}

#[derive(Debug, Clone)]
pub struct NewAttempt<'a> {
    pub session_id: i64,
    pub item_id: &'a str,
    pub correct: bool,
    pub reaction_ms: i64,
    pub shown_ms: i64,
}

pub async fn insert_attempt<'e, E>(executor: E, attempt: &NewAttempt<'_>) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO "attempts"
          ("session_id", "item_id", "correct", "reaction_ms", "shown_ms", "created_at")
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(attempt.session_id)
    .bind(attempt.item_id)
    .bind(i64::from(attempt.correct))
    .bind(attempt.reaction_ms)
    .bind(attempt.shown_ms)
    .bind(now_iso())
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn count_wrong_attempts<'e, E>(executor: E, session_id: i64) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(
        r#"SELECT COUNT(*) FROM "attempts" WHERE "session_id" = ? AND "correct" = 0"#,
    )
    .bind(session_id)
    .fetch_one(executor)
    .await
}

pub async fn list_session_attempts<'e, E>(
    executor: E,
    session_id: i64,
) -> Result<Vec<AttemptRecord>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        r#"
        SELECT "id", "session_id", "item_id", "correct", "reaction_ms", "shown_ms"
        FROM "attempts"
        WHERE "session_id" = ?
        ORDER BY "id" ASC
        "#,
    )
    .bind(session_id)
    .fetch_all(executor)
    .await?;
    rows.iter().map(map_attempt).collect()
}

/// Attempts belonging to the child's finished sessions.
pub async fn list_finished_attempts_for_child<'e, E>(
    executor: E,
    child_id: i64,
) -> Result<Vec<AttemptRecord>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        r#"
        SELECT a."id", a."session_id", a."item_id", a."correct", a."reaction_ms", a."shown_ms"
        FROM "attempts" a
        JOIN "sessions" s ON s."id" = a."session_id"
        WHERE s."child_id" = ? AND s."finished_at" IS NOT NULL
        ORDER BY a."id" ASC
        "#,
    )
    .bind(child_id)
    .fetch_all(executor)
    .await?;
    rows.iter().map(map_attempt).collect()
}

fn map_attempt(row: &SqliteRow) -> Result<AttemptRecord, sqlx::Error> {
    Ok(AttemptRecord {
        id: row.try_get("id")?,
        session_id: row.try_get("session_id")?,
        item_id: row.try_get("item_id")?,
        correct: row.try_get::<i64, _>("correct")? != 0,
        reaction_ms: row.try_get("reaction_ms")?,
        shown_ms: row.try_get("shown_ms")?,
    })
}
