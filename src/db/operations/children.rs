use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

use super::now_iso;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Child {
    pub id: i64,
    pub name: String,
}

pub async fn insert_child<'e, E>(executor: E, name: &str) -> Result<Child, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(r#"INSERT INTO "children" ("name", "created_at") VALUES (?, ?)"#)
        .bind(name)
        .bind(now_iso())
        .execute(executor)
        .await?;

    Ok(Child {
        id: result.last_insert_rowid(),
        name: name.to_string(),
    })
}

pub async fn get_child<'e, E>(executor: E, child_id: i64) -> Result<Option<Child>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(r#"SELECT "id", "name" FROM "children" WHERE "id" = ? LIMIT 1"#)
        .bind(child_id)
        .fetch_optional(executor)
        .await?;
    row.as_ref().map(map_child).transpose()
}

/// Newest first.
pub async fn list_children_desc<'e, E>(executor: E) -> Result<Vec<Child>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(r#"SELECT "id", "name" FROM "children" ORDER BY "id" DESC"#)
        .fetch_all(executor)
        .await?;
    rows.iter().map(map_child).collect()
}

pub async fn list_children_asc<'e, E>(executor: E) -> Result<Vec<Child>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(r#"SELECT "id", "name" FROM "children" ORDER BY "id" ASC"#)
        .fetch_all(executor)
        .await?;
    rows.iter().map(map_child).collect()
}

/// Sessions and attempts go with the child through `ON DELETE CASCADE`.
pub async fn delete_child<'e, E>(executor: E, child_id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(r#"DELETE FROM "children" WHERE "id" = ?"#)
        .bind(child_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

fn map_child(row: &SqliteRow) -> Result<Child, sqlx::Error> {
    Ok(Child {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}
