use sqlx::SqlitePool;

pub const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");
pub const SCHEMA_VERSION: &str = "1.0.0";

pub async fn apply(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in split_sql_statements(SCHEMA_SQL) {
        sqlx::query(&statement).execute(pool).await?;
    }

    sqlx::query(
        r#"INSERT OR REPLACE INTO "_db_metadata" ("key", "value") VALUES ('schema_version', ?)"#,
    )
    .bind(SCHEMA_VERSION)
    .execute(pool)
    .await?;

    tracing::debug!(version = SCHEMA_VERSION, "schema applied");
    Ok(())
}

/// Splits on `;` outside quoted text and drops `--` comments.
pub fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = sql.chars().peekable();

    while let Some(ch) = chars.next() {
        match quote {
            Some(open) => {
                if ch == open {
                    quote = None;
                }
                current.push(ch);
            }
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                '-' if chars.peek() == Some(&'-') => {
                    // comment runs to end of line
                    for skipped in chars.by_ref() {
                        if skipped == '\n' {
                            current.push('\n');
                            break;
                        }
                    }
                }
                ';' => push_statement(&mut statements, &mut current),
                _ => current.push(ch),
            },
        }
    }
    push_statement(&mut statements, &mut current);

    statements
}

fn push_statement(statements: &mut Vec<String>, current: &mut String) {
    let statement = current.trim();
    if !statement.is_empty() {
        statements.push(statement.to_string());
    }
    current.clear();
}
