pub mod config;
pub mod operations;
pub mod schema;

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

use crate::db::config::DbConfig;

/// SQLite handle shared by all handlers.
///
/// Reads go straight to the pool. Mutations go through [`Database::begin_write`],
/// which holds the process-wide writer gate for the lifetime of the transaction
/// so read-then-write sequences (survival lives, finish) cannot interleave.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    write_gate: Arc<Mutex<()>>,
}

impl Database {
    pub async fn connect(config: &DbConfig) -> Result<Self, DbInitError> {
        ensure_parent_dir(&config.url)?;

        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(config.journal_mode.as_sqlx())
            .busy_timeout(config.busy_timeout)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let db = Self {
            pool,
            write_gate: Arc::new(Mutex::new(())),
        };
        schema::apply(&db.pool).await?;

        tracing::info!(url = %config.url, "database ready");
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn begin_write(&self) -> Result<WriteTx<'_>, sqlx::Error> {
        let gate = self.write_gate.lock().await;
        let tx = self.pool.begin().await?;
        Ok(WriteTx { _gate: gate, tx })
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// A transaction holding the writer gate. Dropping it without `commit` rolls back.
pub struct WriteTx<'a> {
    _gate: MutexGuard<'a, ()>,
    tx: Transaction<'static, Sqlite>,
}

impl WriteTx<'_> {
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut *self.tx
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        let WriteTx { _gate, tx } = self;
        tx.commit().await
    }
}

fn ensure_parent_dir(url: &str) -> Result<(), DbInitError> {
    let raw = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    let path = raw.split('?').next().unwrap_or_default();

    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum DbInitError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
