use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub journal_mode: SqliteJournalMode,
    pub busy_timeout: Duration,
}

impl DbConfig {
    pub fn from_env() -> Self {
        let url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "sqlite:./data/reading_game.db".to_string());

        let journal_mode = std::env::var("SQLITE_JOURNAL_MODE")
            .ok()
            .as_deref()
            .and_then(SqliteJournalMode::parse)
            .unwrap_or(SqliteJournalMode::Wal);

        let busy_timeout_ms = env_u64("SQLITE_BUSY_TIMEOUT_MS", 5000);
        let max_connections = env_u32("SQLITE_MAX_CONNECTIONS", 5).max(1);

        Self {
            url,
            max_connections,
            journal_mode,
            busy_timeout: Duration::from_millis(busy_timeout_ms),
        }
    }

    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 5,
            journal_mode: SqliteJournalMode::Wal,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqliteJournalMode {
    Wal,
    Delete,
    Truncate,
    Memory,
}

impl SqliteJournalMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "WAL" => Some(Self::Wal),
            "DELETE" => Some(Self::Delete),
            "TRUNCATE" => Some(Self::Truncate),
            "MEMORY" => Some(Self::Memory),
            _ => None,
        }
    }

    pub fn as_sqlx(self) -> sqlx::sqlite::SqliteJournalMode {
        match self {
            SqliteJournalMode::Wal => sqlx::sqlite::SqliteJournalMode::Wal,
            SqliteJournalMode::Delete => sqlx::sqlite::SqliteJournalMode::Delete,
            SqliteJournalMode::Truncate => sqlx::sqlite::SqliteJournalMode::Truncate,
            SqliteJournalMode::Memory => sqlx::sqlite::SqliteJournalMode::Memory,
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(default)
}
