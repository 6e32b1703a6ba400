use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("child not found: {0}")]
    ChildNotFound(i64),
    #[error("session not found: {0}")]
    SessionNotFound(i64),
    #[error("invalid mode: {0}")]
    InvalidMode(String),
    #[error("invalid difficulty: {0}")]
    InvalidDifficulty(String),
    #[error("invalid name: {0}")]
    InvalidName(&'static str),
    #[error("session already finished: {0}")]
    SessionClosed(i64),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
