use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(&'static str),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type MatchResult<T> = Result<T, MatchError>;
