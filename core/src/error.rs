use thiserror::Error;

#[derive(Error, Debug)]
pub enum FarmError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type FarmResult<T> = Result<T, FarmError>;
