use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read access log: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode or decode report table: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid log file pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Template error: {0}")]
    Template(String),
}

pub type Result<T> = std::result::Result<T, Error>;
