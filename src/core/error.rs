use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuadcalcError {
    #[error("SQLite error: {0}")]
    RusqliteError(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Storage full: writing {bytes} bytes to '{key}' exceeds quota of {quota} bytes")]
    StorageFull {
        key: String,
        bytes: usize,
        quota: usize,
    },
    #[error("Invalid import: {0}")]
    InvalidImport(String),
}
