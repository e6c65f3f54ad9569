use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DebtorsError {
    #[error("Config directory not found at {0}. Run 'debtors init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("Invalid JSON from {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected a list of sales from {0}")]
    UnexpectedPayload(String),

    #[error("Client {0} has no pending debt")]
    ClientNotFound(i64),

    #[error("Debt aggregation aborted: {0}")]
    Aggregation(String),
}

pub type Result<T> = std::result::Result<T, DebtorsError>;
