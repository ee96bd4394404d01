use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiverError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mail store error: {0}")]
    Store(#[from] StoreError),

    #[error("Archive path store error: {0}")]
    PathStore(#[from] PathStoreError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid skip rule for account '{account}': {reason}")]
    InvalidSkipRule { account: String, reason: String },
}

/// Failures reported by a mail collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to look up folder '{name}': {reason}")]
    Lookup { name: String, reason: String },

    /// The collaborator cannot look a child up by name; callers fall back
    /// to enumerating children.
    #[error("Direct folder lookup is not supported")]
    LookupUnsupported,

    #[error("Failed to create folder '{name}': {reason}")]
    CreateFolder { name: String, reason: String },

    #[error("Failed to enumerate '{folder}': {reason}")]
    Enumerate { folder: String, reason: String },

    #[error("Failed to read message: {0}")]
    ReadItem(String),

    #[error("Failed to move message to '{destination}': {reason}")]
    MoveItem { destination: String, reason: String },

    #[error("Inbox not available for account '{0}'")]
    NoInbox(String),

    #[error("IO error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum PathStoreError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode archive paths: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config file '{0}' is not a JSON object")]
    NotAnObject(PathBuf),
}

pub type Result<T> = std::result::Result<T, ArchiverError>;
