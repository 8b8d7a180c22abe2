//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Entry(#[from] mylist_entries::EntryError),

    #[error(transparent)]
    Store(#[from] mylist_entries::StoreError),

    #[error(transparent)]
    Staging(#[from] mylist_staging::StagingError),

    #[error("Storage error: {0}")]
    Storage(#[from] mylist_storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown command: /{0}")]
    UnknownCommand(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Unknown interaction: {0}")]
    UnknownInteraction(String),
}
