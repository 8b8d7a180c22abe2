//! Entry error types

use thiserror::Error;

/// Validation failures on user-supplied entry fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("Invalid {field} `{value}`, expected one of: {expected}")]
    InvalidEnumValue {
        field: &'static str,
        value: String,
        expected: String,
    },

    #[error("Title cannot be empty")]
    EmptyTitle,
}

/// Failures raised by a `ListStore` implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] mylist_storage::StorageError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
