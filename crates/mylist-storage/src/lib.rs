//! MyList Storage Layer
//!
//! SQLite-based persistence for user content lists.
//! Multi-row mutations run inside a single transaction.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
