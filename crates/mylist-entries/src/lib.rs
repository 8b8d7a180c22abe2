//! MyList Entries
//!
//! A list entry is a title tagged with a category and a status, owned by one user.
//! Category and status come from closed sets and are validated before any write.
//!
//! The `ListStore` trait is the persistence port every other crate talks to.

mod category;
mod entry;
mod error;
mod memory;
mod store;

pub use category::{Category, Status};
pub use entry::{ListEntry, NewEntry};
pub use error::{EntryError, StoreError};
pub use memory::MemoryListStore;
pub use store::{ListStore, SqliteListStore};

pub type Result<T> = std::result::Result<T, EntryError>;
