//! MyList Core
//!
//! Wires the persistence port, the list query engine and the staging registry
//! behind a single command router. Every inbound gateway event yields exactly
//! one `DisplayDocument`; failures are rendered, never propagated to the transport.

mod bot;
mod config;
mod error;
mod event;

pub use bot::{commands, ListBot};
pub use config::Config;
pub use error::CoreError;
pub use event::InboundEvent;

// Re-export core components
pub use mylist_entries::{
    Category, EntryError, ListEntry, ListStore, MemoryListStore, NewEntry, SqliteListStore,
    Status, StoreError,
};
pub use mylist_listing::{DisplayDocument, ListQueryEngine, Visibility, Widget};
pub use mylist_staging::{
    widget_ids, CommitSummary, SessionKind, SessionRegistry, StagingError, StagingSession,
};
pub use mylist_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// `RUST_LOG` wins over `default_filter`. Safe to call more than once.
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
