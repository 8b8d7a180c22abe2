//! Staging error types

use thiserror::Error;

use mylist_entries::EntryError;

use crate::item::SessionKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StagingError {
    /// Invalid category/status or empty title, surfaced verbatim
    #[error(transparent)]
    Entry(#[from] EntryError),

    #[error("Entry is incomplete, missing: {}", .missing.join(", "))]
    IncompleteEntry { missing: Vec<&'static str> },

    #[error("Session is busy: {0}")]
    SessionBusy(String),

    #[error("Only the user who started this session can change it")]
    NotSessionOwner,

    #[error("This session has expired or is no longer active")]
    SessionExpired,

    #[error("{action} is not available in this {kind} session")]
    WrongKind {
        action: &'static str,
        kind: SessionKind,
    },

    #[error("Nothing is queued yet")]
    NothingQueued,
}
