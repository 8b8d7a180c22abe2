//! Bulk-text batch line parsing
//!
//! Lines are comma-delimited and split from the right, so a title may contain commas:
//! - add: `title, category, status`
//! - update: `title, new status`
//! - remove: `title`

use serde::Serialize;
use thiserror::Error;

use mylist_entries::{EntryError, NewEntry, Status};

use crate::item::{QueuedMutation, SessionKind};

/// Why a single line was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineFault {
    #[error("expected {expected} comma-separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error(transparent)]
    Entry(#[from] EntryError),
}

/// A rejected line, kept so the batch summary can itemize it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineError {
    /// 1-based, counted across every bulk submission of the session
    pub line_no: usize,
    pub raw: String,
    pub reason: String,
}

/// Parse one line for a session kind. Blank lines yield `Ok(None)`.
pub fn parse_batch_line(
    kind: SessionKind,
    raw: &str,
) -> std::result::Result<Option<QueuedMutation>, LineFault> {
    let line = raw.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mutation = match kind {
        SessionKind::AddBatch => {
            let [title, category, status] = split_fields::<3>(line)?;
            QueuedMutation::Add(NewEntry::parse(title, category, status)?)
        }
        SessionKind::UpdateBatch => {
            let [title, status] = split_fields::<2>(line)?;
            let status: Status = status.parse()?;
            QueuedMutation::UpdateStatus {
                title: non_empty_title(title)?,
                status,
            }
        }
        SessionKind::RemoveBatch => QueuedMutation::Remove {
            title: non_empty_title(line)?,
        },
    };

    Ok(Some(mutation))
}

fn split_fields<const N: usize>(line: &str) -> std::result::Result<[&str; N], LineFault> {
    let mut parts: Vec<&str> = line.rsplitn(N, ',').map(str::trim).collect();
    if parts.len() != N {
        return Err(LineFault::FieldCount {
            expected: N,
            found: parts.len(),
        });
    }
    parts.reverse();
    parts.try_into().map_err(|_| LineFault::FieldCount {
        expected: N,
        found: 0,
    })
}

fn non_empty_title(title: &str) -> std::result::Result<String, LineFault> {
    let title = title.trim();
    if title.is_empty() {
        return Err(EntryError::EmptyTitle.into());
    }
    Ok(title.to_string())
}
