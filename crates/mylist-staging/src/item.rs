//! Draft and queued batch items

use serde::{Deserialize, Serialize};

use mylist_entries::{Category, EntryError, NewEntry, Status};

use crate::error::StagingError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    AddBatch,
    UpdateBatch,
    RemoveBatch,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::AddBatch => "add batch",
            SessionKind::UpdateBatch => "update batch",
            SessionKind::RemoveBatch => "remove batch",
        }
    }

    /// Expected layout of one bulk-text line
    pub fn line_format(&self) -> &'static str {
        match self {
            SessionKind::AddBatch => "title, category, status",
            SessionKind::UpdateBatch => "title, new status",
            SessionKind::RemoveBatch => "title",
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An entry being filled in field by field. Last write wins for each field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedItem {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub status: Option<Status>,
}

impl StagedItem {
    pub fn set_title(&mut self, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(EntryError::EmptyTitle.into());
        }
        self.title = Some(title.to_string());
        Ok(())
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.is_none() {
            missing.push("title");
        }
        if self.category.is_none() {
            missing.push("category");
        }
        if self.status.is_none() {
            missing.push("status");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Convert into an insertable entry, or report which fields are unset.
    pub fn to_entry(&self) -> Result<NewEntry> {
        match (&self.title, self.category, self.status) {
            (Some(title), Some(category), Some(status)) => {
                Ok(NewEntry::new(title.clone(), category, status)?)
            }
            _ => Err(StagingError::IncompleteEntry {
                missing: self.missing_fields(),
            }),
        }
    }
}

/// One pending mutation waiting for commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum QueuedMutation {
    Add(NewEntry),
    UpdateStatus { title: String, status: Status },
    Remove { title: String },
}

impl QueuedMutation {
    pub fn title(&self) -> &str {
        match self {
            QueuedMutation::Add(entry) => &entry.title,
            QueuedMutation::UpdateStatus { title, .. } | QueuedMutation::Remove { title } => title,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            QueuedMutation::Add(entry) => {
                format!("{} | {} | {}", entry.title, entry.category, entry.status)
            }
            QueuedMutation::UpdateStatus { title, status } => format!("{title} → {status}"),
            QueuedMutation::Remove { title } => title.clone(),
        }
    }
}
