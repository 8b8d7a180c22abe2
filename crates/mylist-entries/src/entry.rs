//! List entry data structures

use serde::{Deserialize, Serialize};

use crate::category::{Category, Status};
use crate::error::EntryError;
use crate::Result;

/// A stored row of a user's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    /// Surrogate key assigned by the store
    pub id: i64,
    /// Opaque identity of the user owning the row
    pub owner_id: String,
    pub title: String,
    pub category: Category,
    pub status: Status,
}

/// A validated entry ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub title: String,
    pub category: Category,
    pub status: Status,
}

impl NewEntry {
    pub fn new(title: impl Into<String>, category: Category, status: Status) -> Result<Self> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(EntryError::EmptyTitle);
        }

        Ok(Self {
            title,
            category,
            status,
        })
    }

    /// Build an entry from raw user text, validating both closed-set fields.
    pub fn parse(title: &str, category: &str, status: &str) -> Result<Self> {
        Self::new(title, category.parse()?, status.parse()?)
    }
}

impl ListEntry {
    /// Case-insensitive title comparison used by every title-based operation.
    pub fn title_matches(&self, title: &str) -> bool {
        titles_match(&self.title, title)
    }
}

pub(crate) fn titles_match(stored: &str, requested: &str) -> bool {
    stored.trim().to_lowercase() == requested.trim().to_lowercase()
}
