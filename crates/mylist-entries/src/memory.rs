//! In-memory persistence port
//!
//! Same ordering and matching rules as `SqliteListStore`. Used for tests and
//! for running the bot without a database file.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::category::Status;
use crate::entry::{titles_match, ListEntry, NewEntry};
use crate::error::StoreError;
use crate::store::ListStore;

#[derive(Default)]
struct Rows {
    next_id: i64,
    entries: Vec<ListEntry>,
}

#[derive(Default)]
pub struct MemoryListStore {
    rows: Arc<RwLock<Rows>>,
}

impl MemoryListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every row of every owner, in insertion order.
    pub fn rows(&self) -> Vec<ListEntry> {
        self.rows.read().entries.clone()
    }
}

impl Clone for MemoryListStore {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

#[async_trait]
impl ListStore for MemoryListStore {
    async fn insert(&self, owner: &str, entry: &NewEntry) -> Result<(), StoreError> {
        let mut rows = self.rows.write();
        rows.next_id += 1;
        let id = rows.next_id;
        rows.entries.push(ListEntry {
            id,
            owner_id: owner.to_string(),
            title: entry.title.clone(),
            category: entry.category,
            status: entry.status,
        });
        Ok(())
    }

    async fn delete_by_title(&self, owner: &str, title: &str) -> Result<usize, StoreError> {
        let mut rows = self.rows.write();
        let before = rows.entries.len();
        rows.entries
            .retain(|e| !(e.owner_id == owner && titles_match(&e.title, title)));
        Ok(before - rows.entries.len())
    }

    async fn update_status(
        &self,
        owner: &str,
        title: &str,
        status: Status,
    ) -> Result<usize, StoreError> {
        let mut rows = self.rows.write();
        let mut affected = 0;
        for entry in rows
            .entries
            .iter_mut()
            .filter(|e| e.owner_id == owner && titles_match(&e.title, title))
        {
            entry.status = status;
            affected += 1;
        }
        Ok(affected)
    }

    async fn query_by_owner(
        &self,
        owner: &str,
        filter: Option<&str>,
    ) -> Result<Vec<ListEntry>, StoreError> {
        let filter = filter
            .map(|f| f.trim().to_lowercase())
            .filter(|f| !f.is_empty());

        let mut matching: Vec<ListEntry> = self
            .rows
            .read()
            .entries
            .iter()
            .filter(|e| e.owner_id == owner)
            .filter(|e| match &filter {
                Some(f) => e.category.as_str() == f.as_str() || e.status.as_str() == f.as_str(),
                None => true,
            })
            .cloned()
            .collect();

        // Stable sort keeps insertion order inside a category, like `ORDER BY category, id`
        matching.sort_by(|a, b| a.category.as_str().cmp(b.category.as_str()));
        Ok(matching)
    }
}
