//! List query engine

use std::fmt::Write;
use std::sync::Arc;

use mylist_entries::{Category, ListEntry, ListStore, StoreError};

use crate::document::DisplayDocument;

pub struct ListQueryEngine {
    store: Arc<dyn ListStore>,
}

impl ListQueryEngine {
    pub fn new(store: Arc<dyn ListStore>) -> Self {
        Self { store }
    }

    /// Render the caller's own list.
    pub async fn render(
        &self,
        owner: &str,
        filter: Option<&str>,
    ) -> Result<DisplayDocument, StoreError> {
        let filter = normalize_filter(filter);
        let rows = self.store.query_by_owner(owner, filter).await?;

        tracing::debug!(owner = %owner, filter = ?filter, rows = rows.len(), "Rendering list");

        if rows.is_empty() {
            return Ok(DisplayDocument::public("No entries found."));
        }

        let mut text = String::new();
        match filter {
            Some(filter) => {
                let _ = writeln!(text, "Results for filter **{filter}**:");
                write_flat(&mut text, &rows);
            }
            None => write_grouped(&mut text, &rows),
        }

        Ok(DisplayDocument::public(text))
    }

    /// Render someone else's list, read-only.
    pub async fn render_foreign(
        &self,
        owner: &str,
        display_name: &str,
        filter: Option<&str>,
    ) -> Result<DisplayDocument, StoreError> {
        let filter = normalize_filter(filter);
        let rows = self.store.query_by_owner(owner, filter).await?;

        tracing::debug!(
            owner = %owner,
            filter = ?filter,
            rows = rows.len(),
            "Rendering foreign list"
        );

        if rows.is_empty() {
            return Ok(DisplayDocument::public(format!(
                "No entries found for {display_name}."
            )));
        }

        let mut text = format!("List of **{display_name}**:\n");
        match filter {
            Some(filter) => {
                let _ = writeln!(text, "(Filter: {filter})");
                write_flat(&mut text, &rows);
            }
            None => write_grouped(&mut text, &rows),
        }

        Ok(DisplayDocument::public(text))
    }
}

/// Groups rows by category in the declared category order, omitting empty groups.
///
/// Rows keep their relative order inside a group.
pub fn group_by_category(rows: &[ListEntry]) -> Vec<(Category, Vec<&ListEntry>)> {
    Category::ALL
        .iter()
        .filter_map(|category| {
            let group: Vec<&ListEntry> = rows.iter().filter(|e| e.category == *category).collect();
            if group.is_empty() {
                None
            } else {
                Some((*category, group))
            }
        })
        .collect()
}

fn normalize_filter(filter: Option<&str>) -> Option<&str> {
    filter.map(str::trim).filter(|f| !f.is_empty())
}

fn write_grouped(text: &mut String, rows: &[ListEntry]) {
    for (category, entries) in group_by_category(rows) {
        let _ = writeln!(text, "**{}**:", category.label());
        for entry in entries {
            let _ = writeln!(text, "- **{}** | {}", entry.title, entry.status);
        }
    }
}

fn write_flat(text: &mut String, rows: &[ListEntry]) {
    for entry in rows {
        let _ = writeln!(
            text,
            "- **{}** | {} | {}",
            entry.title, entry.category, entry.status
        );
    }
}
