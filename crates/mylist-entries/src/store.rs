//! Persistence port and its SQLite implementation

use async_trait::async_trait;
use rusqlite::Connection;

use mylist_storage::Database;

use crate::category::{Category, Status};
use crate::entry::{titles_match, ListEntry, NewEntry};
use crate::error::StoreError;

/// The four operations the bot needs from durable storage.
///
/// Title matching is case-insensitive and acts on every matching row, since
/// titles are not unique per owner.
#[async_trait]
pub trait ListStore: Send + Sync {
    async fn insert(&self, owner: &str, entry: &NewEntry) -> Result<(), StoreError>;

    /// Returns the number of rows deleted.
    async fn delete_by_title(&self, owner: &str, title: &str) -> Result<usize, StoreError>;

    /// Returns the number of rows updated.
    async fn update_status(
        &self,
        owner: &str,
        title: &str,
        status: Status,
    ) -> Result<usize, StoreError>;

    /// Rows of `owner`, ordered by stored category string.
    ///
    /// With a filter, only rows whose category or status equals it (case-insensitive).
    async fn query_by_owner(
        &self,
        owner: &str,
        filter: Option<&str>,
    ) -> Result<Vec<ListEntry>, StoreError>;
}

pub struct SqliteListStore {
    db: Database,
}

impl SqliteListStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn run_blocking<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Database) -> mylist_storage::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        let result = tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to join storage task: {e}")))?;
        Ok(result?)
    }
}

impl Clone for SqliteListStore {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

#[async_trait]
impl ListStore for SqliteListStore {
    async fn insert(&self, owner: &str, entry: &NewEntry) -> Result<(), StoreError> {
        let owner = owner.to_string();
        let entry = entry.clone();

        self.run_blocking(move |db| {
            db.with_connection(|conn| {
                conn.execute(
                    "INSERT INTO user_lists (user_id, title, category, status)
                     VALUES (?1, ?2, ?3, ?4)",
                    rusqlite::params![
                        owner,
                        entry.title,
                        entry.category.as_str(),
                        entry.status.as_str(),
                    ],
                )?;
                tracing::info!(owner = %owner, title = %entry.title, "Inserted entry");
                Ok(())
            })
        })
        .await
    }

    async fn delete_by_title(&self, owner: &str, title: &str) -> Result<usize, StoreError> {
        let owner = owner.to_string();
        let title = title.to_string();

        self.run_blocking(move |db| {
            db.transaction(|conn| {
                let ids = matching_ids(conn, &owner, &title)?;
                for id in &ids {
                    conn.execute("DELETE FROM user_lists WHERE id = ?1", [id])?;
                }
                tracing::info!(owner = %owner, title = %title, rows = ids.len(), "Deleted entries");
                Ok(ids.len())
            })
        })
        .await
    }

    async fn update_status(
        &self,
        owner: &str,
        title: &str,
        status: Status,
    ) -> Result<usize, StoreError> {
        let owner = owner.to_string();
        let title = title.to_string();

        self.run_blocking(move |db| {
            db.transaction(|conn| {
                let ids = matching_ids(conn, &owner, &title)?;
                for id in &ids {
                    conn.execute(
                        "UPDATE user_lists SET status = ?1 WHERE id = ?2",
                        rusqlite::params![status.as_str(), id],
                    )?;
                }
                tracing::info!(
                    owner = %owner,
                    title = %title,
                    status = %status,
                    rows = ids.len(),
                    "Updated entry status"
                );
                Ok(ids.len())
            })
        })
        .await
    }

    async fn query_by_owner(
        &self,
        owner: &str,
        filter: Option<&str>,
    ) -> Result<Vec<ListEntry>, StoreError> {
        let owner = owner.to_string();
        // Stored values are canonical lowercase, so folding the filter is enough
        let filter = filter
            .map(|f| f.trim().to_lowercase())
            .filter(|f| !f.is_empty());

        self.run_blocking(move |db| {
            db.with_connection(|conn| {
                let raw = match &filter {
                    Some(filter) => {
                        let mut stmt = conn.prepare(
                            "SELECT id, user_id, title, category, status FROM user_lists
                             WHERE user_id = ?1 AND (category = ?2 OR status = ?2)
                             ORDER BY category, id",
                        )?;
                        let rows = stmt
                            .query_map(rusqlite::params![owner, filter], read_row)?
                            .collect::<rusqlite::Result<Vec<_>>>()?;
                        rows
                    }
                    None => {
                        let mut stmt = conn.prepare(
                            "SELECT id, user_id, title, category, status FROM user_lists
                             WHERE user_id = ?1
                             ORDER BY category, id",
                        )?;
                        let rows = stmt
                            .query_map([&owner], read_row)?
                            .collect::<rusqlite::Result<Vec<_>>>()?;
                        rows
                    }
                };

                Ok(raw.into_iter().filter_map(RawRow::into_entry).collect())
            })
        })
        .await
    }
}

struct RawRow {
    id: i64,
    owner_id: String,
    title: String,
    category: String,
    status: String,
}

impl RawRow {
    fn into_entry(self) -> Option<ListEntry> {
        let category = self.category.parse::<Category>();
        let status = self.status.parse::<Status>();
        match (category, status) {
            (Ok(category), Ok(status)) => Some(ListEntry {
                id: self.id,
                owner_id: self.owner_id,
                title: self.title,
                category,
                status,
            }),
            _ => {
                tracing::warn!(
                    row_id = self.id,
                    category = %self.category,
                    status = %self.status,
                    "Skipping row with unknown category or status"
                );
                None
            }
        }
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        category: row.get(3)?,
        status: row.get(4)?,
    })
}

/// SQLite `LOWER` only folds ASCII, so titles are compared in Rust.
fn matching_ids(conn: &Connection, owner: &str, title: &str) -> mylist_storage::Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT id, title FROM user_lists WHERE user_id = ?1 ORDER BY id")?;
    let rows = stmt
        .query_map([owner], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows
        .into_iter()
        .filter(|(_, stored)| titles_match(stored, title))
        .map(|(id, _)| id)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteListStore {
        SqliteListStore::new(Database::open_in_memory().unwrap())
    }

    fn entry(title: &str, category: Category, status: Status) -> NewEntry {
        NewEntry::new(title, category, status).unwrap()
    }

    #[tokio::test]
    async fn test_title_operations_are_case_insensitive() {
        let store = store();
        store
            .insert("42", &entry("One Piece", Category::Manga, Status::InProgress))
            .await
            .unwrap();

        let updated = store
            .update_status("42", "one piece", Status::Finished)
            .await
            .unwrap();
        assert_eq!(updated, 1);

        let rows = store.query_by_owner("42", None).await.unwrap();
        assert_eq!(rows[0].status, Status::Finished);

        let deleted = store.delete_by_title("42", "ONE PIECE").await.unwrap();
        assert_eq!(deleted, 1);
        assert!(store.query_by_owner("42", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_title_operations_affect_all_duplicates() {
        let store = store();
        store
            .insert("42", &entry("Dark", Category::Serie, Status::Planned))
            .await
            .unwrap();
        store
            .insert("42", &entry("dark", Category::Anime, Status::Planned))
            .await
            .unwrap();
        store
            .insert("7", &entry("Dark", Category::Serie, Status::Planned))
            .await
            .unwrap();

        assert_eq!(store.delete_by_title("42", "DARK").await.unwrap(), 2);
        // Other owners are never touched
        assert_eq!(store.query_by_owner("7", None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unicode_titles_match_case_insensitively() {
        let store = store();
        store
            .insert("42", &entry("Élite", Category::Serie, Status::InProgress))
            .await
            .unwrap();

        assert_eq!(
            store
                .update_status("42", "ÉLITE", Status::Finished)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_missing_title_affects_no_rows() {
        let store = store();
        assert_eq!(store.delete_by_title("42", "Nope").await.unwrap(), 0);
        assert_eq!(
            store
                .update_status("42", "Nope", Status::Finished)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_query_orders_by_stored_category_string() {
        let store = store();
        store
            .insert("42", &entry("Tower of God", Category::Webtoon, Status::Planned))
            .await
            .unwrap();
        store
            .insert("42", &entry("Arcane", Category::Serie, Status::Finished))
            .await
            .unwrap();
        store
            .insert("42", &entry("Frieren", Category::Anime, Status::InProgress))
            .await
            .unwrap();

        let categories: Vec<Category> = store
            .query_by_owner("42", None)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.category)
            .collect();
        assert_eq!(
            categories,
            vec![Category::Anime, Category::Serie, Category::Webtoon]
        );
    }

    #[tokio::test]
    async fn test_filter_matches_category_or_status() {
        let store = store();
        store
            .insert("42", &entry("Naruto", Category::Manga, Status::Finished))
            .await
            .unwrap();
        store
            .insert("42", &entry("Arcane", Category::Serie, Status::Finished))
            .await
            .unwrap();
        store
            .insert("42", &entry("Bleach", Category::Manga, Status::InProgress))
            .await
            .unwrap();

        let manga = store.query_by_owner("42", Some("MANGA")).await.unwrap();
        assert_eq!(manga.len(), 2);

        let finished = store.query_by_owner("42", Some("Terminé")).await.unwrap();
        let titles: Vec<&str> = finished.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Naruto", "Arcane"]);

        assert!(store
            .query_by_owner("42", Some("webtoon"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_rows_with_unknown_values_are_skipped() {
        let db = Database::open_in_memory().unwrap();
        db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO user_lists (user_id, title, category, status)
                 VALUES ('42', 'Legacy', 'film', 'en cours')",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let store = SqliteListStore::new(db);
        store
            .insert("42", &entry("Naruto", Category::Manga, Status::Finished))
            .await
            .unwrap();

        let rows = store.query_by_owner("42", None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Naruto");
    }
}
