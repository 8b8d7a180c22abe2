//! Command router
//!
//! Maps gateway events to single-item store calls, list rendering, or
//! staging session transitions. Widget events carry a `session_ref`; the
//! session is looked up and locked for the duration of the transition.

use std::collections::HashMap;
use std::sync::Arc;

use mylist_entries::{ListStore, NewEntry, SqliteListStore, Status};
use mylist_listing::{DisplayDocument, ListQueryEngine};
use mylist_staging::{widget_ids, SessionKind, SessionRegistry};
use mylist_storage::Database;

use crate::config::Config;
use crate::error::CoreError;
use crate::event::InboundEvent;
use crate::Result;

pub mod commands {
    pub const ADD: &str = "add";
    pub const UPDATE: &str = "update";
    pub const REMOVE: &str = "remove";
    pub const MYLIST: &str = "mylist";
    pub const LISTUSER: &str = "listuser";
    pub const ADD_BATCH: &str = "addbatch";
    pub const UPDATE_BATCH: &str = "updatebatch";
    pub const REMOVE_BATCH: &str = "removebatch";
}

pub struct ListBot {
    store: Arc<dyn ListStore>,
    registry: SessionRegistry,
    listing: ListQueryEngine,
}

impl ListBot {
    pub fn new(store: Arc<dyn ListStore>, registry: SessionRegistry) -> Self {
        let listing = ListQueryEngine::new(Arc::clone(&store));
        Self {
            store,
            registry,
            listing,
        }
    }

    /// Open the SQLite store and an empty session registry from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let ttl = config.session_ttl()?;

        if let Some(parent) = config.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CoreError::Config(format!(
                        "failed to create data directory `{}`: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let db = Database::open(&config.database_path)?;
        let store: Arc<dyn ListStore> = Arc::new(SqliteListStore::new(db));
        Ok(Self::new(store, SessionRegistry::new(ttl)))
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Handle one event. Errors become an owner-only explanatory document.
    pub async fn handle(&self, event: InboundEvent) -> DisplayDocument {
        let owner = event.owner().to_string();
        match self.dispatch(event).await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(owner = %owner, error = %e, "Interaction failed");
                DisplayDocument::owner_only(e.to_string())
            }
        }
    }

    /// JSON in, JSON out, for transport adapters.
    pub async fn handle_json(&self, raw: &str) -> Result<String> {
        let event: InboundEvent = serde_json::from_str(raw)?;
        let doc = self.handle(event).await;
        Ok(serde_json::to_string(&doc)?)
    }

    async fn dispatch(&self, event: InboundEvent) -> Result<DisplayDocument> {
        match event {
            InboundEvent::SlashCommand { name, owner, args } => {
                self.slash_command(&name, &owner, &args).await
            }
            InboundEvent::ButtonPress {
                session_ref,
                owner,
                button_id,
            } => self.button_press(&session_ref, &owner, &button_id).await,
            InboundEvent::MenuSelect {
                session_ref,
                owner,
                menu_id,
                values,
            } => self.menu_select(&session_ref, &owner, &menu_id, &values).await,
            InboundEvent::FormSubmit {
                session_ref,
                owner,
                fields,
            } => self.form_submit(&session_ref, &owner, &fields).await,
        }
    }

    async fn slash_command(
        &self,
        name: &str,
        owner: &str,
        args: &HashMap<String, String>,
    ) -> Result<DisplayDocument> {
        tracing::debug!(command = %name, owner = %owner, "Slash command");

        match name {
            commands::ADD => {
                let entry = NewEntry::parse(
                    required(args, "title")?,
                    required(args, "category")?,
                    required(args, "status")?,
                )?;
                self.store.insert(owner, &entry).await?;
                Ok(DisplayDocument::public(format!(
                    "Added **{}** ({}) with status **{}**.",
                    entry.title, entry.category, entry.status
                )))
            }
            commands::UPDATE => {
                let title = required(args, "title")?;
                let status: Status = required(args, "new_status")?.parse()?;
                let rows = self.store.update_status(owner, title, status).await?;
                if rows == 0 {
                    return Ok(not_found(title));
                }
                Ok(DisplayDocument::public(format!(
                    "Updated: **{}** is now **{}**.",
                    title.trim(),
                    status
                )))
            }
            commands::REMOVE => {
                let title = required(args, "title")?;
                let rows = self.store.delete_by_title(owner, title).await?;
                if rows == 0 {
                    return Ok(not_found(title));
                }
                Ok(DisplayDocument::public(format!(
                    "Removed **{}**.",
                    title.trim()
                )))
            }
            commands::MYLIST => Ok(self.listing.render(owner, optional(args, "filter")).await?),
            commands::LISTUSER => {
                let user = required(args, "user")?;
                let display_name = optional(args, "display_name").unwrap_or(user);
                Ok(self
                    .listing
                    .render_foreign(user, display_name, optional(args, "filter"))
                    .await?)
            }
            commands::ADD_BATCH => self.start_batch(owner, SessionKind::AddBatch).await,
            commands::UPDATE_BATCH => self.start_batch(owner, SessionKind::UpdateBatch).await,
            commands::REMOVE_BATCH => self.start_batch(owner, SessionKind::RemoveBatch).await,
            other => Err(CoreError::UnknownCommand(other.to_string())),
        }
    }

    async fn start_batch(&self, owner: &str, kind: SessionKind) -> Result<DisplayDocument> {
        let opened = self.registry.open(owner, kind).await?;
        let mut doc = opened.lease.prompt();
        if opened.resumed {
            doc.text = format!("Resuming your unfinished batch.\n{}", doc.text);
        }
        Ok(doc)
    }

    async fn button_press(
        &self,
        session_ref: &str,
        owner: &str,
        button_id: &str,
    ) -> Result<DisplayDocument> {
        let mut session = self.registry.acquire(session_ref).await?;

        match button_id {
            widget_ids::NEW_ENTRY => {
                session.begin_draft_entry(owner)?;
                Ok(session.prompt())
            }
            widget_ids::FINALIZE => {
                session.finalize_draft(owner)?;
                Ok(session.prompt())
            }
            widget_ids::BULK => {
                if session.owner_id != owner {
                    return Err(mylist_staging::StagingError::NotSessionOwner.into());
                }
                Ok(session.bulk_form())
            }
            widget_ids::COMMIT => {
                let summary = session.commit(owner, self.store.as_ref()).await?;
                Ok(DisplayDocument::public(summary.render()))
            }
            widget_ids::CANCEL => {
                session.cancel(owner)?;
                Ok(DisplayDocument::owner_only(
                    "Batch cancelled, nothing was saved.",
                ))
            }
            other => Err(CoreError::UnknownInteraction(other.to_string())),
        }
    }

    async fn menu_select(
        &self,
        session_ref: &str,
        owner: &str,
        menu_id: &str,
        values: &[String],
    ) -> Result<DisplayDocument> {
        let mut session = self.registry.acquire(session_ref).await?;
        let value = values
            .first()
            .map(String::as_str)
            .ok_or(CoreError::MissingArgument("value"))?;

        match menu_id {
            widget_ids::CATEGORY_MENU => session.set_draft_category(owner, value)?,
            widget_ids::STATUS_MENU => session.set_draft_status(owner, value)?,
            other => return Err(CoreError::UnknownInteraction(other.to_string())),
        }
        Ok(session.prompt())
    }

    async fn form_submit(
        &self,
        session_ref: &str,
        owner: &str,
        fields: &HashMap<String, String>,
    ) -> Result<DisplayDocument> {
        let mut session = self.registry.acquire(session_ref).await?;

        if let Some(title) = fields.get(widget_ids::TITLE_FORM) {
            session.set_draft_title(owner, title)?;
        } else if let Some(lines) = fields.get(widget_ids::LINES_FORM) {
            session.enqueue_batch_text(owner, lines)?;
        } else {
            let mut names: Vec<&str> = fields.keys().map(String::as_str).collect();
            names.sort_unstable();
            return Err(CoreError::UnknownInteraction(format!(
                "form with fields [{}]",
                names.join(", ")
            )));
        }
        Ok(session.prompt())
    }
}

fn required<'a>(args: &'a HashMap<String, String>, name: &'static str) -> Result<&'a str> {
    optional(args, name).ok_or(CoreError::MissingArgument(name))
}

fn optional<'a>(args: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    args.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn not_found(title: &str) -> DisplayDocument {
    DisplayDocument::owner_only(format!("No entry titled **{}** in your list.", title.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mylist_entries::{Category, ListEntry, MemoryListStore, StoreError};
    use mylist_listing::Visibility;
    use mylist_staging::ManualClock;

    /// Store whose every call fails, as when the database is unreachable.
    struct UnavailableStore;

    #[async_trait]
    impl ListStore for UnavailableStore {
        async fn insert(&self, _owner: &str, _entry: &NewEntry) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("database is locked".into()))
        }

        async fn delete_by_title(
            &self,
            _owner: &str,
            _title: &str,
        ) -> std::result::Result<usize, StoreError> {
            Err(StoreError::Unavailable("database is locked".into()))
        }

        async fn update_status(
            &self,
            _owner: &str,
            _title: &str,
            _status: Status,
        ) -> std::result::Result<usize, StoreError> {
            Err(StoreError::Unavailable("database is locked".into()))
        }

        async fn query_by_owner(
            &self,
            _owner: &str,
            _filter: Option<&str>,
        ) -> std::result::Result<Vec<ListEntry>, StoreError> {
            Err(StoreError::Unavailable("database is locked".into()))
        }
    }

    fn bot() -> (ListBot, MemoryListStore, Arc<ManualClock>) {
        let store = MemoryListStore::new();
        let clock = Arc::new(ManualClock::default());
        let registry = SessionRegistry::with_clock(chrono::Duration::seconds(300), clock.clone());
        let bot = ListBot::new(Arc::new(store.clone()), registry);
        (bot, store, clock)
    }

    fn press(session_ref: &str, owner: &str, button_id: &str) -> InboundEvent {
        InboundEvent::ButtonPress {
            session_ref: session_ref.into(),
            owner: owner.into(),
            button_id: button_id.into(),
        }
    }

    fn select(session_ref: &str, owner: &str, menu_id: &str, value: &str) -> InboundEvent {
        InboundEvent::MenuSelect {
            session_ref: session_ref.into(),
            owner: owner.into(),
            menu_id: menu_id.into(),
            values: vec![value.into()],
        }
    }

    fn submit(session_ref: &str, owner: &str, field: &str, value: &str) -> InboundEvent {
        InboundEvent::FormSubmit {
            session_ref: session_ref.into(),
            owner: owner.into(),
            fields: HashMap::from([(field.to_string(), value.to_string())]),
        }
    }

    async fn start(bot: &ListBot, command: &str, owner: &str) -> String {
        let doc = bot.handle(InboundEvent::command(command, owner, &[])).await;
        doc.session_ref.expect("batch prompt carries a session ref")
    }

    async fn stage(bot: &ListBot, session_ref: &str, title: &str, category: &str, status: &str) {
        bot.handle(press(session_ref, "42", widget_ids::NEW_ENTRY)).await;
        bot.handle(submit(session_ref, "42", widget_ids::TITLE_FORM, title))
            .await;
        bot.handle(select(session_ref, "42", widget_ids::CATEGORY_MENU, category))
            .await;
        bot.handle(select(session_ref, "42", widget_ids::STATUS_MENU, status))
            .await;
        let doc = bot.handle(press(session_ref, "42", widget_ids::FINALIZE)).await;
        assert!(doc.text.contains(title), "unexpected prompt: {}", doc.text);
    }

    #[tokio::test]
    async fn test_add_batch_scenario() {
        let (bot, store, _clock) = bot();
        let session_ref = start(&bot, commands::ADD_BATCH, "42").await;

        stage(&bot, &session_ref, "Naruto", "manga", "en cours").await;
        stage(&bot, &session_ref, "Bleach", "manga", "terminé").await;

        let summary = bot
            .handle(press(&session_ref, "42", widget_ids::COMMIT))
            .await;
        assert_eq!(summary.text, "2 succeeded, 0 errors");

        let rows = store.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Naruto");
        assert_eq!(rows[0].status, Status::InProgress);
        assert_eq!(rows[1].title, "Bleach");
        assert_eq!(rows[1].status, Status::Finished);
        assert!(bot.registry().is_empty());

        let late = bot
            .handle(press(&session_ref, "42", widget_ids::COMMIT))
            .await;
        assert_eq!(late.text, "This session has expired or is no longer active");
    }

    #[tokio::test]
    async fn test_bulk_lines_with_partial_success() {
        let (bot, store, _clock) = bot();
        let session_ref = start(&bot, commands::ADD_BATCH, "42").await;

        let form = bot.handle(press(&session_ref, "42", widget_ids::BULK)).await;
        assert!(form.has_widget(widget_ids::LINES_FORM));
        assert_eq!(form.visibility, Visibility::OwnerOnly);

        let prompt = bot
            .handle(submit(
                &session_ref,
                "42",
                widget_ids::LINES_FORM,
                "Naruto, manga, en cours\nX, notacategory, en cours",
            ))
            .await;
        assert!(prompt.text.contains("(1 queued)"));
        assert!(prompt.text.contains("line 2 `X, notacategory, en cours`"));

        let summary = bot
            .handle(press(&session_ref, "42", widget_ids::COMMIT))
            .await;
        assert!(summary.text.starts_with("1 succeeded, 0 errors"));
        assert!(summary.text.contains("1 line(s) were rejected"));
        assert_eq!(store.rows().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_remove_batches() {
        let (bot, store, _clock) = bot();
        for title in ["One Piece", "Dark", "Arcane"] {
            bot.handle(InboundEvent::command(
                commands::ADD,
                "42",
                &[("title", title), ("category", "série"), ("status", "en cours")],
            ))
            .await;
        }

        let update_ref = start(&bot, commands::UPDATE_BATCH, "42").await;
        bot.handle(submit(
            &update_ref,
            "42",
            widget_ids::LINES_FORM,
            "one piece, terminé\nUnknown, terminé",
        ))
        .await;
        let summary = bot
            .handle(press(&update_ref, "42", widget_ids::COMMIT))
            .await;
        assert!(summary.text.starts_with("1 succeeded, 1 errors"));
        assert!(summary.text.contains("#2 Unknown → terminé: no entry titled `Unknown`"));

        let remove_ref = start(&bot, commands::REMOVE_BATCH, "42").await;
        bot.handle(submit(&remove_ref, "42", widget_ids::LINES_FORM, "DARK\narcane"))
            .await;
        let summary = bot
            .handle(press(&remove_ref, "42", widget_ids::COMMIT))
            .await;
        assert_eq!(summary.text, "2 succeeded, 0 errors");

        let rows = store.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, Status::Finished);
    }

    #[tokio::test]
    async fn test_other_users_cannot_drive_a_session() {
        let (bot, _store, _clock) = bot();
        let session_ref = start(&bot, commands::ADD_BATCH, "42").await;

        let doc = bot
            .handle(press(&session_ref, "7", widget_ids::NEW_ENTRY))
            .await;
        assert_eq!(doc.text, "Only the user who started this session can change it");
        assert_eq!(doc.visibility, Visibility::OwnerOnly);

        let doc = bot.handle(press(&session_ref, "7", widget_ids::BULK)).await;
        assert_eq!(doc.text, "Only the user who started this session can change it");

        let doc = bot
            .handle(press(&session_ref, "7", widget_ids::CANCEL))
            .await;
        assert!(doc.text.starts_with("Only the user"));
        assert_eq!(bot.registry().len(), 1);

        // The owner's view is untouched
        let prompt = bot
            .handle(press(&session_ref, "42", widget_ids::NEW_ENTRY))
            .await;
        assert!(prompt.has_widget(widget_ids::CATEGORY_MENU));
    }

    #[tokio::test]
    async fn test_invalid_menu_value_is_surfaced() {
        let (bot, _store, _clock) = bot();
        let session_ref = start(&bot, commands::ADD_BATCH, "42").await;
        bot.handle(press(&session_ref, "42", widget_ids::NEW_ENTRY))
            .await;

        let doc = bot
            .handle(select(&session_ref, "42", widget_ids::CATEGORY_MENU, "film"))
            .await;
        assert!(doc.text.starts_with("Invalid category `film`"));

        let doc = bot
            .handle(press(&session_ref, "42", widget_ids::FINALIZE))
            .await;
        assert_eq!(
            doc.text,
            "Entry is incomplete, missing: title, category, status"
        );
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected() {
        let (bot, _store, clock) = bot();
        let session_ref = start(&bot, commands::REMOVE_BATCH, "42").await;

        clock.advance(chrono::Duration::seconds(301));
        let doc = bot
            .handle(press(&session_ref, "42", widget_ids::COMMIT))
            .await;
        assert_eq!(doc.text, "This session has expired or is no longer active");
        assert!(bot.registry().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_batch_command_resumes() {
        let (bot, _store, _clock) = bot();
        let first = start(&bot, commands::REMOVE_BATCH, "42").await;
        bot.handle(submit(&first, "42", widget_ids::LINES_FORM, "Naruto"))
            .await;

        let doc = bot
            .handle(InboundEvent::command(commands::REMOVE_BATCH, "42", &[]))
            .await;
        assert_eq!(doc.session_ref.as_deref(), Some(first.as_str()));
        assert!(doc.text.starts_with("Resuming your unfinished batch."));
        assert!(doc.text.contains("1. Naruto"));

        let busy = bot
            .handle(InboundEvent::command(commands::ADD_BATCH, "42", &[]))
            .await;
        assert!(busy.text.starts_with("Session is busy"));
        assert!(busy.session_ref.is_none());
    }

    #[tokio::test]
    async fn test_single_item_commands() {
        let (bot, store, _clock) = bot();

        let added = bot
            .handle(InboundEvent::command(
                commands::ADD,
                "42",
                &[("title", "One Piece"), ("category", "Manga"), ("status", "en cours")],
            ))
            .await;
        assert_eq!(
            added.text,
            "Added **One Piece** (manga) with status **en cours**."
        );
        assert_eq!(added.visibility, Visibility::Public);

        let updated = bot
            .handle(InboundEvent::command(
                commands::UPDATE,
                "42",
                &[("title", "one piece"), ("new_status", "terminé")],
            ))
            .await;
        assert_eq!(updated.text, "Updated: **one piece** is now **terminé**.");
        assert_eq!(store.rows()[0].status, Status::Finished);

        let missing = bot
            .handle(InboundEvent::command(
                commands::REMOVE,
                "42",
                &[("title", "Bleach")],
            ))
            .await;
        assert_eq!(missing.text, "No entry titled **Bleach** in your list.");

        let removed = bot
            .handle(InboundEvent::command(
                commands::REMOVE,
                "42",
                &[("title", "ONE PIECE")],
            ))
            .await;
        assert_eq!(removed.text, "Removed **ONE PIECE**.");
        assert!(store.rows().is_empty());
    }

    #[tokio::test]
    async fn test_single_add_validates_before_writing() {
        let (bot, store, _clock) = bot();

        let doc = bot
            .handle(InboundEvent::command(
                commands::ADD,
                "42",
                &[("title", "X"), ("category", "film"), ("status", "en cours")],
            ))
            .await;
        assert!(doc.text.starts_with("Invalid category `film`"));

        let doc = bot
            .handle(InboundEvent::command(
                commands::ADD,
                "42",
                &[("title", "X"), ("category", "manga")],
            ))
            .await;
        assert_eq!(doc.text, "Missing argument: status");
        assert!(store.rows().is_empty());
    }

    #[tokio::test]
    async fn test_list_commands() {
        let (bot, store, _clock) = bot();
        store
            .insert(
                "7",
                &NewEntry::new("Frieren", Category::Anime, Status::InProgress).unwrap(),
            )
            .await
            .unwrap();

        let own = bot
            .handle(InboundEvent::command(commands::MYLIST, "42", &[]))
            .await;
        assert_eq!(own.text, "No entries found.");

        let foreign = bot
            .handle(InboundEvent::command(
                commands::LISTUSER,
                "42",
                &[("user", "7"), ("display_name", "Alice"), ("filter", "anime")],
            ))
            .await;
        assert_eq!(
            foreign.text,
            "List of **Alice**:\n(Filter: anime)\n- **Frieren** | anime | en cours\n"
        );
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let (bot, _store, _clock) = bot();
        let doc = bot
            .handle(InboundEvent::command("wishlist", "42", &[]))
            .await;
        assert_eq!(doc.text, "Unknown command: /wishlist");
    }

    #[tokio::test]
    async fn test_handle_json() {
        let (bot, _store, _clock) = bot();
        let reply = bot
            .handle_json(r#"{"type":"slash_command","name":"mylist","owner":"42"}"#)
            .await
            .unwrap();
        let doc: DisplayDocument = serde_json::from_str(&reply).unwrap();
        assert_eq!(doc.text, "No entries found.");

        assert!(matches!(
            bot.handle_json("not json").await,
            Err(CoreError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_from_config_opens_sqlite_store() {
        let dir = std::env::temp_dir().join(format!(
            "mylist-bot-{}-{}",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let config = Config::new(dir.clone());
        let bot = ListBot::from_config(&config).unwrap();

        bot.handle(InboundEvent::command(
            commands::ADD,
            "42",
            &[("title", "Arcane"), ("category", "série"), ("status", "terminé")],
        ))
        .await;
        let doc = bot
            .handle(InboundEvent::command(commands::MYLIST, "42", &[]))
            .await;
        assert_eq!(doc.text, "**Série**:\n- **Arcane** | terminé\n");

        drop(bot);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_store_failures_are_rendered_for_single_commands() {
        let bot = ListBot::new(
            Arc::new(UnavailableStore),
            SessionRegistry::new(chrono::Duration::seconds(300)),
        );

        let cases: [(&str, &[(&str, &str)]); 4] = [
            (
                commands::ADD,
                &[("title", "Naruto"), ("category", "manga"), ("status", "en cours")],
            ),
            (commands::UPDATE, &[("title", "Naruto"), ("new_status", "terminé")]),
            (commands::REMOVE, &[("title", "Naruto")]),
            (commands::MYLIST, &[]),
        ];
        for (name, args) in cases {
            let doc = bot.handle(InboundEvent::command(name, "42", args)).await;
            assert_eq!(doc.text, "Store unavailable: database is locked", "/{name}");
            assert_eq!(doc.visibility, Visibility::OwnerOnly);
        }
    }

    #[tokio::test]
    async fn test_commit_saves_filled_draft() {
        let (bot, store, _clock) = bot();
        let session_ref = start(&bot, commands::ADD_BATCH, "42").await;
        bot.handle(submit(
            &session_ref,
            "42",
            widget_ids::LINES_FORM,
            "Naruto, manga, en cours",
        ))
        .await;

        bot.handle(press(&session_ref, "42", widget_ids::NEW_ENTRY))
            .await;
        bot.handle(submit(&session_ref, "42", widget_ids::TITLE_FORM, "Bleach"))
            .await;
        bot.handle(select(&session_ref, "42", widget_ids::CATEGORY_MENU, "manga"))
            .await;
        bot.handle(select(&session_ref, "42", widget_ids::STATUS_MENU, "terminé"))
            .await;

        let summary = bot
            .handle(press(&session_ref, "42", widget_ids::COMMIT))
            .await;
        assert_eq!(summary.text, "2 succeeded, 0 errors");

        let titles: Vec<String> = store.rows().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Naruto", "Bleach"]);
    }

    #[tokio::test]
    async fn test_commit_reports_half_filled_draft() {
        let (bot, store, _clock) = bot();
        let session_ref = start(&bot, commands::ADD_BATCH, "42").await;
        bot.handle(submit(
            &session_ref,
            "42",
            widget_ids::LINES_FORM,
            "Naruto, manga, en cours",
        ))
        .await;
        bot.handle(submit(&session_ref, "42", widget_ids::TITLE_FORM, "Bleach"))
            .await;

        let summary = bot
            .handle(press(&session_ref, "42", widget_ids::COMMIT))
            .await;
        assert_eq!(
            summary.text,
            "1 succeeded, 0 errors\nDraft Bleach was not saved, missing: category, status"
        );
        assert_eq!(store.rows().len(), 1);
    }

    #[test]
    fn test_from_config_rejects_oversized_ttl() {
        let config = Config {
            session_ttl_secs: 100_000_000_000_000,
            ..Config::new(std::env::temp_dir().join("mylist-unused"))
        };
        assert!(matches!(
            ListBot::from_config(&config),
            Err(CoreError::Config(_))
        ));
    }
}
