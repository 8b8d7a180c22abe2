//! Staging session state machine
//!
//! Every transition checks, in order: the session is still collecting, its TTL
//! has not elapsed, the actor is the owner. A failed check leaves the session
//! untouched. A successful transition slides `expires_at` forward by the TTL.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use mylist_entries::{Category, ListStore, NewEntry, Status};

use crate::batch::{parse_batch_line, LineError};
use crate::clock::Clock;
use crate::error::StagingError;
use crate::item::{QueuedMutation, SessionKind, StagedItem};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Collecting,
    Committing,
    Cancelled,
    Expired,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::Collecting)
    }
}

/// Result of feeding bulk text into a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchIntake {
    pub queued: usize,
    pub rejected: Vec<LineError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitFailure {
    /// 1-based position in the queue
    pub position: usize,
    pub item: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    pub kind: SessionKind,
    pub succeeded: usize,
    pub failures: Vec<CommitFailure>,
    /// Bulk lines rejected before commit
    pub rejected_lines: Vec<LineError>,
    /// Draft still missing fields at commit time, not persisted
    pub unsaved_draft: Option<StagedItem>,
}

impl CommitSummary {
    pub fn render(&self) -> String {
        let mut text = format!(
            "{} succeeded, {} errors",
            self.succeeded,
            self.failures.len()
        );
        for failure in &self.failures {
            text.push_str(&format!(
                "\n- #{} {}: {}",
                failure.position, failure.item, failure.reason
            ));
        }
        if !self.rejected_lines.is_empty() {
            text.push_str(&format!(
                "\n{} line(s) were rejected before commit:",
                self.rejected_lines.len()
            ));
            for line in &self.rejected_lines {
                text.push_str(&format!(
                    "\n- line {} `{}`: {}",
                    line.line_no, line.raw, line.reason
                ));
            }
        }
        if let Some(draft) = &self.unsaved_draft {
            text.push_str(&format!(
                "\nDraft {} was not saved, missing: {}",
                draft.title.as_deref().unwrap_or("(untitled)"),
                draft.missing_fields().join(", ")
            ));
        }
        text
    }
}

pub struct StagingSession {
    /// Stable reference carried by every follow-up widget event
    pub id: String,
    pub owner_id: String,
    pub kind: SessionKind,
    pub created_at: DateTime<Utc>,
    state: SessionState,
    draft: Option<StagedItem>,
    queued: Vec<QueuedMutation>,
    line_errors: Vec<LineError>,
    lines_seen: usize,
    expires_at: DateTime<Utc>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl StagingSession {
    pub fn new(owner_id: String, kind: SessionKind, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            kind,
            created_at: now,
            state: SessionState::Collecting,
            draft: None,
            queued: Vec::new(),
            line_errors: Vec::new(),
            lines_seen: 0,
            expires_at: deadline(now, ttl),
            ttl,
            clock,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn draft(&self) -> Option<&StagedItem> {
        self.draft.as_ref()
    }

    pub fn queued(&self) -> &[QueuedMutation] {
        &self.queued
    }

    pub fn line_errors(&self) -> &[LineError] {
        &self.line_errors
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= self.clock.now()
    }

    /// Still collecting and within its TTL
    pub fn is_live(&self) -> bool {
        self.state == SessionState::Collecting && !self.is_expired()
    }

    /// Open a new empty draft. Add batches only.
    ///
    /// A complete draft that was never finalized is queued first; an
    /// incomplete one makes this fail with `SessionBusy`.
    pub fn begin_draft_entry(&mut self, actor: &str) -> Result<()> {
        self.check(actor)?;
        self.require_kind(SessionKind::AddBatch, "A new entry")?;

        if let Some(draft) = &self.draft {
            if !draft.is_complete() {
                return Err(StagingError::SessionBusy(format!(
                    "finish the current entry first (missing: {})",
                    draft.missing_fields().join(", ")
                )));
            }
            let entry = draft.to_entry()?;
            self.queued.push(QueuedMutation::Add(entry));
        }

        self.draft = Some(StagedItem::default());
        self.touch();
        tracing::debug!(session_ref = %self.id, "Opened draft entry");
        Ok(())
    }

    pub fn set_draft_title(&mut self, actor: &str, title: &str) -> Result<()> {
        self.check(actor)?;
        self.require_kind(SessionKind::AddBatch, "Setting a title")?;
        self.draft.get_or_insert_with(StagedItem::default).set_title(title)?;
        self.touch();
        Ok(())
    }

    pub fn set_draft_category(&mut self, actor: &str, value: &str) -> Result<()> {
        self.check(actor)?;
        self.require_kind(SessionKind::AddBatch, "Choosing a category")?;
        let category: Category = value.parse()?;
        self.draft.get_or_insert_with(StagedItem::default).category = Some(category);
        self.touch();
        Ok(())
    }

    pub fn set_draft_status(&mut self, actor: &str, value: &str) -> Result<()> {
        self.check(actor)?;
        self.require_kind(SessionKind::AddBatch, "Choosing a status")?;
        let status: Status = value.parse()?;
        self.draft.get_or_insert_with(StagedItem::default).status = Some(status);
        self.touch();
        Ok(())
    }

    /// Move the complete draft into the queue.
    pub fn finalize_draft(&mut self, actor: &str) -> Result<NewEntry> {
        self.check(actor)?;
        self.require_kind(SessionKind::AddBatch, "Finalizing an entry")?;

        let entry = match &self.draft {
            Some(draft) => draft.to_entry()?,
            None => {
                return Err(StagingError::IncompleteEntry {
                    missing: StagedItem::default().missing_fields(),
                })
            }
        };

        self.draft = None;
        self.queued.push(QueuedMutation::Add(entry.clone()));
        self.touch();
        tracing::debug!(session_ref = %self.id, queued = self.queued.len(), "Finalized draft");

        Ok(entry)
    }

    /// Parse one bulk line. A malformed line is recorded and returned rather
    /// than failing the transition. Blank lines return `Ok(None)`.
    pub fn enqueue_batch_line(&mut self, actor: &str, raw: &str) -> Result<Option<LineError>> {
        self.check(actor)?;
        let rejected = self.ingest_line(raw);
        self.touch();
        Ok(rejected)
    }

    /// Feed every line of a bulk text submission.
    pub fn enqueue_batch_text(&mut self, actor: &str, text: &str) -> Result<BatchIntake> {
        self.check(actor)?;

        let before = self.queued.len();
        let rejected: Vec<LineError> = text.lines().filter_map(|raw| self.ingest_line(raw)).collect();
        let intake = BatchIntake {
            queued: self.queued.len() - before,
            rejected,
        };

        self.touch();
        tracing::debug!(
            session_ref = %self.id,
            queued = intake.queued,
            rejected = intake.rejected.len(),
            "Ingested bulk text"
        );
        Ok(intake)
    }

    /// Persist every queued mutation in order, one at a time.
    ///
    /// A complete draft is queued first; an incomplete one is reported in the
    /// summary as unsaved. A failing entry is itemized and does not stop the
    /// rest. The session ends in `Committing` and must be discarded afterwards.
    pub async fn commit(&mut self, actor: &str, store: &dyn ListStore) -> Result<CommitSummary> {
        self.check(actor)?;

        // A complete draft is committed as if it had been finalized
        let finished = match &self.draft {
            Some(draft) if draft.is_complete() => Some(draft.to_entry()?),
            _ => None,
        };
        if let Some(entry) = finished {
            self.draft = None;
            self.queued.push(QueuedMutation::Add(entry));
        }

        if self.queued.is_empty() {
            return Err(StagingError::NothingQueued);
        }

        let unsaved_draft = self.draft.take();
        if let Some(draft) = &unsaved_draft {
            tracing::warn!(
                session_ref = %self.id,
                missing = ?draft.missing_fields(),
                "Incomplete draft left out of commit"
            );
        }

        self.state = SessionState::Committing;
        let queued = std::mem::take(&mut self.queued);

        let mut succeeded = 0;
        let mut failures = Vec::new();
        for (index, mutation) in queued.iter().enumerate() {
            match apply(store, &self.owner_id, mutation).await {
                Ok(()) => succeeded += 1,
                Err(reason) => {
                    tracing::warn!(
                        session_ref = %self.id,
                        owner = %self.owner_id,
                        position = index + 1,
                        reason = %reason,
                        "Batch entry failed"
                    );
                    failures.push(CommitFailure {
                        position: index + 1,
                        item: mutation.describe(),
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            session_ref = %self.id,
            owner = %self.owner_id,
            kind = %self.kind,
            succeeded,
            failed = failures.len(),
            "Committed staging session"
        );

        Ok(CommitSummary {
            kind: self.kind,
            succeeded,
            failures,
            rejected_lines: std::mem::take(&mut self.line_errors),
            unsaved_draft,
        })
    }

    /// Discard everything staged without persisting.
    pub fn cancel(&mut self, actor: &str) -> Result<()> {
        self.check(actor)?;
        self.draft = None;
        self.queued.clear();
        self.line_errors.clear();
        self.state = SessionState::Cancelled;

        tracing::info!(session_ref = %self.id, owner = %self.owner_id, "Cancelled staging session");
        Ok(())
    }

    /// Mark as reclaimed after the TTL elapsed.
    pub fn expire(&mut self) {
        if self.state == SessionState::Collecting {
            self.state = SessionState::Expired;
            self.draft = None;
            self.queued.clear();
            self.line_errors.clear();
            tracing::info!(session_ref = %self.id, owner = %self.owner_id, "Staging session expired");
        }
    }

    fn check(&mut self, actor: &str) -> Result<()> {
        if self.state != SessionState::Collecting {
            return Err(StagingError::SessionExpired);
        }
        if self.is_expired() {
            self.expire();
            return Err(StagingError::SessionExpired);
        }
        if actor != self.owner_id {
            tracing::debug!(session_ref = %self.id, actor = %actor, "Rejected non-owner interaction");
            return Err(StagingError::NotSessionOwner);
        }
        Ok(())
    }

    fn require_kind(&self, kind: SessionKind, action: &'static str) -> Result<()> {
        if self.kind != kind {
            return Err(StagingError::WrongKind {
                action,
                kind: self.kind,
            });
        }
        Ok(())
    }

    fn ingest_line(&mut self, raw: &str) -> Option<LineError> {
        if raw.trim().is_empty() {
            return None;
        }
        self.lines_seen += 1;

        match parse_batch_line(self.kind, raw) {
            Ok(Some(mutation)) => {
                self.queued.push(mutation);
                None
            }
            Ok(None) => None,
            Err(fault) => {
                let error = LineError {
                    line_no: self.lines_seen,
                    raw: raw.trim().to_string(),
                    reason: fault.to_string(),
                };
                self.line_errors.push(error.clone());
                Some(error)
            }
        }
    }

    fn touch(&mut self) {
        self.expires_at = deadline(self.clock.now(), self.ttl);
    }
}

/// `now + ttl`, saturating at the latest representable instant.
fn deadline(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

async fn apply(
    store: &dyn ListStore,
    owner: &str,
    mutation: &QueuedMutation,
) -> std::result::Result<(), String> {
    match mutation {
        QueuedMutation::Add(entry) => store.insert(owner, entry).await.map_err(|e| e.to_string()),
        QueuedMutation::UpdateStatus { title, status } => {
            match store.update_status(owner, title, *status).await {
                Ok(0) => Err(format!("no entry titled `{title}`")),
                Ok(_) => Ok(()),
                Err(e) => Err(e.to_string()),
            }
        }
        QueuedMutation::Remove { title } => match store.delete_by_title(owner, title).await {
            Ok(0) => Err(format!("no entry titled `{title}`")),
            Ok(_) => Ok(()),
            Err(e) => Err(e.to_string()),
        },
    }
}
