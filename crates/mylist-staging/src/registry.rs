//! Session registry
//!
//! Process-wide map of live staging sessions, indexed by `session_ref` and by
//! owner. The index lock is only held for map lookups; each session has its
//! own async lock, held for the whole transition including store calls.

use chrono::Duration;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tokio::sync::{Mutex as SessionLock, OwnedMutexGuard};

use crate::clock::{Clock, SystemClock};
use crate::error::StagingError;
use crate::item::SessionKind;
use crate::session::StagingSession;
use crate::Result;

type SessionHandle = Arc<SessionLock<StagingSession>>;

#[derive(Default)]
struct Index {
    by_ref: HashMap<String, SessionHandle>,
    /// owner id -> session ref
    by_owner: HashMap<String, String>,
}

impl Index {
    fn remove(&mut self, session_ref: &str, owner: &str) -> bool {
        let removed = self.by_ref.remove(session_ref).is_some();
        if self.by_owner.get(owner).map(String::as_str) == Some(session_ref) {
            self.by_owner.remove(owner);
        }
        removed
    }
}

/// Exclusive access to one session for the duration of a transition.
///
/// Dropping a lease whose session reached a terminal state removes it from the registry.
pub struct SessionLease {
    guard: OwnedMutexGuard<StagingSession>,
    index: Arc<Mutex<Index>>,
}

impl Deref for SessionLease {
    type Target = StagingSession;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl DerefMut for SessionLease {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        if self.guard.state().is_terminal() {
            let removed = self
                .index
                .lock()
                .remove(&self.guard.id, &self.guard.owner_id);
            if removed {
                tracing::debug!(
                    session_ref = %self.guard.id,
                    state = ?self.guard.state(),
                    "Discarded staging session"
                );
            }
        }
    }
}

pub struct OpenedSession {
    pub lease: SessionLease,
    /// An existing collecting session of the same kind was picked up
    pub resumed: bool,
}

pub struct SessionRegistry {
    index: Arc<Mutex<Index>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            index: Arc::new(Mutex::new(Index::default())),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Start a batch for `owner`, or resume their live session of the same kind.
    ///
    /// A live session of a different kind makes this fail with `SessionBusy`.
    pub async fn open(&self, owner: &str, kind: SessionKind) -> Result<OpenedSession> {
        let existing = {
            let index = self.index.lock();
            index
                .by_owner
                .get(owner)
                .and_then(|session_ref| index.by_ref.get(session_ref))
                .cloned()
        };

        if let Some(handle) = existing {
            let mut session = handle.lock_owned().await;
            if session.is_live() {
                if session.kind != kind {
                    return Err(StagingError::SessionBusy(format!(
                        "your {} is still in progress, commit or cancel it first",
                        session.kind
                    )));
                }
                tracing::info!(
                    session_ref = %session.id,
                    owner = %owner,
                    kind = %kind,
                    "Resumed staging session"
                );
                return Ok(OpenedSession {
                    lease: self.lease(session),
                    resumed: true,
                });
            }

            session.expire();
            self.index.lock().remove(&session.id, &session.owner_id);
        }

        let session =
            StagingSession::new(owner.to_string(), kind, self.ttl, Arc::clone(&self.clock));
        let session_ref = session.id.clone();
        let handle = Arc::new(SessionLock::new(session));
        let guard = Arc::clone(&handle).lock_owned().await;

        {
            let mut index = self.index.lock();
            if let Some(other) = index.by_owner.get(owner) {
                if index.by_ref.contains_key(other) {
                    return Err(StagingError::SessionBusy(
                        "another batch was started at the same time".to_string(),
                    ));
                }
            }
            index.by_ref.insert(session_ref.clone(), handle);
            index.by_owner.insert(owner.to_string(), session_ref.clone());
        }

        tracing::info!(
            session_ref = %session_ref,
            owner = %owner,
            kind = %kind,
            ttl_secs = self.ttl.num_seconds(),
            "Created staging session"
        );

        Ok(OpenedSession {
            lease: self.lease(guard),
            resumed: false,
        })
    }

    /// Lock the session behind `session_ref`, waiting for any in-flight
    /// transition on it to finish.
    ///
    /// Unknown, finished and expired sessions all yield `SessionExpired`.
    pub async fn acquire(&self, session_ref: &str) -> Result<SessionLease> {
        let handle = {
            let index = self.index.lock();
            index.by_ref.get(session_ref).cloned()
        };
        let handle = handle.ok_or(StagingError::SessionExpired)?;

        let mut session = handle.lock_owned().await;
        if session.state().is_terminal() || session.is_expired() {
            session.expire();
            self.index.lock().remove(&session.id, &session.owner_id);
            return Err(StagingError::SessionExpired);
        }

        Ok(self.lease(session))
    }

    /// Reference of the owner's current session, if any.
    pub fn session_for_owner(&self, owner: &str) -> Option<String> {
        self.index.lock().by_owner.get(owner).cloned()
    }

    pub fn contains(&self, session_ref: &str) -> bool {
        self.index.lock().by_ref.contains_key(session_ref)
    }

    pub fn len(&self) -> usize {
        self.index.lock().by_ref.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every session without persisting anything.
    pub fn clear(&self) {
        let mut index = self.index.lock();
        index.by_ref.clear();
        index.by_owner.clear();
    }

    /// Reclaim every expired session. Sessions locked by an in-flight
    /// transition are skipped; that transition checks expiry itself.
    pub fn purge_expired(&self) -> usize {
        let handles: Vec<SessionHandle> = self.index.lock().by_ref.values().cloned().collect();

        let mut purged = 0;
        for handle in handles {
            let Ok(mut session) = handle.try_lock() else {
                continue;
            };
            if session.state().is_terminal() || session.is_expired() {
                session.expire();
                if self.index.lock().remove(&session.id, &session.owner_id) {
                    purged += 1;
                }
            }
        }
        purged
    }

    /// Run `purge_expired` every `every` on the current tokio runtime.
    pub fn spawn_reaper(&self, every: std::time::Duration) -> tokio::task::JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let purged = registry.purge_expired();
                if purged > 0 {
                    tracing::info!(purged, "Reaped expired staging sessions");
                }
            }
        })
    }

    fn lease(&self, guard: OwnedMutexGuard<StagingSession>) -> SessionLease {
        SessionLease {
            guard,
            index: Arc::clone(&self.index),
        }
    }
}

impl Clone for SessionRegistry {
    fn clone(&self) -> Self {
        Self {
            index: Arc::clone(&self.index),
            ttl: self.ttl,
            clock: Arc::clone(&self.clock),
        }
    }
}
