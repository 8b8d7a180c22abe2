//! MyList Staging
//!
//! A staging session lets one user build a batch of list mutations across
//! several disconnected widget interactions, then commit it in one go.
//!
//! ```text
//! Collecting
//!   ↓ commit          ↓ cancel       ↓ ttl elapsed
//! Committing        Cancelled       Expired
//! ```
//!
//! Sessions live in a `SessionRegistry`, addressed by `session_ref`, with at
//! most one live session per owner. Each session is guarded by its own lock so
//! interactions from the same user are applied one at a time.

mod batch;
mod clock;
mod error;
mod item;
mod prompt;
mod registry;
mod session;

pub use batch::{parse_batch_line, LineError, LineFault};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::StagingError;
pub use item::{QueuedMutation, SessionKind, StagedItem};
pub use prompt::widget_ids;
pub use registry::{OpenedSession, SessionLease, SessionRegistry};
pub use session::{BatchIntake, CommitFailure, CommitSummary, SessionState, StagingSession};

pub type Result<T> = std::result::Result<T, StagingError>;
