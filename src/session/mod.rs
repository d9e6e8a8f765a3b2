//! Selection sessions: the server-side record of a user's browse position.

pub mod remote;
mod store;

pub use store::{QueryTicket, SessionStore};

use chrono::{DateTime, Utc};
use posterforged_common::{SessionId, UserId};
use serde::{Deserialize, Serialize};

use crate::posters::PosterRecord;
use crate::providers::PlatformQuery;

/// One user's active browse through a filtered poster list.
///
/// Invariant: `current_index` stays within `[0, records.len() - 1]` whenever
/// `records` is non-empty; an empty record list pins it at 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionSession {
    /// Unique session identifier.
    pub id: SessionId,
    /// Owner; at most one session is authoritative per user.
    pub user: UserId,
    /// The query (and its filters) this session was built from.
    pub query: PlatformQuery,
    /// Filtered, deterministically ordered records.
    pub records: Vec<PosterRecord>,
    /// Cursor into `records`.
    pub current_index: usize,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last access timestamp (drives TTL eviction).
    pub last_access: DateTime<Utc>,
}

impl SelectionSession {
    /// The record under the cursor, if any.
    pub fn current(&self) -> Option<&PosterRecord> {
        self.records.get(self.current_index)
    }
}

/// A user-issued page transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavAction {
    /// Move one step back; a no-op at index 0.
    Prev,
    /// Move one step forward; a no-op at the last index.
    Next,
    /// Jump straight to a zero-based index; out-of-range requests are
    /// rejected without touching the session.
    Jump(usize),
}
