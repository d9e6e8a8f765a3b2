//! Thread-safe store for selection sessions.
//!
//! Sessions live in a keyed concurrent map with TTL eviction. Per-user
//! query epochs make a superseding query discard the results of any query
//! still in flight, and the map's per-key entry lock serializes repeated
//! button presses on one session.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use posterforged_common::{Error, Result, SessionId, UserId};
use tracing::{debug, info};

use crate::posters::PosterRecord;
use crate::providers::PlatformQuery;

use super::remote::RemoteSessionStore;
use super::{NavAction, SelectionSession};

/// Proof that a query was opened against the store.
///
/// Carries the user's query epoch; `create` rejects tickets whose epoch has
/// been superseded by a newer `begin_query`.
#[derive(Debug, Clone, Copy)]
pub struct QueryTicket {
    user: UserId,
    epoch: u64,
}

#[derive(Debug, Default)]
struct UserSlot {
    epoch: u64,
    session: Option<SessionId>,
}

struct Inner {
    sessions: DashMap<SessionId, SelectionSession>,
    users: DashMap<UserId, UserSlot>,
    ttl: chrono::Duration,
    remote: Option<RemoteSessionStore>,
}

/// Thread-safe session store with per-user supersession and TTL eviction.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Create a store from the session section of the config.
    pub fn new(config: &crate::config::SessionConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                sessions: DashMap::new(),
                users: DashMap::new(),
                ttl: chrono::Duration::seconds(config.ttl_secs as i64),
                remote: config.remote_url.as_deref().map(RemoteSessionStore::new),
            }),
        }
    }

    /// Open a new query for `user`, superseding any query still in flight.
    pub fn begin_query(&self, user: UserId) -> QueryTicket {
        let mut slot = self.inner.users.entry(user).or_default();
        slot.epoch += 1;
        QueryTicket {
            user,
            epoch: slot.epoch,
        }
    }

    /// Install the finished query as the user's authoritative session.
    ///
    /// A stale ticket (the user started a newer query meanwhile) is rejected
    /// with `SessionExpired`, so in-flight results of a superseded query are
    /// discarded rather than merged. The user's prior session, if any, is
    /// removed.
    pub async fn create(
        &self,
        ticket: QueryTicket,
        query: PlatformQuery,
        records: Vec<PosterRecord>,
    ) -> Result<SelectionSession> {
        let now = Utc::now();
        let session = SelectionSession {
            id: SessionId::new(),
            user: ticket.user,
            query,
            records,
            current_index: 0,
            created_at: now,
            last_access: now,
        };

        let prior = {
            let mut slot = self
                .inner
                .users
                .get_mut(&ticket.user)
                .ok_or_else(|| Error::session_expired("query superseded"))?;
            if slot.epoch != ticket.epoch {
                debug!(user = %ticket.user, "discarding results of superseded query");
                return Err(Error::session_expired("query superseded by a newer one"));
            }
            slot.session.replace(session.id)
        };

        if let Some(old) = prior {
            self.inner.sessions.remove(&old);
        }
        self.inner.sessions.insert(session.id, session.clone());
        info!(
            session_id = %session.id,
            user = %session.user,
            total = session.records.len(),
            "created selection session"
        );

        if let Some(remote) = &self.inner.remote {
            if let Some(old) = prior {
                remote.delete(old).await;
            }
            remote.put(&session).await;
        }

        Ok(session)
    }

    /// Fetch a session snapshot, refreshing its TTL.
    ///
    /// Unknown or expired ids yield `SessionExpired`. With a remote mirror
    /// configured, a locally missing session is rehydrated from the mirror
    /// first.
    pub async fn get(&self, id: SessionId) -> Result<SelectionSession> {
        let now = Utc::now();
        if !self.inner.sessions.contains_key(&id) {
            self.rehydrate(id, now).await?;
        }

        let mut entry = self
            .inner
            .sessions
            .get_mut(&id)
            .ok_or_else(|| Error::session_expired(id.to_string()))?;
        if now.signed_duration_since(entry.last_access) > self.inner.ttl {
            drop(entry);
            self.inner.sessions.remove(&id);
            return Err(Error::session_expired(id.to_string()));
        }
        entry.last_access = now;
        Ok(entry.clone())
    }

    /// Apply a navigation action and return the updated session.
    ///
    /// `Prev`/`Next` clamp silently at the boundaries. An out-of-range
    /// `Jump` fails with `OutOfRange` and leaves the session untouched.
    pub async fn advance(&self, id: SessionId, action: NavAction) -> Result<SelectionSession> {
        let now = Utc::now();
        if !self.inner.sessions.contains_key(&id) {
            self.rehydrate(id, now).await?;
        }

        let updated = {
            let mut entry = self
                .inner
                .sessions
                .get_mut(&id)
                .ok_or_else(|| Error::session_expired(id.to_string()))?;
            if now.signed_duration_since(entry.last_access) > self.inner.ttl {
                drop(entry);
                self.inner.sessions.remove(&id);
                return Err(Error::session_expired(id.to_string()));
            }

            let total = entry.records.len();
            match action {
                NavAction::Prev => {
                    entry.current_index = entry.current_index.saturating_sub(1);
                }
                NavAction::Next => {
                    if total > 0 && entry.current_index + 1 < total {
                        entry.current_index += 1;
                    }
                }
                NavAction::Jump(target) => {
                    if target >= total {
                        return Err(Error::OutOfRange {
                            requested: target,
                            total,
                        });
                    }
                    entry.current_index = target;
                }
            }
            entry.last_access = now;
            entry.clone()
        };

        if let Some(remote) = &self.inner.remote {
            remote.put(&updated).await;
        }

        Ok(updated)
    }

    /// Pull a locally missing session out of the remote mirror.
    ///
    /// Rejects mirrored copies that are TTL-expired or no longer the
    /// owner's authoritative session (superseded copies must stay dead).
    async fn rehydrate(&self, id: SessionId, now: DateTime<Utc>) -> Result<()> {
        let remote = self
            .inner
            .remote
            .as_ref()
            .ok_or_else(|| Error::session_expired(id.to_string()))?;
        let mut session = remote
            .fetch(id)
            .await
            .ok_or_else(|| Error::session_expired(id.to_string()))?;

        if now.signed_duration_since(session.last_access) > self.inner.ttl {
            return Err(Error::session_expired(id.to_string()));
        }

        {
            let mut slot = self.inner.users.entry(session.user).or_default();
            match slot.session {
                Some(active) if active != id => {
                    return Err(Error::session_expired(id.to_string()));
                }
                _ => slot.session = Some(id),
            }
        }

        session.last_access = now;
        debug!(session_id = %id, "rehydrated session from remote mirror");
        self.inner.sessions.insert(id, session);
        Ok(())
    }

    /// Remove expired sessions based on their last access timestamp.
    ///
    /// Returns the number of sessions that were removed.
    pub fn cleanup_expired_sessions(&self) -> usize {
        let now = Utc::now();
        let ttl = self.inner.ttl;

        let mut removed = 0;
        self.inner.sessions.retain(|session_id, session| {
            let elapsed = now.signed_duration_since(session.last_access);
            if elapsed > ttl {
                info!(
                    session_id = %session_id,
                    inactive_secs = elapsed.num_seconds(),
                    "expired session removed"
                );
                removed += 1;
                false
            } else {
                true
            }
        });

        if removed > 0 {
            debug!(removed, "cleaned up expired sessions");
        }
        removed
    }

    /// Get the number of live sessions.
    pub fn len(&self) -> usize {
        self.inner.sessions.len()
    }

    /// Check if there are any live sessions.
    pub fn is_empty(&self) -> bool {
        self.inner.sessions.is_empty()
    }

    /// Start a background task that periodically evicts expired sessions.
    pub fn spawn_cleanup(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                store.cleanup_expired_sessions();
            }
        })
    }
}
