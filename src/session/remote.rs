//! Remote mirror for selection-session state.
//!
//! When configured, sessions are mirrored to a remote JSON store keyed by
//! session id (`{base}/sessions/{id}`), so a restarted process can pick up
//! an in-flight browse. The mirror is strictly best-effort: every failure
//! degrades to local-only operation with a warning, never a user-visible
//! error.

use std::time::Duration;

use posterforged_common::SessionId;
use tracing::warn;

use super::SelectionSession;

const REMOTE_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the keyed remote session store.
#[derive(Debug, Clone)]
pub struct RemoteSessionStore {
    base: String,
    client: reqwest::Client,
}

impl RemoteSessionStore {
    /// Create a client for the given base URL.
    pub fn new(base: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REMOTE_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build remote session client: {e}");
                reqwest::Client::new()
            });

        Self {
            base: base.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, id: SessionId) -> String {
        format!("{}/sessions/{}", self.base, id)
    }

    /// Mirror a session snapshot. Failures are logged and swallowed.
    pub async fn put(&self, session: &SelectionSession) {
        let url = self.url(session.id);
        match self.client.put(&url).json(session).send().await {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => {
                warn!(session_id = %session.id, status = %resp.status(), "remote session PUT failed");
            }
            Err(e) => {
                warn!(session_id = %session.id, "remote session PUT error: {e}");
            }
        }
    }

    /// Fetch a mirrored session, if the store has one.
    pub async fn fetch(&self, id: SessionId) -> Option<SelectionSession> {
        let url = self.url(id);
        match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => match resp.json().await {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!(session_id = %id, "remote session payload invalid: {e}");
                    None
                }
            },
            Ok(_) => None,
            Err(e) => {
                warn!(session_id = %id, "remote session GET error: {e}");
                None
            }
        }
    }

    /// Drop a superseded session from the mirror. Best-effort.
    pub async fn delete(&self, id: SessionId) {
        let url = self.url(id);
        if let Err(e) = self.client.delete(&url).send().await {
            warn!(session_id = %id, "remote session DELETE error: {e}");
        }
    }
}
