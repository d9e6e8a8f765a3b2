//! The engine facade the chat transport talks to.
//!
//! Two entry points: [`PosterEngine::browse`] turns a fresh platform query
//! into a session plus its first rendered page, and
//! [`PosterEngine::paginate`] applies a button callback to an existing
//! session. Everything else (adapters, normalization, session bookkeeping,
//! rendering) hangs off these two.

use std::sync::Arc;
use std::time::Duration;

use posterforged_common::{Result, SessionId, UserId};
use tracing::info;

use crate::aggregate;
use crate::caption::{self, Caption};
use crate::config::Config;
use crate::pagination::{self, NavButton, PageView};
use crate::posters::{normalize, Filters};
use crate::providers::http::HttpFetcher;
use crate::providers::netflix::NetflixProvider;
use crate::providers::tmdb::TmdbProvider;
use crate::providers::worker::WorkerProvider;
use crate::providers::{PlatformQuery, ProviderRegistry};
use crate::session::{NavAction, SelectionSession, SessionStore};

/// One fully rendered pagination step, ready for the transport layer.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub session_id: SessionId,
    pub view: PageView,
    /// Caption for the record under the cursor; `None` when the session is
    /// empty ("no results").
    pub caption: Option<Caption>,
    pub keyboard: Vec<Vec<NavButton>>,
    /// User-presentable notes about adapters that failed while siblings
    /// succeeded.
    pub partial_failures: Vec<String>,
}

/// The poster aggregation and selection engine.
pub struct PosterEngine {
    registry: ProviderRegistry,
    store: SessionStore,
    fetch_timeout: Duration,
}

impl PosterEngine {
    /// Wire up registry and session store from the config.
    pub fn from_config(config: &Config) -> Self {
        let fetcher = HttpFetcher::new(&config.fetch);

        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(TmdbProvider::new(&config.tmdb, &config.fetch)));
        registry.register(Arc::new(NetflixProvider::new(
            config.netflix.api_base.clone(),
            fetcher.clone(),
        )));
        for platform in config.resolved_platforms() {
            registry.register(Arc::new(WorkerProvider::new(platform, fetcher.clone())));
        }

        Self {
            registry,
            store: SessionStore::new(&config.session),
            fetch_timeout: Duration::from_secs(config.fetch.timeout_secs),
        }
    }

    /// The provider registry (for listings and diagnostics).
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// The session store (for TTL cleanup wiring).
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Run a fresh query: dispatch, fetch, normalize, open a session, and
    /// render its first page.
    ///
    /// A `+`-joined provider key fans the query out to every named adapter;
    /// one failing adapter only adds a partial-failure note as long as a
    /// sibling delivers. A query for a user who already has a session
    /// supersedes it; an empty result set still opens a session and renders
    /// a "no results" page.
    pub async fn browse(&self, user: UserId, query: PlatformQuery) -> Result<RenderedPage> {
        let adapters = self.registry.dispatch_many(&query.provider_key)?;
        let ticket = self.store.begin_query(user);

        let outcome = aggregate::fetch_all(&adapters, &query, self.fetch_timeout).await?;

        let filters = Filters {
            kind: query.kind,
            language: query.language.clone(),
        };
        let records = normalize(outcome.batches, &filters);
        info!(
            user = %user,
            provider = %query.provider_key,
            total = records.len(),
            failed = outcome.failures.len(),
            "query aggregated"
        );

        let session = self.store.create(ticket, query, records).await?;
        let notes = outcome
            .failures
            .iter()
            .map(|f| format!("⚠️ {}: source unavailable", f.source.display_name))
            .collect();
        Ok(Self::render_page(&session, notes))
    }

    /// Apply a navigation callback to an existing session and re-render.
    pub async fn paginate(&self, session_id: SessionId, action: NavAction) -> Result<RenderedPage> {
        let session = self.store.advance(session_id, action).await?;
        Ok(Self::render_page(&session, Vec::new()))
    }

    /// Render a session without touching it (e.g. to repeat a message).
    pub async fn peek(&self, session_id: SessionId) -> Result<RenderedPage> {
        let session = self.store.get(session_id).await?;
        Ok(Self::render_page(&session, Vec::new()))
    }

    fn render_page(session: &SelectionSession, partial_failures: Vec<String>) -> RenderedPage {
        let view = pagination::render(session);
        let keyboard = pagination::keyboard(&view, session.id);
        let caption = view.record.as_ref().map(caption::render);
        RenderedPage {
            session_id: session.id,
            view,
            caption,
            keyboard,
            partial_failures,
        }
    }
}
