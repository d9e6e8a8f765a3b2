//! Trait definition and types for poster providers.
//!
//! This module defines the [`PosterProvider`] trait that all poster sources
//! (the TMDB metadata API, the worker-backed OTT platforms, the Netflix
//! title resolver) must implement, along with the transient extraction type
//! adapters hand to the normalizer.

pub mod http;
pub mod netflix;
pub mod registry;
pub mod tmdb;
pub mod worker;

pub use registry::ProviderRegistry;

use async_trait::async_trait;
use posterforged_common::{KindFilter, PosterKind, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// A query dispatched to one provider adapter.
///
/// `raw` is whatever the user supplied after the command: a platform page
/// URL, a metadata-site URL, a bare title id, or a free-text title search,
/// depending on the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformQuery {
    /// Registry key of the target provider (e.g. "amzn").
    pub provider_key: String,
    /// The user-supplied URL, id, or search text.
    pub raw: String,
    /// Requested orientation filter.
    #[serde(default)]
    pub kind: KindFilter,
    /// Requested language tag, if any (e.g. "Tamil").
    #[serde(default)]
    pub language: Option<String>,
}

impl PlatformQuery {
    /// Convenience constructor with no filters.
    pub fn new(provider_key: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            provider_key: provider_key.into(),
            raw: raw.into(),
            kind: KindFilter::Both,
            language: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Raw extraction
// ---------------------------------------------------------------------------

/// One raw image candidate extracted by an adapter.
///
/// Transient: owned by the adapter that produced it, consumed by the
/// normalizer, never persisted.
#[derive(Debug, Clone)]
pub struct ProviderResult {
    /// Candidate image URL, as extracted (may still be invalid).
    pub url: String,
    /// Orientation, inferred from the payload field it came from.
    pub kind: PosterKind,
    /// Display language of the artwork, when the source tags one.
    pub language: Option<String>,
    /// Title of the matched item, when the source reports one.
    pub title: Option<String>,
    /// Release year, when the source reports one.
    pub year: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async trait that all poster providers must implement.
///
/// Each adapter wraps a single upstream source and owns its extraction
/// logic. Adapters perform no side effects beyond the outbound request and
/// never touch shared state; they are wrapped in an `Arc` and shared across
/// tasks.
#[async_trait]
pub trait PosterProvider: Send + Sync {
    /// Short, lowercase registry key for this provider (e.g. `"amzn"`).
    fn name(&self) -> &str;

    /// Human-readable source name used in captions
    /// (e.g. `"Amazon Prime Video"`).
    fn display_name(&self) -> &str;

    /// Returns `true` when the provider is configured well enough to serve
    /// requests (credentials/base URL present).
    fn is_available(&self) -> bool;

    /// Fetch all candidate images for `query`.
    ///
    /// Fails with [`posterforged_common::Error::Fetch`] on transport or
    /// payload problems and [`posterforged_common::Error::NotFound`] when
    /// the source is reachable but has no artwork for the query.
    async fn fetch(&self, query: &PlatformQuery) -> Result<Vec<ProviderResult>>;
}

impl std::fmt::Debug for dyn PosterProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PosterProvider")
            .field("name", &self.name())
            .finish()
    }
}
