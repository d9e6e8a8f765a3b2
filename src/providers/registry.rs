//! Provider registry: keyed dispatch over [`PosterProvider`] adapters.
//!
//! The registry is the single lookup table between a query's provider key
//! and the adapter that serves it. Adding or removing a provider touches
//! only registration; the normalizer, session store, and pagination layers
//! stay untouched.

use std::sync::Arc;

use posterforged_common::{Error, Result};

use super::PosterProvider;

/// A registry that manages the configured [`PosterProvider`] adapters.
///
/// Providers are stored in registration order; that order is also the merge
/// order when several adapters serve one query. Lookup is by registry key.
/// Disabled or unconfigured providers stay listed (so operators can see
/// them) but are rejected at dispatch.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn PosterProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry with no providers.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Register a new poster provider.
    pub fn register(&mut self, provider: Arc<dyn PosterProvider>) {
        self.providers.push(provider);
    }

    /// References to all registered providers, in registration order.
    pub fn all(&self) -> &[Arc<dyn PosterProvider>] {
        &self.providers
    }

    /// Return references to all providers that are currently available.
    pub fn available(&self) -> Vec<&dyn PosterProvider> {
        self.providers
            .iter()
            .filter(|p| p.is_available())
            .map(|p| p.as_ref())
            .collect()
    }

    /// Look up a provider by its registry key.
    ///
    /// Returns `None` if no provider with the given key has been registered.
    pub fn get(&self, key: &str) -> Option<Arc<dyn PosterProvider>> {
        self.providers.iter().find(|p| p.name() == key).cloned()
    }

    /// Look up a provider for dispatch.
    ///
    /// Unknown keys and unavailable providers both fail with `NotFound`, so
    /// disabling a platform in config needs no code changes anywhere else.
    pub fn dispatch(&self, key: &str) -> Result<Arc<dyn PosterProvider>> {
        let provider = self
            .get(key)
            .ok_or_else(|| Error::not_found(format!("unknown provider: {key}")))?;
        if !provider.is_available() {
            return Err(Error::not_found(format!("provider disabled: {key}")));
        }
        Ok(provider)
    }

    /// Resolve a dispatch key into one or more adapters.
    ///
    /// A `+`-joined key (e.g. "amzn+tmdb") queries several sources for one
    /// request; their results are merged downstream, in this order. Every
    /// named key must resolve.
    pub fn dispatch_many(&self, keys: &str) -> Result<Vec<Arc<dyn PosterProvider>>> {
        let mut adapters = Vec::new();
        for key in keys.split('+').map(str::trim).filter(|k| !k.is_empty()) {
            adapters.push(self.dispatch(key)?);
        }
        if adapters.is_empty() {
            return Err(Error::invalid_input("empty provider key"));
        }
        Ok(adapters)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{PlatformQuery, ProviderResult};
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use posterforged_common::Error;

    /// A minimal stub provider used for testing.
    struct StubProvider {
        key: &'static str,
        available: bool,
    }

    #[async_trait]
    impl PosterProvider for StubProvider {
        fn name(&self) -> &str {
            self.key
        }

        fn display_name(&self) -> &str {
            "Stub"
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn fetch(&self, _query: &PlatformQuery) -> posterforged_common::Result<Vec<ProviderResult>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn empty_registry() {
        let registry = ProviderRegistry::new();
        assert!(registry.available().is_empty());
        assert!(registry.get("amzn").is_none());
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubProvider {
            key: "amzn",
            available: true,
        }));
        registry.register(Arc::new(StubProvider {
            key: "zee5",
            available: false,
        }));

        assert_eq!(registry.available().len(), 1);
        assert!(registry.get("amzn").is_some());
        assert!(registry.get("zee5").is_some()); // registered but unavailable
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn dispatch_rejects_unknown_and_disabled() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubProvider {
            key: "zee5",
            available: false,
        }));

        assert_matches!(registry.dispatch("nope"), Err(Error::NotFound(_)));
        assert_matches!(registry.dispatch("zee5"), Err(Error::NotFound(_)));
    }

    #[test]
    fn dispatch_returns_available_provider() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubProvider {
            key: "amzn",
            available: true,
        }));
        assert_eq!(registry.dispatch("amzn").unwrap().name(), "amzn");
    }

    #[test]
    fn dispatch_many_splits_joined_keys_in_order() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubProvider {
            key: "amzn",
            available: true,
        }));
        registry.register(Arc::new(StubProvider {
            key: "tmdb",
            available: true,
        }));

        let adapters = registry.dispatch_many("amzn+tmdb").unwrap();
        let keys: Vec<_> = adapters.iter().map(|a| a.name()).collect();
        assert_eq!(keys, vec!["amzn", "tmdb"]);

        assert_matches!(registry.dispatch_many("amzn+nope"), Err(Error::NotFound(_)));
        assert_matches!(registry.dispatch_many(" + "), Err(Error::InvalidInput(_)));
    }
}
