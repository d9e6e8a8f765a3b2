//! Generic adapter for the worker-backed OTT platforms.
//!
//! Every scraped platform exposes the same tiny contract: GET the worker
//! endpoint with the title page URL encoded into the `{url}` slot, receive
//! one JSON document describing the title's artwork. Platforms differ only
//! in endpoint and naming, so a single [`WorkerProvider`] is instantiated
//! once per entry of the platform table.
//!
//! Field names vary across workers; extraction uses fallback chains:
//! - portrait: `poster` | `portrait` | `vertical` | `image`
//! - landscape: `landscape` | `backdrop` | `horizontal` | `cover`
//! - title: `title` | `name`
//! - year: `year` | `releaseYear`

use async_trait::async_trait;
use posterforged_common::{Error, PosterKind, Result};
use serde_json::Value;
use tracing::debug;

use crate::config::Platform;

use super::http::{urlencoded, HttpFetcher};
use super::{PlatformQuery, PosterProvider, ProviderResult};

const PORTRAIT_FIELDS: &[&str] = &["poster", "portrait", "vertical", "image"];
const LANDSCAPE_FIELDS: &[&str] = &["landscape", "backdrop", "horizontal", "cover"];

/// One worker-backed OTT platform adapter.
pub struct WorkerProvider {
    platform: Platform,
    fetcher: HttpFetcher,
}

impl WorkerProvider {
    /// Wrap one platform-table entry.
    pub fn new(platform: Platform, fetcher: HttpFetcher) -> Self {
        Self { platform, fetcher }
    }

    fn endpoint_for(&self, page_url: &str) -> String {
        self.platform.endpoint.replace("{url}", &urlencoded(page_url))
    }
}

#[async_trait]
impl PosterProvider for WorkerProvider {
    fn name(&self) -> &str {
        &self.platform.key
    }

    fn display_name(&self) -> &str {
        &self.platform.name
    }

    fn is_available(&self) -> bool {
        self.platform.enabled
    }

    async fn fetch(&self, query: &PlatformQuery) -> Result<Vec<ProviderResult>> {
        if query.raw.trim().is_empty() {
            return Err(Error::invalid_input(format!(
                "{}: missing page URL",
                self.platform.key
            )));
        }

        let url = self.endpoint_for(query.raw.trim());
        debug!(platform = %self.platform.key, url = %url, "worker fetch");
        let data = self.fetcher.get_json(&url).await?;

        let results = extract_results(&data);
        if results.is_empty() {
            return Err(Error::not_found(format!(
                "{}: no poster in worker response",
                self.platform.name
            )));
        }
        Ok(results)
    }
}

// ---------------------------------------------------------------------------
// Payload extraction (shared with the Netflix resolver)
// ---------------------------------------------------------------------------

/// Extract image candidates from a worker-style JSON document.
pub(crate) fn extract_results(data: &Value) -> Vec<ProviderResult> {
    let title = first_string(data, &["title", "name"]);
    let year = first_scalar(data, &["year", "releaseYear"]);

    let mut results = Vec::new();
    if let Some(url) = first_string(data, LANDSCAPE_FIELDS) {
        results.push(ProviderResult {
            url,
            kind: PosterKind::Landscape,
            language: None,
            title: title.clone(),
            year: year.clone(),
        });
    }
    if let Some(url) = first_string(data, PORTRAIT_FIELDS) {
        results.push(ProviderResult {
            url,
            kind: PosterKind::Portrait,
            language: None,
            title,
            year,
        });
    }
    results
}

/// First non-empty string value among `keys`.
fn first_string(data: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| data.get(k))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// First string-or-number value among `keys`, rendered as a string.
fn first_scalar(data: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|k| data.get(k)).find_map(|v| match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn provider() -> WorkerProvider {
        WorkerProvider::new(
            Platform {
                key: "amzn".to_string(),
                name: "Amazon Prime Video".to_string(),
                endpoint: "https://amzn.example/?url={url}".to_string(),
                enabled: true,
            },
            HttpFetcher::new(&FetchConfig::default()),
        )
    }

    #[test]
    fn endpoint_encodes_page_url() {
        let p = provider();
        assert_eq!(
            p.endpoint_for("https://www.primevideo.com/detail/abc"),
            "https://amzn.example/?url=https%3A%2F%2Fwww.primevideo.com%2Fdetail%2Fabc"
        );
    }

    #[test]
    fn disabled_platform_is_unavailable() {
        let mut p = provider();
        p.platform.enabled = false;
        assert!(!p.is_available());
    }

    #[test]
    fn extract_prefers_primary_fields() {
        let data = json!({
            "title": "Maari",
            "year": 2025,
            "poster": "https://img.example/p.jpg",
            "landscape": "https://img.example/l.jpg",
            "cover": "https://img.example/ignored.jpg",
        });
        let results = extract_results(&data);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].kind, PosterKind::Landscape);
        assert_eq!(results[0].url, "https://img.example/l.jpg");
        assert_eq!(results[1].kind, PosterKind::Portrait);
        assert_eq!(results[1].url, "https://img.example/p.jpg");
        assert_eq!(results[0].title.as_deref(), Some("Maari"));
        assert_eq!(results[0].year.as_deref(), Some("2025"));
    }

    #[test]
    fn extract_walks_fallback_chains() {
        let data = json!({
            "name": "Some Show",
            "releaseYear": "2023",
            "vertical": "https://img.example/v.jpg",
            "horizontal": "https://img.example/h.jpg",
        });
        let results = extract_results(&data);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "https://img.example/h.jpg");
        assert_eq!(results[1].url, "https://img.example/v.jpg");
        assert_eq!(results[0].title.as_deref(), Some("Some Show"));
        assert_eq!(results[0].year.as_deref(), Some("2023"));
    }

    #[test]
    fn extract_handles_single_orientation() {
        let data = json!({ "title": "X", "backdrop": "https://img.example/b.jpg" });
        let results = extract_results(&data);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, PosterKind::Landscape);
    }

    #[test]
    fn extract_ignores_empty_strings_and_non_strings() {
        let data = json!({ "poster": "", "landscape": 42 });
        assert!(extract_results(&data).is_empty());
    }

    #[tokio::test]
    async fn empty_query_is_invalid_input() {
        let p = provider();
        let query = PlatformQuery::new("amzn", "   ");
        assert_matches!(p.fetch(&query).await, Err(Error::InvalidInput(_)));
    }
}
