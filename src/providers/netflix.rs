//! Netflix title resolver adapter.
//!
//! Netflix artwork comes from a configured resolver endpoint keyed by the
//! numeric title id rather than a page-URL worker: the id is extracted from
//! a `/title/<digits>` URL (or accepted as bare digits) and appended to the
//! resolver base. The response payload matches the worker shape.

use async_trait::async_trait;
use posterforged_common::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use super::http::HttpFetcher;
use super::worker::extract_results;
use super::{PlatformQuery, PosterProvider, ProviderResult};

fn title_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/title/(\d+)").expect("valid regex"))
}

/// Netflix poster provider backed by the configured title resolver.
pub struct NetflixProvider {
    api_base: String,
    fetcher: HttpFetcher,
}

impl NetflixProvider {
    /// Create a provider for the given resolver base URL.
    pub fn new(api_base: String, fetcher: HttpFetcher) -> Self {
        Self { api_base, fetcher }
    }

    /// Extract the numeric title id from a Netflix URL or a bare id string.
    pub fn extract_title_id(raw: &str) -> Option<&str> {
        let raw = raw.trim();
        if let Some(caps) = title_id_re().captures(raw) {
            return caps.get(1).map(|m| m.as_str());
        }
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            return Some(raw);
        }
        None
    }
}

#[async_trait]
impl PosterProvider for NetflixProvider {
    fn name(&self) -> &str {
        "nf"
    }

    fn display_name(&self) -> &str {
        "Netflix"
    }

    fn is_available(&self) -> bool {
        !self.api_base.is_empty()
    }

    async fn fetch(&self, query: &PlatformQuery) -> Result<Vec<ProviderResult>> {
        let id = Self::extract_title_id(&query.raw).ok_or_else(|| {
            Error::invalid_input("could not extract a Netflix title id from the input")
        })?;

        let url = format!("{}{id}", self.api_base);
        debug!(title_id = id, url = %url, "netflix fetch");
        let data = self.fetcher.get_json(&url).await?;

        let results = extract_results(&data);
        if results.is_empty() {
            return Err(Error::not_found(format!(
                "Netflix: no artwork for title {id}"
            )));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;
    use assert_matches::assert_matches;

    #[test]
    fn extracts_id_from_title_url() {
        assert_eq!(
            NetflixProvider::extract_title_id("https://www.netflix.com/title/81234567"),
            Some("81234567")
        );
        assert_eq!(
            NetflixProvider::extract_title_id("https://www.netflix.com/in/title/80057281?s=x"),
            Some("80057281")
        );
    }

    #[test]
    fn accepts_bare_digits() {
        assert_eq!(NetflixProvider::extract_title_id(" 81234567 "), Some("81234567"));
    }

    #[test]
    fn rejects_non_ids() {
        assert_eq!(NetflixProvider::extract_title_id("https://www.netflix.com/browse"), None);
        assert_eq!(NetflixProvider::extract_title_id("81234abc"), None);
        assert_eq!(NetflixProvider::extract_title_id(""), None);
    }

    #[test]
    fn availability_tracks_config() {
        let fetcher = HttpFetcher::new(&FetchConfig::default());
        assert!(!NetflixProvider::new(String::new(), fetcher.clone()).is_available());
        assert!(NetflixProvider::new("https://nf.example/title/".into(), fetcher).is_available());
    }

    #[tokio::test]
    async fn bad_input_is_invalid_input() {
        let provider = NetflixProvider::new(
            "https://nf.example/title/".into(),
            HttpFetcher::new(&FetchConfig::default()),
        );
        let query = PlatformQuery::new("nf", "not-an-id");
        assert_matches!(provider.fetch(&query).await, Err(Error::InvalidInput(_)));
    }
}
