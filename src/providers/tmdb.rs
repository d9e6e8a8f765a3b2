//! TMDB (The Movie Database) poster provider.
//!
//! The canonical metadata source. Accepts either a `themoviedb.org` title
//! URL or a free-text "title [year]" query, resolves it to one title, then
//! pulls the full artwork set (posters as Portrait, backdrops as Landscape)
//! with per-image language tags.
//!
//! Features:
//! - Token-bucket rate limiting at 4 requests / second via [`governor`].
//! - Automatic retry on HTTP 429 with `Retry-After` header support (max 3 retries).
//! - Strict year filtering when the query names a year.

use std::num::NonZeroU32;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use posterforged_common::{Error, PosterKind, Result};
use regex::Regex;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{FetchConfig, TmdbConfig};

use super::http::urlencoded;
use super::{PlatformQuery, PosterProvider, ProviderResult};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/original";
const MAX_RETRIES: u32 = 3;

/// ISO-639-1 codes mapped to the display names used in captions.
const LANG_MAP: &[(&str, &str)] = &[
    ("en", "English"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("ml", "Malayalam"),
    ("hi", "Hindi"),
    ("kn", "Kannada"),
    ("mr", "Marathi"),
    ("bn", "Bengali"),
    ("pa", "Punjabi"),
    ("zh", "Chinese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
];

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieSearchResult {
    id: u64,
    title: Option<String>,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbTvSearchResult {
    id: u64,
    name: Option<String>,
    first_air_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbMultiSearchResult {
    id: u64,
    media_type: Option<String>,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbDetail {
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbImagesResponse {
    posters: Option<Vec<TmdbImage>>,
    backdrops: Option<Vec<TmdbImage>>,
}

#[derive(Debug, Deserialize)]
struct TmdbImage {
    file_path: String,
    iso_639_1: Option<String>,
}

// ---------------------------------------------------------------------------
// Query parsing
// ---------------------------------------------------------------------------

/// What a raw `/tmdb` input resolved to before any API call.
#[derive(Debug, PartialEq, Eq)]
enum QueryTarget {
    /// A themoviedb.org title URL: media type ("movie"/"tv") plus id.
    Id { media: &'static str, id: u64 },
    /// Free text, optionally with a trailing year.
    Search { title: String, year: Option<String> },
}

fn tmdb_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"themoviedb\.org/(movie|tv)/(\d+)").expect("valid regex"))
}

fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(19|20)\d{2}\b").expect("valid regex"))
}

fn season_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bS\d{1,2}(E\d{1,2})?\b").expect("valid regex"))
}

/// Classify the raw input as a title URL or a text search.
fn parse_query(raw: &str) -> Result<QueryTarget> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::invalid_input("empty TMDB query"));
    }

    if raw.starts_with("http") {
        let caps = tmdb_url_re()
            .captures(raw)
            .ok_or_else(|| Error::invalid_input("invalid TMDB URL"))?;
        let media = if &caps[1] == "tv" { "tv" } else { "movie" };
        let id: u64 = caps[2]
            .parse()
            .map_err(|_| Error::invalid_input("invalid TMDB id"))?;
        return Ok(QueryTarget::Id { media, id });
    }

    // Season/episode markers never help a title search.
    let mut text = raw.to_string();
    if let Some(m) = season_re().find(&text) {
        text.truncate(m.start());
    }

    let (title, year) = match year_re().find(&text) {
        Some(m) => {
            let year = m.as_str().to_string();
            let title = text[..m.start()].trim().to_string();
            (title, Some(year))
        }
        None => (text.trim().to_string(), None),
    };

    if title.is_empty() {
        return Err(Error::invalid_input("empty TMDB title query"));
    }
    Ok(QueryTarget::Search { title, year })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Extract a four-digit year from a date string like `"2023-04-15"`.
fn parse_year(date: &Option<String>) -> Option<String> {
    date.as_deref()
        .and_then(|d| d.get(..4))
        .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
}

/// Convert a TMDB image path fragment to a full URL.
fn image_url(path: &str) -> String {
    format!("{TMDB_IMAGE_BASE}{path}")
}

/// Map an `iso_639_1` tag to the caption display name.
///
/// Unknown codes are upper-cased; absent/blank tags mean untagged artwork.
fn display_language(code: &Option<String>) -> Option<String> {
    let code = code.as_deref()?.trim().to_ascii_lowercase();
    if code.is_empty() || code == "xx" {
        return None;
    }
    match LANG_MAP.iter().find(|(c, _)| *c == code) {
        Some((_, name)) => Some((*name).to_string()),
        None => Some(code.to_ascii_uppercase()),
    }
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// One title, resolved to a concrete TMDB id.
struct ResolvedTitle {
    media: &'static str,
    id: u64,
    title: Option<String>,
    year: Option<String>,
}

/// TMDB poster provider.
pub struct TmdbProvider {
    client: reqwest::Client,
    api_key: String,
    language: String,
    rate_limiter: RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl TmdbProvider {
    /// Create a new TMDB provider from the config sections.
    ///
    /// Rate limiting is configured at 4 requests per second.
    pub fn new(config: &TmdbConfig, fetch: &FetchConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(fetch.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build TMDB client with timeout: {e}");
                reqwest::Client::new()
            });

        let quota = Quota::per_second(NonZeroU32::new(4).expect("nonzero quota"));

        Self {
            client,
            api_key: config.api_key.clone(),
            language: config.language.clone(),
            rate_limiter: RateLimiter::direct(quota),
        }
    }

    /// Execute a GET request with rate limiting and 429-retry logic.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut retries = 0u32;
        loop {
            self.rate_limiter.until_ready().await;

            let resp = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| Error::fetch(format!("TMDB request failed: {e}")))?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(
                    retry = retries,
                    wait_secs = wait,
                    "TMDB returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            if !resp.status().is_success() {
                return Err(Error::fetch(format!("TMDB error: HTTP {}", resp.status())));
            }

            return resp
                .json::<T>()
                .await
                .map_err(|e| Error::fetch(format!("failed to parse TMDB response: {e}")));
        }
    }

    /// Build a full API URL with the API key and language query parameters.
    fn url(&self, path: &str, extra_params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{TMDB_BASE_URL}{path}?api_key={}&language={}",
            self.api_key, self.language
        );
        for (key, value) in extra_params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoded(value));
        }
        url
    }

    /// Resolve a text search to one title: movie first, then TV, then (when
    /// no year constrains the search) multi.
    async fn resolve_search(&self, title: &str, year: Option<&str>) -> Result<ResolvedTitle> {
        // Movies, strictly filtered to the requested year when present.
        let mut params = vec![("query", title), ("include_adult", "false")];
        if let Some(y) = year {
            params.push(("year", y));
        }
        let body: TmdbSearchResponse<TmdbMovieSearchResult> =
            self.get_json(&self.url("/search/movie", &params)).await?;
        if let Some(hit) = body
            .results
            .into_iter()
            .find(|r| year.is_none() || parse_year(&r.release_date).as_deref() == year)
        {
            return Ok(ResolvedTitle {
                media: "movie",
                id: hit.id,
                title: hit.title,
                year: parse_year(&hit.release_date),
            });
        }

        // TV shows.
        let mut params = vec![("query", title), ("include_adult", "false")];
        if let Some(y) = year {
            params.push(("first_air_date_year", y));
        }
        let body: TmdbSearchResponse<TmdbTvSearchResult> =
            self.get_json(&self.url("/search/tv", &params)).await?;
        if let Some(hit) = body
            .results
            .into_iter()
            .find(|r| year.is_none() || parse_year(&r.first_air_date).as_deref() == year)
        {
            return Ok(ResolvedTitle {
                media: "tv",
                id: hit.id,
                title: hit.name,
                year: parse_year(&hit.first_air_date),
            });
        }

        // Multi search, only useful when the year did not constrain things.
        if year.is_none() {
            let body: TmdbSearchResponse<TmdbMultiSearchResult> = self
                .get_json(&self.url("/search/multi", &[("query", title), ("include_adult", "false")]))
                .await?;
            if let Some(hit) = body
                .results
                .into_iter()
                .find(|r| matches!(r.media_type.as_deref(), Some("movie") | Some("tv")))
            {
                let media = if hit.media_type.as_deref() == Some("tv") {
                    "tv"
                } else {
                    "movie"
                };
                let year = parse_year(&hit.release_date).or_else(|| parse_year(&hit.first_air_date));
                return Ok(ResolvedTitle {
                    media,
                    id: hit.id,
                    title: hit.title.or(hit.name),
                    year,
                });
            }
        }

        Err(Error::not_found(format!("TMDB: no match for '{title}'")))
    }

    /// Fetch title/year details for a known id (URL-form queries).
    async fn resolve_id(&self, media: &'static str, id: u64) -> Result<ResolvedTitle> {
        let detail: TmdbDetail = self.get_json(&self.url(&format!("/{media}/{id}"), &[])).await?;
        let year = parse_year(&detail.release_date).or_else(|| parse_year(&detail.first_air_date));
        Ok(ResolvedTitle {
            media,
            id,
            title: detail.title.or(detail.name),
            year,
        })
    }
}

#[async_trait]
impl PosterProvider for TmdbProvider {
    fn name(&self) -> &str {
        "tmdb"
    }

    fn display_name(&self) -> &str {
        "TMDB"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn fetch(&self, query: &PlatformQuery) -> Result<Vec<ProviderResult>> {
        let resolved = match parse_query(&query.raw)? {
            QueryTarget::Id { media, id } => self.resolve_id(media, id).await?,
            QueryTarget::Search { title, year } => {
                self.resolve_search(&title, year.as_deref()).await?
            }
        };

        let url = self.url(&format!("/{}/{}/images", resolved.media, resolved.id), &[]);
        debug!(media = resolved.media, id = resolved.id, "TMDB get images");
        let images: TmdbImagesResponse = self.get_json(&url).await?;

        let mut results = Vec::new();
        for img in images.backdrops.unwrap_or_default() {
            results.push(ProviderResult {
                url: image_url(&img.file_path),
                kind: PosterKind::Landscape,
                language: display_language(&img.iso_639_1),
                title: resolved.title.clone(),
                year: resolved.year.clone(),
            });
        }
        for img in images.posters.unwrap_or_default() {
            results.push(ProviderResult {
                url: image_url(&img.file_path),
                kind: PosterKind::Portrait,
                language: display_language(&img.iso_639_1),
                title: resolved.title.clone(),
                year: resolved.year.clone(),
            });
        }

        if results.is_empty() {
            return Err(Error::not_found(format!(
                "TMDB: no artwork for {}/{}",
                resolved.media, resolved.id
            )));
        }
        Ok(results)
    }
}
