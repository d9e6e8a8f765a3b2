use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub netflix: NetflixConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub session: SessionConfig,

    /// Optional URL of a JSON settings document mirrored at startup.
    #[serde(default)]
    pub remote_settings_url: Option<String>,

    /// Per-platform overrides of the built-in OTT platform table.
    #[serde(default)]
    pub platforms: Vec<PlatformOverride>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// TMDB v3 API key. The provider reports unavailable when empty.
    #[serde(default)]
    pub api_key: String,

    /// Preferred metadata language, ISO-639-1 with region (e.g. "en-US").
    #[serde(default = "default_tmdb_language")]
    pub language: String,
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            language: default_tmdb_language(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NetflixConfig {
    /// Base URL of the Netflix title resolver; the numeric title id is
    /// appended directly. Provider reports unavailable when empty.
    #[serde(default)]
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Per-request timeout for provider calls, in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    /// How many times a transient fetch failure is retried.
    #[serde(default = "default_fetch_retries")]
    pub retries: u32,

    /// Linear backoff step between retries, in milliseconds.
    #[serde(default = "default_fetch_backoff")]
    pub backoff_ms: u64,
}

fn default_fetch_timeout() -> u64 {
    16
}
fn default_fetch_retries() -> u32 {
    2
}
fn default_fetch_backoff() -> u64 {
    500
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            retries: default_fetch_retries(),
            backoff_ms: default_fetch_backoff(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Seconds of inactivity before a selection session expires.
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,

    /// How often the background eviction task runs, in seconds.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,

    /// Optional base URL of a remote JSON store mirroring session state.
    #[serde(default)]
    pub remote_url: Option<String>,
}

fn default_session_ttl() -> u64 {
    900
}
fn default_cleanup_interval() -> u64 {
    60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_session_ttl(),
            cleanup_interval_secs: default_cleanup_interval(),
            remote_url: None,
        }
    }
}

// ---------------------------------------------------------------------------
// OTT platform table
// ---------------------------------------------------------------------------

/// A resolved OTT platform entry: one worker-backed poster source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Platform {
    /// Registry key, also the chat command name (e.g. "amzn").
    pub key: String,
    /// Human-readable platform name used in captions.
    pub name: String,
    /// Endpoint template; `{url}` is replaced with the encoded page URL.
    pub endpoint: String,
    /// Disabled platforms stay registered but are rejected at dispatch.
    pub enabled: bool,
}

/// A config-file override for one platform table entry.
///
/// Unset fields keep the built-in value; unknown keys add new platforms
/// (which must then supply an endpoint).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlatformOverride {
    pub key: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub enabled: Option<bool>,
}

/// The built-in scraped-platform table.
///
/// Each entry is an independent worker endpoint returning one JSON document
/// per title page URL.
pub fn builtin_platforms() -> Vec<Platform> {
    const TABLE: &[(&str, &str, &str)] = &[
        (
            "amzn",
            "Amazon Prime Video",
            "https://amzn.rickheroko.workers.dev/?url={url}",
        ),
        (
            "airtel",
            "Airtel Xstream",
            "https://hgbots.vercel.app/bypaas/airtel.php?url={url}",
        ),
        (
            "zee5",
            "ZEE5",
            "https://zee5.rickheroko.workers.dev/?url={url}",
        ),
        (
            "hulu",
            "Hulu",
            "https://hulu.ottposters.workers.dev/?url={url}",
        ),
        (
            "viki",
            "Rakuten Viki",
            "https://viki.rickheroko.workers.dev/?url={url}",
        ),
        (
            "snxt",
            "Sun NXT",
            "https://snxt.rickgrimesapi.workers.dev/?url={url}",
        ),
        (
            "mmax",
            "ManoramaMax",
            "https://mmax.rickgrimesapi.workers.dev/?url={url}",
        ),
        (
            "aha",
            "Aha",
            "https://aha.rickgrimesapi.workers.dev/?url={url}",
        ),
        (
            "dsnp",
            "Disney+",
            "https://dsnp.rickgrimesapi.workers.dev/?url={url}",
        ),
        (
            "apple",
            "Apple TV",
            "https://appletv.rickheroko.workers.dev/?url={url}",
        ),
        (
            "bms",
            "BookMyShow",
            "https://bookmyshow-dcbots.jibinlal232.workers.dev/?url={url}",
        ),
        (
            "iq",
            "iQIYI",
            "https://iq.rickgrimesapi.workers.dev/?url={url}",
        ),
        (
            "hbo",
            "HBO Max",
            "https://hbomax.rickgrimesapi.workers.dev/?url={url}",
        ),
        (
            "up",
            "UltraPlay",
            "https://ultraplay.rickgrimesapi.workers.dev/?url={url}",
        ),
        (
            "uj",
            "UltraJhakaas",
            "https://ultrajhakaas.rickheroko.workers.dev/?url={url}",
        ),
        (
            "wetv",
            "WeTV",
            "https://wetv.the-zake.workers.dev/?url={url}",
        ),
        (
            "sl",
            "SonyLIV",
            "https://sonyliv.rickheroko.workers.dev/?url={url}",
        ),
        (
            "tk",
            "TentKotta",
            "https://tentkotta.rickheroko.workers.dev/?url={url}",
        ),
    ];

    TABLE
        .iter()
        .map(|(key, name, endpoint)| Platform {
            key: (*key).to_string(),
            name: (*name).to_string(),
            endpoint: (*endpoint).to_string(),
            enabled: true,
        })
        .collect()
}

impl Config {
    /// The built-in platform table with this config's overrides applied.
    ///
    /// Overrides match by key; unknown keys become new platforms when they
    /// carry an endpoint, and are dropped with a warning otherwise.
    pub fn resolved_platforms(&self) -> Vec<Platform> {
        let mut platforms = builtin_platforms();

        for ov in &self.platforms {
            if let Some(platform) = platforms.iter_mut().find(|p| p.key == ov.key) {
                if let Some(name) = &ov.name {
                    platform.name = name.clone();
                }
                if let Some(endpoint) = &ov.endpoint {
                    platform.endpoint = endpoint.clone();
                }
                if let Some(enabled) = ov.enabled {
                    platform.enabled = enabled;
                }
            } else if let Some(endpoint) = &ov.endpoint {
                platforms.push(Platform {
                    key: ov.key.clone(),
                    name: ov.name.clone().unwrap_or_else(|| ov.key.clone()),
                    endpoint: endpoint.clone(),
                    enabled: ov.enabled.unwrap_or(true),
                });
            } else {
                tracing::warn!(key = %ov.key, "platform override without endpoint ignored");
            }
        }

        platforms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_well_formed() {
        let platforms = builtin_platforms();
        assert_eq!(platforms.len(), 18);
        for p in &platforms {
            assert!(!p.key.is_empty());
            assert!(!p.name.is_empty());
            assert!(p.endpoint.contains("{url}"), "{} lacks {{url}}", p.key);
            assert!(p.enabled);
        }
    }

    #[test]
    fn builtin_keys_are_unique() {
        let platforms = builtin_platforms();
        let mut keys: Vec<_> = platforms.iter().map(|p| p.key.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), platforms.len());
    }

    #[test]
    fn override_disables_platform() {
        let config = Config {
            platforms: vec![PlatformOverride {
                key: "amzn".to_string(),
                enabled: Some(false),
                ..Default::default()
            }],
            ..Default::default()
        };
        let amzn = config
            .resolved_platforms()
            .into_iter()
            .find(|p| p.key == "amzn")
            .unwrap();
        assert!(!amzn.enabled);
        assert_eq!(amzn.name, "Amazon Prime Video");
    }

    #[test]
    fn override_adds_new_platform() {
        let config = Config {
            platforms: vec![PlatformOverride {
                key: "newott".to_string(),
                name: Some("New OTT".to_string()),
                endpoint: Some("https://newott.example/?url={url}".to_string()),
                enabled: None,
            }],
            ..Default::default()
        };
        let platforms = config.resolved_platforms();
        assert_eq!(platforms.len(), 19);
        let added = platforms.iter().find(|p| p.key == "newott").unwrap();
        assert!(added.enabled);
        assert_eq!(added.name, "New OTT");
    }

    #[test]
    fn override_without_endpoint_for_unknown_key_is_dropped() {
        let config = Config {
            platforms: vec![PlatformOverride {
                key: "mystery".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(config.resolved_platforms().len(), 18);
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.tmdb.language, "en-US");
        assert_eq!(config.fetch.timeout_secs, 16);
        assert_eq!(config.session.ttl_secs, 900);
        assert!(config.session.remote_url.is_none());
    }
}
