//! Startup mirror of settings from a remote JSON document.
//!
//! When `remote_settings_url` is set, a small overrides document is fetched
//! once at startup and overlaid on the file config. Any failure falls back
//! to the file config with a warning; the remote mirror is never required.

use serde::Deserialize;
use std::time::Duration;

use super::{Config, PlatformOverride};

const MIRROR_TIMEOUT: Duration = Duration::from_secs(10);

/// The overrides document served by the remote settings store.
///
/// All fields are optional; absent fields keep the file-config value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteSettings {
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    #[serde(default)]
    pub netflix_api_base: Option<String>,

    #[serde(default)]
    pub session_remote_url: Option<String>,

    /// Platform keys to disable without a config-file edit.
    #[serde(default)]
    pub disabled_platforms: Vec<String>,
}

impl RemoteSettings {
    /// Overlay these settings on `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(key) = &self.tmdb_api_key {
            config.tmdb.api_key = key.clone();
        }
        if let Some(base) = &self.netflix_api_base {
            config.netflix.api_base = base.clone();
        }
        if let Some(url) = &self.session_remote_url {
            config.session.remote_url = Some(url.clone());
        }
        for key in &self.disabled_platforms {
            config.platforms.push(PlatformOverride {
                key: key.clone(),
                enabled: Some(false),
                ..Default::default()
            });
        }
    }
}

/// Fetch the remote settings document and overlay it on `config`.
///
/// Returns `true` when the overlay was applied. Every failure (no URL,
/// unreachable store, bad payload) leaves `config` untouched and logs a
/// warning.
pub async fn mirror_from_remote(config: &mut Config) -> bool {
    let Some(url) = config.remote_settings_url.clone() else {
        return false;
    };

    let client = match reqwest::Client::builder().timeout(MIRROR_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Failed to build settings mirror client: {e}");
            return false;
        }
    };

    let settings: RemoteSettings = match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => match resp.json().await {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(url = %url, "Remote settings payload invalid: {e}");
                return false;
            }
        },
        Ok(resp) => {
            tracing::warn!(url = %url, status = %resp.status(), "Remote settings GET failed");
            return false;
        }
        Err(e) => {
            tracing::warn!(url = %url, "Remote settings GET error: {e}");
            return false;
        }
    };

    settings.apply(config);
    tracing::info!(url = %url, "Settings mirrored from remote");
    true
}
