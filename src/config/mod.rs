pub mod remote;
mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./posterforged.toml",
        "/etc/posterforged/config.toml",
    ];

    for path_str in default_paths {
        let path = Path::new(path_str);
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.fetch.timeout_secs == 0 {
        anyhow::bail!("Fetch timeout cannot be 0");
    }

    if config.session.ttl_secs == 0 {
        anyhow::bail!("Session TTL cannot be 0");
    }

    // Validate platform overrides
    for ov in &config.platforms {
        if ov.key.trim().is_empty() {
            anyhow::bail!("Platform override with empty key");
        }
        if let Some(endpoint) = &ov.endpoint {
            if !endpoint.contains("{url}") {
                anyhow::bail!("Platform '{}' endpoint lacks a {{url}} placeholder", ov.key);
            }
        }
    }

    Ok(())
}
