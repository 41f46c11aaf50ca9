use std::{env, fs, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

pub const DEFAULT_POSTER_SIZE: &str = "w342";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub tmdb_api_token: Option<String>,
    pub cache_dir: Option<String>,
    pub language: Option<String>,
    pub poster_size: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tmdb_api_token: None,
            cache_dir: None,
            language: None,
            poster_size: DEFAULT_POSTER_SIZE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(alias = "api_token")]
    tmdb_api_token: Option<String>,
    cache_dir: Option<String>,
    language: Option<String>,
    poster_size: Option<String>,
}

/// Known TMDB poster widths; anything else falls back to the default.
const POSTER_SIZES: [&str; 7] = ["w92", "w154", "w185", "w342", "w500", "w780", "original"];

pub fn load_config() -> AppConfig {
    let cfg_path = resolve_relative_path("config.json");
    let mut cfg = AppConfig::default();

    match fs::read_to_string(&cfg_path) {
        Ok(raw) => match serde_json::from_str::<RawConfig>(&raw) {
            Ok(parsed) => {
                if parsed.tmdb_api_token.is_some() {
                    cfg.tmdb_api_token = parsed.tmdb_api_token;
                }
                if parsed.cache_dir.is_some() {
                    cfg.cache_dir = parsed.cache_dir;
                }
                if parsed.language.is_some() {
                    cfg.language = parsed.language;
                }
                if let Some(size) = parsed.poster_size {
                    if POSTER_SIZES.contains(&size.as_str()) {
                        cfg.poster_size = size;
                    } else {
                        warn!(
                            "Unknown poster_size `{size}` in config.json; using {DEFAULT_POSTER_SIZE}."
                        );
                    }
                }
                info!("Loaded config from {}", cfg_path.display());
            }
            Err(err) => {
                warn!("Failed to parse config.json ({}). Using defaults.", err);
            }
        },
        Err(_) => {
            info!("No config.json found; using defaults");
        }
    }

    // Env var wins over the file so tokens can stay out of config.json.
    if let Ok(token) = env::var("TMDX_API_TOKEN") {
        if !token.trim().is_empty() {
            cfg.tmdb_api_token = Some(token.trim().to_string());
        }
    }

    cfg
}

/// Resolve a path relative to the executable's directory, falling back to the
/// working directory when the exe path is unavailable.
pub fn resolve_relative_path(name: &str) -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.join(name)))
        .unwrap_or_else(|| PathBuf::from(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_default_poster_size() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.poster_size, DEFAULT_POSTER_SIZE);
        assert!(cfg.tmdb_api_token.is_none());
    }

    #[test]
    fn raw_config_accepts_api_token_alias() {
        let raw: RawConfig = serde_json::from_str(r#"{"api_token":"abc"}"#).unwrap();
        assert_eq!(raw.tmdb_api_token.as_deref(), Some("abc"));
    }
}
