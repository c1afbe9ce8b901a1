use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;

use crate::error::{PresenterError, Result};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_EXPORT_DIR: &str = "exports";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// How a successful scrape is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// One HTML card per result record.
    #[default]
    Cards,
    /// Pretty-printed JSON of the response payload.
    RawJson,
}

impl FromStr for RenderMode {
    type Err = PresenterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cards" => Ok(RenderMode::Cards),
            "raw" | "json" => Ok(RenderMode::RawJson),
            other => Err(PresenterError::Config(format!("Unknown render mode: {}", other))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: Url,
    pub export_dir: PathBuf,
    pub connect_timeout: Duration,
    pub render_mode: RenderMode,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = lookup("SCRAPE_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&base)?;

        let export_dir = lookup("EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR));

        let connect_timeout = match lookup("CONNECT_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    PresenterError::Config(format!("Invalid connect timeout: {}", e))
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        let render_mode = match lookup("RENDER_MODE") {
            Some(raw) => raw.parse()?,
            None => RenderMode::Cards,
        };

        Ok(Config {
            base_url,
            export_dir,
            connect_timeout,
            render_mode,
        })
    }
}

/// Parses a backend base URL. A trailing slash is enforced so that joining
/// relative endpoint paths keeps any path prefix.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized)
        .map_err(|e| PresenterError::Config(format!("Invalid base url {}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:8000/");
        assert_eq!(config.export_dir, PathBuf::from("exports"));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.render_mode, RenderMode::Cards);
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("SCRAPE_BASE_URL", "https://scraper.example.com/api"),
            ("EXPORT_DIR", "/tmp/out"),
            ("CONNECT_TIMEOUT_SECS", "12"),
            ("RENDER_MODE", "raw"),
        ]))
        .unwrap();

        assert_eq!(config.base_url.as_str(), "https://scraper.example.com/api/");
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.connect_timeout, Duration::from_secs(12));
        assert_eq!(config.render_mode, RenderMode::RawJson);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let bad_url = Config::from_lookup(lookup_from(&[("SCRAPE_BASE_URL", "not a url")]));
        assert!(matches!(bad_url, Err(PresenterError::Config(_))));

        let bad_timeout = Config::from_lookup(lookup_from(&[("CONNECT_TIMEOUT_SECS", "soon")]));
        assert!(matches!(bad_timeout, Err(PresenterError::Config(_))));

        let bad_mode = Config::from_lookup(lookup_from(&[("RENDER_MODE", "table")]));
        assert!(matches!(bad_mode, Err(PresenterError::Config(_))));
    }
}
