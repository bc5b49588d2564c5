//! Runtime configuration
//!
//! Precedence: CLI flag, then `GOLDMIND_*` environment variable, then the
//! built-in default. The backend URL is validated up front so a bad address
//! fails at startup instead of on the first request.

use crate::error::{AppError, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000/";
const DEFAULT_SYMBOL: &str = "XAUUSD";
const DEFAULT_POLL_SECS: u64 = 30;
const DEFAULT_HISTORY_LIMIT: usize = 20;
const DEFAULT_DONE_DISPLAY_MS: u64 = 2000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Command-line interface
#[derive(Debug, Parser, Default)]
#[command(name = "goldmind", about = "GoldMind Terminal - AI Gold Trading Assistant")]
pub struct Cli {
    /// Backend base URL (default http://127.0.0.1:8000)
    #[arg(long, value_name = "URL")]
    pub backend_url: Option<String>,

    /// Data directory for history, downloads and saved charts
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Market symbol to track on startup
    #[arg(long, value_name = "SYMBOL")]
    pub symbol: Option<String>,

    /// Market poll interval in seconds
    #[arg(long, value_name = "SECS")]
    pub poll_secs: Option<u64>,

    /// Keep query history in memory only (skip the on-disk store)
    #[arg(long)]
    pub ephemeral: bool,
}

/// Runtime configuration shared across the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the assistant backend
    pub backend_url: Url,
    /// Directory for persisted state (query history, downloads, charts)
    pub data_dir: PathBuf,
    /// Market symbol shown on startup
    pub symbol: String,
    /// Interval between scheduled market refreshes
    pub market_poll_interval: Duration,
    /// How long the upload panel shows "done" before returning to idle
    pub done_display: Duration,
    /// Cap on persisted query-history records
    pub history_limit: usize,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Skip the on-disk history store
    pub ephemeral: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: Url::parse(DEFAULT_BACKEND_URL).expect("default URL is valid"),
            data_dir: default_data_dir(),
            symbol: DEFAULT_SYMBOL.to_string(),
            market_poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            done_display: Duration::from_millis(DEFAULT_DONE_DISPLAY_MS),
            history_limit: DEFAULT_HISTORY_LIMIT,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            ephemeral: false,
        }
    }
}

impl AppConfig {
    /// Build the configuration from CLI arguments layered over the environment
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = Self::from_env()?;

        if let Some(url) = &cli.backend_url {
            config.backend_url = parse_backend_url(url)?;
        }
        if let Some(dir) = &cli.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(symbol) = &cli.symbol {
            config.symbol = symbol.trim().to_uppercase();
        }
        if let Some(secs) = cli.poll_secs {
            config.market_poll_interval = Duration::from_secs(secs.max(1));
        }
        if cli.ephemeral {
            config.ephemeral = true;
        }

        Ok(config)
    }

    /// Build the configuration from `GOLDMIND_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("GOLDMIND_BACKEND_URL") {
            config.backend_url = parse_backend_url(&url)?;
        }
        if let Ok(dir) = std::env::var("GOLDMIND_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(symbol) = std::env::var("GOLDMIND_SYMBOL") {
            if !symbol.trim().is_empty() {
                config.symbol = symbol.trim().to_uppercase();
            }
        }
        if let Some(secs) = env_parse::<u64>("GOLDMIND_POLL_SECS") {
            config.market_poll_interval = Duration::from_secs(secs.max(1));
        }
        if let Some(limit) = env_parse::<usize>("GOLDMIND_HISTORY_LIMIT") {
            config.history_limit = limit.max(1);
        }
        if let Some(ms) = env_parse::<u64>("GOLDMIND_DONE_DISPLAY_MS") {
            config.done_display = Duration::from_millis(ms);
        }
        if let Some(secs) = env_parse::<u64>("GOLDMIND_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs.max(1));
        }

        Ok(config)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn parse_backend_url(raw: &str) -> Result<Url> {
    // A trailing slash makes Url::join treat the last segment as a directory.
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized)
        .map_err(|e| AppError::Config(format!("Invalid backend URL '{}': {}", raw, e)))
}

fn default_data_dir() -> PathBuf {
    dirs_next::data_dir()
        .map(|d| d.join("goldmind"))
        .unwrap_or_else(|| PathBuf::from(".goldmind"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.symbol, "XAUUSD");
        assert_eq!(config.market_poll_interval, Duration::from_secs(30));
        assert_eq!(config.history_limit, 20);
        assert!(!config.ephemeral);
    }

    #[test]
    fn cli_overrides_defaults() {
        let cli = Cli {
            backend_url: Some("http://10.0.0.5:9000".to_string()),
            symbol: Some("xauusd".to_string()),
            poll_secs: Some(5),
            ephemeral: true,
            ..Default::default()
        };
        let config = AppConfig::from_cli(&cli).unwrap();
        assert_eq!(config.backend_url.as_str(), "http://10.0.0.5:9000/");
        assert_eq!(config.symbol, "XAUUSD");
        assert_eq!(config.market_poll_interval, Duration::from_secs(5));
        assert!(config.ephemeral);
    }

    #[test]
    fn rejects_garbage_backend_url() {
        let cli = Cli {
            backend_url: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(AppConfig::from_cli(&cli).is_err());
    }

    #[test]
    fn base_url_always_ends_with_slash() {
        let url = parse_backend_url("http://localhost:8000").unwrap();
        assert!(url.as_str().ends_with('/'));
        // A joined path must extend, not replace, the base.
        assert_eq!(
            url.join("files/").unwrap().as_str(),
            "http://localhost:8000/files/"
        );
    }
}
