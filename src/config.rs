//! Tracker configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). Values are read once at startup and never change afterwards.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::TrackedCoins;
use crate::error::TrackerError;
use crate::sentiment::DEFAULT_SAMPLE_SIZE;

const DEFAULT_COINS: &str = "bitcoin,ethereum,dogecoin,shiba-inu";
const DEFAULT_PRICE_API_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Top-level tracker configuration.
///
/// Loaded once at startup via [`TrackerConfig::from_env`].
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// Coins fetched and scored on every refresh cycle.
    pub tracked_coins: TrackedCoins,

    /// Pause between two refresh cycles.
    pub refresh_interval: Duration,

    /// SQLite database file. Created on first start.
    pub database_path: PathBuf,

    /// Maximum number of pooled SQLite connections.
    pub database_max_connections: u32,

    /// Base URL of the CoinGecko-compatible price API.
    pub price_api_base_url: reqwest::Url,

    /// Per-request timeout for the price API.
    pub price_api_timeout: Duration,

    /// Optional newline-separated file of sample posts. `None` selects the
    /// built-in corpus.
    pub posts_file: Option<PathBuf>,

    /// Number of posts drawn per sentiment score.
    pub sentiment_sample_size: usize,

    /// Fixed seed for the sampling RNG. `None` seeds from the OS.
    pub sentiment_seed: Option<u64>,
}

impl TrackerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Config`] if a value is present but invalid,
    /// or if a required value resolves to nothing usable.
    pub fn from_env() -> Result<Self, TrackerError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`TrackerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TrackerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr_raw = lookup("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8000".to_string());
        let listen_addr: SocketAddr = listen_addr_raw
            .parse()
            .map_err(|e| TrackerError::Config(format!("LISTEN_ADDR {listen_addr_raw:?}: {e}")))?;

        let coins_raw = lookup("TRACKED_COINS").unwrap_or_else(|| DEFAULT_COINS.to_string());
        let tracked_coins = TrackedCoins::parse_list(&coins_raw);
        if tracked_coins.is_empty() {
            return Err(TrackerError::Config(
                "TRACKED_COINS must name at least one coin".to_string(),
            ));
        }

        let refresh_secs: u64 = parse_key(&lookup, "REFRESH_INTERVAL_SECS", 180)?;
        if refresh_secs == 0 {
            return Err(TrackerError::Config(
                "REFRESH_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }

        let database_path = lookup("DATABASE_PATH")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from("memecoins.db"), PathBuf::from);
        let database_max_connections = parse_key(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?;

        let base_raw = lookup("PRICE_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_PRICE_API_BASE_URL.to_string());
        let price_api_base_url = reqwest::Url::parse(&base_raw)
            .map_err(|e| TrackerError::Config(format!("PRICE_API_BASE_URL {base_raw:?}: {e}")))?;
        let timeout_secs: u64 = parse_key(&lookup, "PRICE_API_TIMEOUT_SECS", 10)?;
        if timeout_secs == 0 {
            return Err(TrackerError::Config(
                "PRICE_API_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        let posts_file = lookup("POSTS_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let sentiment_sample_size: usize =
            parse_key(&lookup, "SENTIMENT_SAMPLE_SIZE", DEFAULT_SAMPLE_SIZE)?;
        if sentiment_sample_size == 0 {
            return Err(TrackerError::Config(
                "SENTIMENT_SAMPLE_SIZE must be greater than zero".to_string(),
            ));
        }
        let sentiment_seed = lookup("SENTIMENT_SEED")
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .map_err(|e| TrackerError::Config(format!("SENTIMENT_SEED {v:?}: {e}")))
            })
            .transpose()?;

        Ok(Self {
            listen_addr,
            tracked_coins,
            refresh_interval: Duration::from_secs(refresh_secs),
            database_path,
            database_max_connections,
            price_api_base_url,
            price_api_timeout: Duration::from_secs(timeout_secs),
            posts_file,
            sentiment_sample_size,
            sentiment_seed,
        })
    }
}

/// Parses `key` as `T`, returning `default` when the key is unset and an
/// error when it is set to something unparsable.
fn parse_key<F, T>(lookup: &F, key: &str, default: T) -> Result<T, TrackerError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| TrackerError::Config(format!("{key} {raw:?}: {e}"))),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<TrackerConfig, TrackerError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        TrackerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_match_the_four_coin_setup() {
        let Ok(cfg) = load(&[]) else {
            panic!("defaults should load");
        };
        assert_eq!(cfg.tracked_coins.len(), 4);
        assert!(cfg.tracked_coins.contains("shiba-inu"));
        assert_eq!(cfg.refresh_interval, Duration::from_secs(180));
        assert_eq!(cfg.database_path, PathBuf::from("memecoins.db"));
        assert_eq!(cfg.sentiment_sample_size, DEFAULT_SAMPLE_SIZE);
        assert_eq!(cfg.price_api_timeout, Duration::from_secs(10));
        assert!(cfg.posts_file.is_none());
        assert!(cfg.sentiment_seed.is_none());
        assert_eq!(cfg.listen_addr.port(), 8000);
    }

    #[test]
    fn single_coin_one_minute_variant() {
        let Ok(cfg) = load(&[
            ("TRACKED_COINS", "dogecoin"),
            ("REFRESH_INTERVAL_SECS", "60"),
            ("SENTIMENT_SEED", "42"),
        ]) else {
            panic!("variant should load");
        };
        assert_eq!(cfg.tracked_coins.len(), 1);
        assert_eq!(cfg.refresh_interval, Duration::from_secs(60));
        assert_eq!(cfg.sentiment_seed, Some(42));
    }

    #[test]
    fn empty_coin_list_is_rejected() {
        let result = load(&[("TRACKED_COINS", " , ,")]);
        assert!(matches!(result, Err(TrackerError::Config(_))));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let result = load(&[("REFRESH_INTERVAL_SECS", "0")]);
        assert!(matches!(result, Err(TrackerError::Config(_))));
    }

    #[test]
    fn zero_timeout_and_sample_size_are_rejected() {
        for key in ["PRICE_API_TIMEOUT_SECS", "SENTIMENT_SAMPLE_SIZE"] {
            let result = load(&[(key, "0")]);
            let Err(TrackerError::Config(msg)) = result else {
                panic!("{key}=0 should be rejected");
            };
            assert!(msg.contains(key), "message should name {key}: {msg}");
        }
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(matches!(
            load(&[("LISTEN_ADDR", "not-an-addr")]),
            Err(TrackerError::Config(_))
        ));
        assert!(matches!(
            load(&[("PRICE_API_BASE_URL", "::nope")]),
            Err(TrackerError::Config(_))
        ));
        assert!(matches!(
            load(&[("SENTIMENT_SAMPLE_SIZE", "ten")]),
            Err(TrackerError::Config(_))
        ));
    }
}
