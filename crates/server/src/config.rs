use anyhow::{bail, Context};
use std::collections::HashMap;
use std::{net::SocketAddr, time::Duration};

use metals_tracker_core::providers::registry::METALS_DEV_KEY;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub database_url: String,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
    pub static_dir: String,
    pub dev_mode: bool,
    pub metals_dev_api_key: Option<String>,
}

impl Config {
    /// Read configuration from the process environment (after loading `.env`).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let listen_addr: SocketAddr = get("LISTEN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8000".to_string())
            .parse()
            .context("Invalid LISTEN_ADDR")?;

        let database_url = get("DATABASE_URL").unwrap_or_else(|| "db/database.db".into());

        let refresh_secs: u64 = get("PRICE_REFRESH_INTERVAL_SECS")
            .unwrap_or_else(|| "300".into())
            .parse()
            .context("Invalid PRICE_REFRESH_INTERVAL_SECS")?;
        if refresh_secs == 0 {
            bail!("PRICE_REFRESH_INTERVAL_SECS must be greater than 0");
        }

        let timeout_ms: u64 = get("REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|| "30000".into())
            .parse()
            .context("Invalid REQUEST_TIMEOUT_MS")?;

        let static_dir = get("STATIC_DIR")
            .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string());

        let dev_mode = get("APP_ENV")
            .map(|v| v.trim().eq_ignore_ascii_case("development"))
            .unwrap_or(false);

        let metals_dev_api_key = get("METALS_DEV_API_KEY").filter(|k| !k.trim().is_empty());

        Ok(Self {
            listen_addr,
            database_url,
            refresh_interval: Duration::from_secs(refresh_secs),
            request_timeout: Duration::from_millis(timeout_ms),
            static_dir,
            dev_mode,
            metals_dev_api_key,
        })
    }

    /// API keys in the shape the provider registry expects.
    pub fn api_keys(&self) -> HashMap<String, String> {
        let mut keys = HashMap::new();
        if let Some(key) = &self.metals_dev_api_key {
            keys.insert(METALS_DEV_KEY.to_string(), key.clone());
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:8000".parse().unwrap());
        assert_eq!(config.database_url, "db/database.db");
        assert_eq!(config.refresh_interval, Duration::from_secs(300));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(!config.dev_mode);
        assert!(config.metals_dev_api_key.is_none());
        assert!(config.api_keys().is_empty());
        assert!(config.static_dir.ends_with("/static"));
    }

    #[test]
    fn overrides() {
        let config = Config::from_lookup(lookup(&[
            ("LISTEN_ADDR", "0.0.0.0:9000"),
            ("DATABASE_URL", "sqlite:///tmp/metals.db"),
            ("PRICE_REFRESH_INTERVAL_SECS", "60"),
            ("APP_ENV", "Development"),
            ("METALS_DEV_API_KEY", "secret"),
        ]))
        .unwrap();
        assert_eq!(config.listen_addr.port(), 9000);
        assert_eq!(config.database_url, "sqlite:///tmp/metals.db");
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert!(config.dev_mode);
        assert_eq!(config.api_keys().get(METALS_DEV_KEY).unwrap(), "secret");
    }

    #[test]
    fn blank_api_key_is_ignored() {
        let config = Config::from_lookup(lookup(&[("METALS_DEV_API_KEY", "  ")])).unwrap();
        assert!(config.metals_dev_api_key.is_none());
    }

    #[test]
    fn zero_refresh_interval_is_rejected() {
        let err = Config::from_lookup(lookup(&[("PRICE_REFRESH_INTERVAL_SECS", "0")]))
            .err()
            .unwrap();
        assert!(err.to_string().contains("greater than 0"));
    }

    #[test]
    fn invalid_listen_addr_is_rejected() {
        assert!(Config::from_lookup(lookup(&[("LISTEN_ADDR", "nope")])).is_err());
    }

    #[test]
    fn other_app_env_is_production() {
        let config = Config::from_lookup(lookup(&[("APP_ENV", "production")])).unwrap();
        assert!(!config.dev_mode);
    }
}
