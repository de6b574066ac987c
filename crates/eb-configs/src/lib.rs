//! emberboard/crates/eb-configs/src/lib.rs
//!
//! Layered runtime settings: baked-in defaults, then an optional
//! `emberboard.toml`, then `EMBERBOARD__`-prefixed environment variables
//! (loaded through dotenvy first, so a local `.env` works).

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingSettings {
    /// Seconds between hot-score sweeps.
    pub sweep_interval_secs: u64,
    /// Board slugs hidden from the general recent/popular feeds
    /// (e.g. "notices").
    pub feed_excluded_slugs: Vec<String>,
}

impl RankingSettings {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreadSettings {
    /// Top-level comment threads per page.
    pub page_size: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// Emit JSON log lines instead of the human-readable format.
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub ranking: RankingSettings,
    pub thread: ThreadSettings,
    pub log: LogSettings,
}

impl Settings {
    pub fn load() -> Result<Self, SettingsError> {
        if dotenvy::dotenv().is_ok() {
            tracing::debug!("loaded environment from .env");
        }

        let cfg = config::Config::builder()
            .set_default("database.url", "sqlite:emberboard.db")?
            .set_default("database.max_connections", 5)?
            .set_default("ranking.sweep_interval_secs", 1800)?
            .set_default("ranking.feed_excluded_slugs", Vec::<String>::new())?
            .set_default("thread.page_size", 10)?
            .set_default("log.json", false)?
            .add_source(config::File::with_name("emberboard").required(false))
            .add_source(
                config::Environment::with_prefix("EMBERBOARD")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("ranking.feed_excluded_slugs"),
            )
            .build()?;

        Ok(cfg.try_deserialize()?)
    }
}
