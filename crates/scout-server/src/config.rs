//! Server configuration.

use anyhow::Result;
use scout_core::{LlmConfig, SeedSource};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Where the initial insights of a new query come from.
    #[serde(default)]
    pub seed_source: SeedSource,
    /// Where compile jobs draw further insights from.
    #[serde(default)]
    pub compile_source: SeedSource,
    /// Upper bound on any single request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Upper bound on answer synthesis within a request.
    #[serde(default = "default_synthesis_timeout")]
    pub synthesis_timeout_secs: u64,
    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scout")
        .join("scout.db")
}

fn default_request_timeout() -> u64 {
    60
}

fn default_synthesis_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db_path: default_db_path(),
            seed_source: SeedSource::default(),
            compile_source: SeedSource::default(),
            request_timeout_secs: default_request_timeout(),
            synthesis_timeout_secs: default_synthesis_timeout(),
            llm: LlmConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a specific file path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.llm = config.llm.with_env_overrides();
        Ok(config)
    }

    /// Load config from default location (config/default.toml) or fall back to defaults.
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from("config/default.toml");
        if config_path.exists() {
            return Self::load_from(&config_path);
        }

        Ok(Config::default())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Kept strictly below the request timeout so a slow model yields a 503,
    /// not a 408 from the timeout layer.
    pub fn synthesis_timeout(&self) -> Duration {
        let ceiling = self
            .request_timeout()
            .saturating_sub(Duration::from_secs(1))
            .max(Duration::from_millis(500));
        Duration::from_secs(self.synthesis_timeout_secs.max(1)).min(ceiling)
    }
}
