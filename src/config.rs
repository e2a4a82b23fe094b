use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub database: DatabaseConfig,

    pub cache: CacheConfig,

    pub engine: EngineConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Emit logs as JSON lines instead of the human readable format.
    pub log_json: bool,

    /// Tokio worker threads, 0 = one per CPU.
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
            worker_threads: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,

    pub max_connections: u32,

    pub min_connections: u32,

    /// Connection attempts before startup gives up.
    pub connect_retries: u32,

    /// Fixed delay between connection attempts.
    pub retry_delay_ms: u64,

    pub run_migrations: bool,

    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/pantry.db?mode=rwc".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_retries: 5,
            retry_delay_ms: 2000,
            run_migrations: true,
            acquire_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    #[default]
    Redis,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackendKind,

    pub redis_url: String,

    /// Collapse concurrent misses on the same key into one computation.
    pub single_flight: bool,

    pub connection_retries: usize,

    /// COUNT hint passed to SCAN during prefix clears.
    pub scan_batch_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::Redis,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            single_flight: true,
            connection_retries: 3,
            scan_batch_size: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Deadline for a single listing or detail call. Unset means no deadline.
    pub request_timeout_ms: Option<u64>,

    pub saved_recipes_limit: u64,

    pub popular_limit: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: None,
            saved_recipes_limit: 100,
            popular_limit: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub metrics_port: Option<u16>,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::config_paths()
            .into_iter()
            .find(|path| path.exists())
            .map_or_else(
                || {
                    info!("No config file found, using defaults");
                    Ok(Self::default())
                },
                |path| {
                    info!("Loading config from: {}", path.display());
                    Self::load_from_path(&path)
                },
            )?;

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    /// Writes a default config to `./config.toml` unless one already exists.
    pub fn create_default_if_missing() -> Result<bool> {
        let path = PathBuf::from("config.toml");
        if path.exists() {
            return Ok(false);
        }
        Self::default().save_to_path(&path)?;
        Ok(true)
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        if let Ok(explicit) = std::env::var("PANTRY_CONFIG") {
            paths.push(PathBuf::from(explicit));
        }

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("pantry").join("config.toml"));
        }

        paths
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(url) = std::env::var("REDIS_URL") {
            self.cache.redis_url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            anyhow::bail!("database.url cannot be empty");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be > 0");
        }

        if self.database.min_connections > self.database.max_connections {
            anyhow::bail!("database.min_connections cannot exceed max_connections");
        }

        if self.cache.backend == CacheBackendKind::Redis && self.cache.redis_url.trim().is_empty()
        {
            anyhow::bail!("cache.redis_url cannot be empty when the redis backend is selected");
        }

        if self.cache.scan_batch_size == 0 {
            anyhow::bail!("cache.scan_batch_size must be > 0");
        }

        Ok(())
    }
}
