//! Configuration management

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_CACHE_TTL_SECS, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LOG_FILTER,
    DEFAULT_STORAGE_DIR, DEFAULT_STORAGE_KEY,
};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub cache: CacheSettings,
    pub gating: GatingSettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    pub ttl_seconds: u64,
    pub storage_dir: String,
    pub storage_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatingSettings {
    /// Show every route while no menu catalog has been configured.
    pub bootstrap_show_all: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub filter: String,
    pub json: bool,
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl AppConfig {
    /// Load from `./config`, the environment and an optional `.env` file.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::load_from(Path::new("config"))
    }

    /// Layered load: defaults, `<dir>/default`, `<dir>/<MENUGATE_ENV>`, then
    /// `MENUGATE__SECTION__KEY` environment variables.
    pub fn load_from(dir: &Path) -> Result<Self, AppError> {
        let env = std::env::var("MENUGATE_ENV").unwrap_or_else(|_| "development".into());
        let default_file = dir.join("default");
        let env_file = dir.join(&env);

        let config = Config::builder()
            .set_default("api.base_url", DEFAULT_API_BASE_URL)?
            .set_default("api.timeout_seconds", DEFAULT_HTTP_TIMEOUT_SECS as i64)?
            .set_default("cache.ttl_seconds", DEFAULT_CACHE_TTL_SECS as i64)?
            .set_default("cache.storage_dir", DEFAULT_STORAGE_DIR)?
            .set_default("cache.storage_key", DEFAULT_STORAGE_KEY)?
            .set_default("gating.bootstrap_show_all", true)?
            .set_default("log.filter", DEFAULT_LOG_FILTER)?
            .set_default("log.json", false)?
            .add_source(File::with_name(&default_file.to_string_lossy()).required(false))
            .add_source(File::with_name(&env_file.to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix("MENUGATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::InvalidConfig("api.base_url must not be empty".into()));
        }
        if self.api.timeout_seconds == 0 {
            return Err(AppError::InvalidConfig("api.timeout_seconds must be positive".into()));
        }
        if self.cache.ttl_seconds == 0 {
            return Err(AppError::InvalidConfig("cache.ttl_seconds must be positive".into()));
        }
        if self.cache.storage_key.trim().is_empty() {
            return Err(AppError::InvalidConfig("cache.storage_key must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(dir.path()).unwrap();

        assert_eq!(cfg.cache.ttl(), Duration::from_secs(300));
        assert_eq!(cfg.cache.storage_key, "menu_catalog");
        assert!(cfg.gating.bootstrap_show_all);
        assert!(!cfg.log.json);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[api]\nbase_url = \"https://broker.example.com/api\"\n\n[cache]\nttl_seconds = 60\n",
        )
        .unwrap();

        let cfg = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(cfg.api.base_url, "https://broker.example.com/api");
        assert_eq!(cfg.cache.ttl_seconds, 60);
        assert_eq!(cfg.api.timeout_seconds, 10);
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[cache]\nttl_seconds = 0\n").unwrap();

        let err = AppConfig::load_from(dir.path()).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }
}
