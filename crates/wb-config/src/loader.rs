//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "wallboard.toml",
    "./config/config.toml",
    "/etc/wallboard/config.toml",
];

/// Configuration loader
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load configuration from file (if found), apply environment
    /// overrides, then validate.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfig::default();

        if let Some(path) = self.find_config_file() {
            info!(?path, "Loading configuration from file");
            config = AppConfig::from_file(&path)?;
        }

        self.apply_env_overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
            warn!(?path, "Configured file not found, searching defaults");
        }

        if let Ok(path) = env::var("WALLBOARD_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&self, config: &mut AppConfig) {
        // HTTP
        if let Ok(val) = env::var("WALLBOARD_HTTP_PORT") {
            match val.parse() {
                Ok(port) => config.http.port = port,
                Err(_) => warn!(value = %val, "Ignoring invalid WALLBOARD_HTTP_PORT"),
            }
        }
        if let Ok(val) = env::var("WALLBOARD_HTTP_HOST") {
            config.http.host = val;
        }
        if let Ok(val) = env::var("WALLBOARD_CORS_ORIGINS") {
            config.http.cors_origins = val.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Database
        if let Ok(val) = env::var("WALLBOARD_DATABASE_URL") {
            config.database.url = val;
        }
        if let Ok(val) = env::var("WALLBOARD_DATABASE_MAX_CONNECTIONS") {
            match val.parse() {
                Ok(n) => config.database.max_connections = n,
                Err(_) => warn!(value = %val, "Ignoring invalid WALLBOARD_DATABASE_MAX_CONNECTIONS"),
            }
        }

        // Auth
        if let Some(secret) = env::var("WALLBOARD_JWT_SECRET")
            .ok()
            .or_else(|| env::var("JWT_SECRET").ok())
        {
            config.auth.jwt_secret = Some(secret);
        }
        if let Ok(val) = env::var("WALLBOARD_JWT_ISSUER") {
            config.auth.issuer = val;
        }

        if let Ok(val) = env::var("WALLBOARD_DEV_MODE") {
            config.dev_mode = val == "true" || val == "1";
        }
    }
}
