//! Configuration loader with file and environment variable support

use crate::{BridgeConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::info;

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "authbridge.toml",
    "config.toml",
    "./config/authbridge.toml",
    "/etc/authbridge/config.toml",
];

/// Configuration loader
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

    /// Load configuration from file (if found) with environment variable overrides
    pub fn load(&self) -> Result<BridgeConfig, ConfigError> {
        let mut config = BridgeConfig::default();

        if let Some(path) = self.find_config_file() {
            info!(?path, "Loading configuration from file");
            config = BridgeConfig::from_file(&path)?;
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
        }

        if let Ok(path) = env::var("AUTHBRIDGE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        for path in CONFIG_PATHS {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&self, config: &mut BridgeConfig) {
        // HTTP
        if let Ok(val) = env::var("AB_HTTP_PORT") {
            if let Ok(port) = val.parse() {
                config.http.port = port;
            }
        }
        if let Ok(val) = env::var("AB_HTTP_HOST") {
            config.http.host = val;
        }
        if let Ok(val) = env::var("AB_CORS_ORIGINS") {
            config.http.cors_origins = val.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(val) = env::var("AB_PUBLIC_BASE_URL") {
            config.http.public_base_url = val;
        }

        // Remote widget service
        if let Ok(val) = env::var("AB_API_KEY") {
            config.settings.api_key = val;
        }
        if let Ok(val) = env::var("AB_API_BASE_URL") {
            config.settings.api_base_url = val;
        }
        if let Ok(val) = env::var("AB_ORG_ID") {
            config.settings.org_id = val;
        }
        if let Ok(val) = env::var("AB_WIDGET_URL") {
            config.settings.widget_url = val;
        }
        if let Ok(val) = env::var("AB_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.settings.request_timeout_secs = secs;
            }
        }

        // Provisioning policy
        if let Ok(val) = env::var("AB_AUTO_CREATE_USERS") {
            config.settings.auto_create_users = val.parse().unwrap_or(true);
        }
        if let Ok(val) = env::var("AB_USERNAME_PATTERN") {
            config.settings.username_pattern = val;
        }
        if let Ok(val) = env::var("AB_DEFAULT_ROLE") {
            config.settings.default_role = if val.is_empty() { None } else { Some(val) };
        }
        if let Ok(val) = env::var("AB_EMAIL_VERIFICATION") {
            config.settings.email_verification = val.parse().unwrap_or(false);
        }
        if let Ok(val) = env::var("AB_REDIRECT_AFTER_LOGIN") {
            config.settings.redirect_after_login = val;
        }
        if let Ok(val) = env::var("AB_DEBUG_MODE") {
            config.settings.debug_mode = val.parse().unwrap_or(false);
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
