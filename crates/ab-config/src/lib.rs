//! AuthBridge Configuration System
//!
//! TOML-based configuration with environment variable override support.
//! `ManagementSettings` is the read-only snapshot handed to the identity
//! pipeline and the management API client; nothing in the core reads
//! configuration ambiently.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Root application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub http: HttpConfig,
    pub settings: ManagementSettings,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            settings: ManagementSettings::default(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    /// Externally reachable base URL, used to build the widget callback URI
    pub public_base_url: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            cors_origins: vec!["http://localhost:4200".to_string()],
            public_base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// Settings for the remote widget service and the provisioning policy.
///
/// Loaded once per process, treated as an immutable snapshot per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagementSettings {
    /// Management API key (Bearer token)
    pub api_key: String,

    /// Management API base URL
    pub api_base_url: String,

    /// Organization identifier at the widget service
    pub org_id: String,

    /// Legacy alias for `org_id`; honored when `org_id` is unset
    pub client_id: String,

    /// Browser widget script URL
    pub widget_url: String,

    /// Create a local identity on first login
    pub auto_create_users: bool,

    /// Username derivation pattern; `[email]` and `[name]` are substituted
    pub username_pattern: String,

    /// Role attached to newly created identities (skipped when it is the
    /// implicit "authenticated" baseline)
    pub default_role: Option<String>,

    /// Treat the provider-verified email as proof, marking the identity
    /// verified at creation
    pub email_verification: bool,

    /// Post-login redirect: empty keeps the current page, "<front>" is the
    /// home route, anything else is used verbatim
    pub redirect_after_login: String,

    /// Verbose provisioning logs
    pub debug_mode: bool,

    /// Outbound request timeout for the management API, in seconds
    pub request_timeout_secs: u64,
}

impl Default for ManagementSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: "https://api.widgetid.io".to_string(),
            org_id: String::new(),
            client_id: String::new(),
            widget_url: "https://auth.widgetid.io/public/pkce.js".to_string(),
            auto_create_users: true,
            username_pattern: "[email]".to_string(),
            default_role: None,
            email_verification: false,
            redirect_after_login: String::new(),
            debug_mode: false,
            request_timeout_secs: 15,
        }
    }
}

impl ManagementSettings {
    /// Effective organization id, honoring the legacy `client_id` key.
    pub fn effective_org_id(&self) -> &str {
        if self.org_id.is_empty() {
            &self.client_id
        } else {
            &self.org_id
        }
    }
}

impl BridgeConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: BridgeConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with environment variable override
    pub fn load() -> Result<Self, ConfigError> {
        let loader = ConfigLoader::new();
        loader.load()
    }

    /// Validate URL-valued settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.settings.api_base_url).map_err(|_| {
            ConfigError::ValidationError(format!(
                "api_base_url is not a valid URL: {}",
                self.settings.api_base_url
            ))
        })?;
        url::Url::parse(&self.settings.widget_url).map_err(|_| {
            ConfigError::ValidationError(format!(
                "widget_url is not a valid URL: {}",
                self.settings.widget_url
            ))
        })?;
        Ok(())
    }

    /// Generate an example TOML configuration
    pub fn example_toml() -> String {
        r#"# AuthBridge Configuration
# Environment variables override these settings

[http]
port = 8080
host = "0.0.0.0"
cors_origins = ["http://localhost:4200"]

[settings]
api_key = ""
api_base_url = "https://api.widgetid.io"
org_id = ""
widget_url = "https://auth.widgetid.io/public/pkce.js"
auto_create_users = true
username_pattern = "[email]"
email_verification = false
redirect_after_login = ""
debug_mode = false
request_timeout_secs = 15
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = BridgeConfig::default();
        config.validate().unwrap();
        assert_eq!(config.settings.username_pattern, "[email]");
        assert!(config.settings.auto_create_users);
        assert_eq!(config.settings.request_timeout_secs, 15);
    }

    #[test]
    fn example_toml_parses() {
        let config: BridgeConfig = toml::from_str(&BridgeConfig::example_toml()).unwrap();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.settings.api_base_url, "https://api.widgetid.io");
    }

    #[test]
    fn legacy_client_id_backs_org_id() {
        let mut settings = ManagementSettings::default();
        settings.client_id = "org_legacy".to_string();
        assert_eq!(settings.effective_org_id(), "org_legacy");

        settings.org_id = "org_new".to_string();
        assert_eq!(settings.effective_org_id(), "org_new");
    }

    #[test]
    fn invalid_base_url_rejected() {
        let mut config = BridgeConfig::default();
        config.settings.api_base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }
}
