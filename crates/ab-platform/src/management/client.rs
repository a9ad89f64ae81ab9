//! Management API Client
//!
//! Thin authenticated wrapper over the widget service's management API.
//! Every accessor funnels through [`ManagementApiClient::request`], which
//! attaches the Bearer key and collapses all failure modes to `None`;
//! callers only distinguish "got a document" from "did not".

use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info, warn};

use ab_config::ManagementSettings;

/// Authenticated client for the remote management API.
pub struct ManagementApiClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl ManagementApiClient {
    pub fn new(settings: &ManagementSettings) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            api_key: settings.api_key.clone(),
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Whether an API key is configured at all.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Perform an authenticated request against the management API.
    ///
    /// Returns the parsed response document on success. An empty response
    /// body (204-style deletes) is reported as `Some(Value::Null)` so that
    /// success stays distinguishable from failure. Missing key, transport
    /// errors, non-2xx statuses and unparseable bodies all yield `None`;
    /// the API key itself is never logged.
    pub async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Option<Value> {
        if !self.has_api_key() {
            error!(%method, path, "management API key is not configured");
            return None;
        }

        let url = format!("{}{}", self.base_url, path);
        let mut builder = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json");

        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                error!(%method, path, error = %err, "management API request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%method, path, status = %status, "management API returned error status");
            return None;
        }

        if status == StatusCode::NO_CONTENT {
            return Some(Value::Null);
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                error!(%method, path, error = %err, "failed to read management API response");
                return None;
            }
        };

        if text.is_empty() {
            return Some(Value::Null);
        }

        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(err) => {
                error!(%method, path, error = %err, "management API returned invalid JSON");
                None
            }
        }
    }

    // --- Organization ---

    /// Fetch the organization the API key belongs to.
    pub async fn get_organization(&self) -> Option<Value> {
        self.request(Method::GET, "/organizations/me", None).await
    }

    /// Connectivity check: the key is valid iff the organization resolves.
    pub async fn test_connection(&self) -> bool {
        let connected = self.get_organization().await.is_some();
        info!(connected, "management API connection test");
        connected
    }

    // --- Identity providers ---

    pub async fn get_providers(&self) -> Option<Value> {
        self.request(Method::GET, "/providers", None).await
    }

    pub async fn get_provider(&self, provider_id: &str) -> Option<Value> {
        self.request(Method::GET, &format!("/providers/{provider_id}"), None)
            .await
    }

    /// Create or update a provider configuration, keyed by provider type.
    pub async fn save_provider(&self, provider_type: &str, config: &Value) -> Option<Value> {
        self.request(
            Method::PUT,
            &format!("/providers/{provider_type}"),
            Some(config),
        )
        .await
    }

    pub async fn delete_provider(&self, provider_id: &str) -> bool {
        self.request(Method::DELETE, &format!("/providers/{provider_id}"), None)
            .await
            .is_some()
    }

    // --- Widget configuration ---

    pub async fn get_widget_config(&self) -> Option<Value> {
        self.request(Method::GET, "/widget/config", None).await
    }

    pub async fn update_widget_config(&self, config: &Value) -> Option<Value> {
        self.request(Method::PUT, "/widget/config", Some(config))
            .await
    }

    // --- Analytics ---

    /// Login analytics for a reporting period such as `7d`, `30d` or `90d`.
    pub async fn get_analytics(&self, period: Option<&str>) -> Option<Value> {
        let period = period.unwrap_or("30d");
        let path = format!("/analytics?period={}", urlencoding::encode(period));
        self.request(Method::GET, &path, None).await
    }

    // --- Email provider ---

    pub async fn get_email_provider(&self) -> Option<Value> {
        self.request(Method::GET, "/email/provider", None).await
    }

    pub async fn update_email_provider(&self, config: &Value) -> Option<Value> {
        self.request(Method::PUT, "/email/provider", Some(config))
            .await
    }

    // --- Webhooks ---

    pub async fn get_webhooks(&self) -> Option<Value> {
        self.request(Method::GET, "/webhooks", None).await
    }

    pub async fn create_webhook(&self, config: &Value) -> Option<Value> {
        self.request(Method::POST, "/webhooks", Some(config)).await
    }

    pub async fn update_webhook(&self, webhook_id: &str, config: &Value) -> Option<Value> {
        self.request(
            Method::PUT,
            &format!("/webhooks/{webhook_id}"),
            Some(config),
        )
        .await
    }

    pub async fn delete_webhook(&self, webhook_id: &str) -> bool {
        self.request(Method::DELETE, &format!("/webhooks/{webhook_id}"), None)
            .await
            .is_some()
    }

    // --- Redirect URIs ---

    pub async fn get_redirect_uris(&self) -> Option<Value> {
        self.request(Method::GET, "/redirect-uris", None).await
    }

    pub async fn add_redirect_uri(&self, uri: &str) -> Option<Value> {
        self.request(Method::POST, "/redirect-uris", Some(&json!({ "uri": uri })))
            .await
    }

    /// The remote API addresses redirect URIs by value, not id, so the
    /// delete carries the URI in a JSON body.
    pub async fn delete_redirect_uri(&self, uri: &str) -> bool {
        self.request(
            Method::DELETE,
            "/redirect-uris",
            Some(&json!({ "uri": uri })),
        )
        .await
        .is_some()
    }
}
