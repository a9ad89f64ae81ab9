//! Management API Endpoints
//!
//! Admin-facing proxy over the remote management API. Handlers stay thin:
//! check the key is configured, forward through the client, and translate
//! an absent result into a gateway error.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::management::client::ManagementApiClient;
use crate::shared::error::{BridgeError, Result};

/// Management API state
#[derive(Clone)]
pub struct AdminState {
    pub client: Arc<ManagementApiClient>,
}

/// Result of the connectivity check
#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectionStatus {
    pub connected: bool,
}

/// Analytics query parameters
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyticsQuery {
    /// Reporting period, e.g. `7d`, `30d`, `90d`
    pub period: Option<String>,
}

/// Redirect URI payload; the remote API addresses these by value.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RedirectUriRequest {
    pub uri: String,
}

fn require_key(state: &AdminState) -> Result<()> {
    if state.client.has_api_key() {
        Ok(())
    } else {
        Err(BridgeError::ApiKeyMissing)
    }
}

fn proxied(result: Option<Value>, method: &str, path: &str) -> Result<Json<Value>> {
    result
        .map(Json)
        .ok_or_else(|| BridgeError::remote(method, path))
}

fn proxied_delete(deleted: bool, path: &str) -> Result<StatusCode> {
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(BridgeError::remote("DELETE", path))
    }
}

// --- Organization ---

/// Organization owning the configured API key
#[utoipa::path(
    get,
    path = "/organization",
    tag = "management",
    operation_id = "getOrganization",
    responses(
        (status = 200, description = "Organization details"),
        (status = 500, description = "API key not configured"),
        (status = 502, description = "Remote API error")
    )
)]
pub async fn get_organization(State(state): State<AdminState>) -> Result<Json<Value>> {
    require_key(&state)?;
    proxied(
        state.client.get_organization().await,
        "GET",
        "/organizations/me",
    )
}

/// Management API connectivity check
#[utoipa::path(
    get,
    path = "/connection",
    tag = "management",
    operation_id = "getConnectionStatus",
    responses(
        (status = 200, description = "Connection status", body = ConnectionStatus)
    )
)]
pub async fn get_connection(State(state): State<AdminState>) -> Json<ConnectionStatus> {
    Json(ConnectionStatus {
        connected: state.client.test_connection().await,
    })
}

// --- Identity providers ---

/// List configured identity providers
#[utoipa::path(
    get,
    path = "/providers",
    tag = "management",
    operation_id = "getProviders",
    responses(
        (status = 200, description = "Provider list"),
        (status = 502, description = "Remote API error")
    )
)]
pub async fn get_providers(State(state): State<AdminState>) -> Result<Json<Value>> {
    require_key(&state)?;
    proxied(state.client.get_providers().await, "GET", "/providers")
}

/// Fetch a single identity provider
#[utoipa::path(
    get,
    path = "/providers/{id}",
    tag = "management",
    operation_id = "getProvider",
    params(("id" = String, Path, description = "Provider id")),
    responses(
        (status = 200, description = "Provider details"),
        (status = 502, description = "Remote API error")
    )
)]
pub async fn get_provider(
    State(state): State<AdminState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    require_key(&state)?;
    let path = format!("/providers/{id}");
    proxied(state.client.get_provider(&id).await, "GET", &path)
}

/// Create or update a provider configuration, keyed by provider type
#[utoipa::path(
    put,
    path = "/providers/{id}",
    tag = "management",
    operation_id = "saveProvider",
    params(("id" = String, Path, description = "Provider type, e.g. google")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Saved provider"),
        (status = 502, description = "Remote API error")
    )
)]
pub async fn save_provider(
    State(state): State<AdminState>,
    Path(provider_type): Path<String>,
    Json(config): Json<Value>,
) -> Result<Json<Value>> {
    require_key(&state)?;
    let path = format!("/providers/{provider_type}");
    proxied(
        state.client.save_provider(&provider_type, &config).await,
        "PUT",
        &path,
    )
}

/// Delete an identity provider
#[utoipa::path(
    delete,
    path = "/providers/{id}",
    tag = "management",
    operation_id = "deleteProvider",
    params(("id" = String, Path, description = "Provider id")),
    responses(
        (status = 204, description = "Provider deleted"),
        (status = 502, description = "Remote API error")
    )
)]
pub async fn delete_provider(
    State(state): State<AdminState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    require_key(&state)?;
    let path = format!("/providers/{id}");
    proxied_delete(state.client.delete_provider(&id).await, &path)
}

// --- Widget configuration ---

/// Fetch the hosted widget configuration
#[utoipa::path(
    get,
    path = "/widget/config",
    tag = "management",
    operation_id = "getWidgetConfig",
    responses(
        (status = 200, description = "Widget configuration"),
        (status = 502, description = "Remote API error")
    )
)]
pub async fn get_widget_config(State(state): State<AdminState>) -> Result<Json<Value>> {
    require_key(&state)?;
    proxied(
        state.client.get_widget_config().await,
        "GET",
        "/widget/config",
    )
}

/// Update the hosted widget configuration
#[utoipa::path(
    put,
    path = "/widget/config",
    tag = "management",
    operation_id = "updateWidgetConfig",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Updated widget configuration"),
        (status = 502, description = "Remote API error")
    )
)]
pub async fn update_widget_config(
    State(state): State<AdminState>,
    Json(config): Json<Value>,
) -> Result<Json<Value>> {
    require_key(&state)?;
    proxied(
        state.client.update_widget_config(&config).await,
        "PUT",
        "/widget/config",
    )
}

// --- Analytics ---

/// Login analytics for a reporting period
#[utoipa::path(
    get,
    path = "/analytics",
    tag = "management",
    operation_id = "getAnalytics",
    params(("period" = Option<String>, Query, description = "Reporting period, default 30d")),
    responses(
        (status = 200, description = "Analytics data"),
        (status = 502, description = "Remote API error")
    )
)]
pub async fn get_analytics(
    State(state): State<AdminState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Value>> {
    require_key(&state)?;
    proxied(
        state.client.get_analytics(query.period.as_deref()).await,
        "GET",
        "/analytics",
    )
}

// --- Email provider ---

/// Fetch the transactional email provider configuration
#[utoipa::path(
    get,
    path = "/email/provider",
    tag = "management",
    operation_id = "getEmailProvider",
    responses(
        (status = 200, description = "Email provider configuration"),
        (status = 502, description = "Remote API error")
    )
)]
pub async fn get_email_provider(State(state): State<AdminState>) -> Result<Json<Value>> {
    require_key(&state)?;
    proxied(
        state.client.get_email_provider().await,
        "GET",
        "/email/provider",
    )
}

/// Update the transactional email provider configuration
#[utoipa::path(
    put,
    path = "/email/provider",
    tag = "management",
    operation_id = "updateEmailProvider",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Updated email provider configuration"),
        (status = 502, description = "Remote API error")
    )
)]
pub async fn update_email_provider(
    State(state): State<AdminState>,
    Json(config): Json<Value>,
) -> Result<Json<Value>> {
    require_key(&state)?;
    proxied(
        state.client.update_email_provider(&config).await,
        "PUT",
        "/email/provider",
    )
}

// --- Webhooks ---

/// List configured webhooks
#[utoipa::path(
    get,
    path = "/webhooks",
    tag = "management",
    operation_id = "getWebhooks",
    responses(
        (status = 200, description = "Webhook list"),
        (status = 502, description = "Remote API error")
    )
)]
pub async fn get_webhooks(State(state): State<AdminState>) -> Result<Json<Value>> {
    require_key(&state)?;
    proxied(state.client.get_webhooks().await, "GET", "/webhooks")
}

/// Register a webhook
#[utoipa::path(
    post,
    path = "/webhooks",
    tag = "management",
    operation_id = "createWebhook",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Created webhook"),
        (status = 502, description = "Remote API error")
    )
)]
pub async fn create_webhook(
    State(state): State<AdminState>,
    Json(config): Json<Value>,
) -> Result<Json<Value>> {
    require_key(&state)?;
    proxied(
        state.client.create_webhook(&config).await,
        "POST",
        "/webhooks",
    )
}

/// Update a webhook
#[utoipa::path(
    put,
    path = "/webhooks/{id}",
    tag = "management",
    operation_id = "updateWebhook",
    params(("id" = String, Path, description = "Webhook id")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Updated webhook"),
        (status = 502, description = "Remote API error")
    )
)]
pub async fn update_webhook(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    Json(config): Json<Value>,
) -> Result<Json<Value>> {
    require_key(&state)?;
    let path = format!("/webhooks/{id}");
    proxied(
        state.client.update_webhook(&id, &config).await,
        "PUT",
        &path,
    )
}

/// Delete a webhook
#[utoipa::path(
    delete,
    path = "/webhooks/{id}",
    tag = "management",
    operation_id = "deleteWebhook",
    params(("id" = String, Path, description = "Webhook id")),
    responses(
        (status = 204, description = "Webhook deleted"),
        (status = 502, description = "Remote API error")
    )
)]
pub async fn delete_webhook(
    State(state): State<AdminState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    require_key(&state)?;
    let path = format!("/webhooks/{id}");
    proxied_delete(state.client.delete_webhook(&id).await, &path)
}

// --- Redirect URIs ---

/// List registered redirect URIs
#[utoipa::path(
    get,
    path = "/redirect-uris",
    tag = "management",
    operation_id = "getRedirectUris",
    responses(
        (status = 200, description = "Redirect URI list"),
        (status = 502, description = "Remote API error")
    )
)]
pub async fn get_redirect_uris(State(state): State<AdminState>) -> Result<Json<Value>> {
    require_key(&state)?;
    proxied(
        state.client.get_redirect_uris().await,
        "GET",
        "/redirect-uris",
    )
}

/// Register a redirect URI
#[utoipa::path(
    post,
    path = "/redirect-uris",
    tag = "management",
    operation_id = "addRedirectUri",
    request_body = RedirectUriRequest,
    responses(
        (status = 200, description = "Registered redirect URI"),
        (status = 502, description = "Remote API error")
    )
)]
pub async fn add_redirect_uri(
    State(state): State<AdminState>,
    Json(request): Json<RedirectUriRequest>,
) -> Result<Json<Value>> {
    require_key(&state)?;
    proxied(
        state.client.add_redirect_uri(&request.uri).await,
        "POST",
        "/redirect-uris",
    )
}

/// Remove a redirect URI
#[utoipa::path(
    delete,
    path = "/redirect-uris",
    tag = "management",
    operation_id = "deleteRedirectUri",
    request_body = RedirectUriRequest,
    responses(
        (status = 204, description = "Redirect URI removed"),
        (status = 502, description = "Remote API error")
    )
)]
pub async fn delete_redirect_uri(
    State(state): State<AdminState>,
    Json(request): Json<RedirectUriRequest>,
) -> Result<StatusCode> {
    require_key(&state)?;
    proxied_delete(
        state.client.delete_redirect_uri(&request.uri).await,
        "/redirect-uris",
    )
}

pub fn admin_router(state: AdminState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(get_organization))
        .routes(routes!(get_connection))
        .routes(routes!(get_providers))
        .routes(routes!(get_provider, save_provider, delete_provider))
        .routes(routes!(get_widget_config, update_widget_config))
        .routes(routes!(get_analytics))
        .routes(routes!(get_email_provider, update_email_provider))
        .routes(routes!(get_webhooks, create_webhook))
        .routes(routes!(update_webhook, delete_webhook))
        .routes(routes!(
            get_redirect_uris,
            add_redirect_uri,
            delete_redirect_uri
        ))
        .with_state(state)
}
