//! Identity API Endpoints
//!
//! Wire contract consumed by the browser-side widget:
//! - POST /identity/provision - exchange a widget login result for a local session
//! - GET /identity/widget-settings - bootstrap configuration for the widget script

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use ab_config::ManagementSettings;

use crate::identity::provision_service::ProvisionService;
use crate::shared::error::BridgeError;

/// Identity API state
#[derive(Clone)]
pub struct IdentityState {
    pub service: Arc<ProvisionService>,
    pub settings: Arc<ManagementSettings>,
    /// Externally reachable base URL of this host application
    pub public_base_url: String,
}

/// Successful provisioning response
#[derive(Debug, Serialize, ToSchema)]
pub struct ProvisionResponse {
    pub success: bool,
    pub uid: u64,
    pub username: String,
    pub email: String,
    /// Redirect target: "current", the home route, or a configured path
    pub redirect: String,
}

/// Bootstrap configuration for the browser widget
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSettingsResponse {
    pub org_id: String,
    pub redirect_uri: String,
    pub widget_url: String,
    pub debug_mode: bool,
}

/// Provision a local identity from a widget login result
///
/// Accepts the credential payload in any of its historical shapes (flat
/// snake_case, flat camelCase, or nested under `tokens`). On success the
/// identity is matched or created and a session is established.
#[utoipa::path(
    post,
    path = "/provision",
    tag = "identity",
    operation_id = "postIdentityProvision",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Login successful", body = ProvisionResponse),
        (status = 400, description = "Missing or invalid credential payload"),
        (status = 500, description = "Provisioning failed")
    )
)]
pub async fn provision(
    State(state): State<IdentityState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ProvisionResponse>, BridgeError> {
    let Json(payload) = payload.map_err(|_| BridgeError::validation("No data received"))?;
    if payload.is_null() {
        return Err(BridgeError::validation("No data received"));
    }

    let result = state.service.provision(&payload, &state.settings).await?;

    Ok(Json(ProvisionResponse {
        success: true,
        uid: result.uid,
        username: result.username,
        email: result.email,
        redirect: result.redirect,
    }))
}

/// Widget bootstrap settings
///
/// Served to the callback page so the browser can initialize the widget
/// script with the organization id and callback URI.
#[utoipa::path(
    get,
    path = "/widget-settings",
    tag = "identity",
    operation_id = "getIdentityWidgetSettings",
    responses(
        (status = 200, description = "Widget bootstrap settings", body = WidgetSettingsResponse),
        (status = 500, description = "Organization id not configured")
    )
)]
pub async fn widget_settings(
    State(state): State<IdentityState>,
) -> Result<Json<WidgetSettingsResponse>, BridgeError> {
    let org_id = state.settings.effective_org_id();
    if org_id.is_empty() {
        return Err(BridgeError::configuration(
            "organization id is not configured",
        ));
    }

    Ok(Json(WidgetSettingsResponse {
        org_id: org_id.to_string(),
        redirect_uri: format!("{}/identity/callback", state.public_base_url),
        widget_url: state.settings.widget_url.clone(),
        debug_mode: state.settings.debug_mode,
    }))
}

pub fn identity_router(state: IdentityState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(provision))
        .routes(routes!(widget_settings))
        .with_state(state)
}
