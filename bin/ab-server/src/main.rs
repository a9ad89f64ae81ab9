//! AuthBridge Server
//!
//! Production server bridging a hosted login widget to a host application:
//! - Identity APIs: widget login provisioning and widget bootstrap settings
//! - Admin APIs: authenticated proxy over the remote management API
//! - Health endpoint and Swagger UI
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AUTHBRIDGE_CONFIG` | - | Path to a TOML config file |
//! | `AB_HTTP_PORT` | `8080` | HTTP API port |
//! | `AB_HTTP_HOST` | `0.0.0.0` | Bind address |
//! | `AB_PUBLIC_BASE_URL` | `http://localhost:8080` | Externally reachable base URL |
//! | `AB_API_KEY` | - | Management API key (Bearer token) |
//! | `AB_API_BASE_URL` | `https://api.widgetid.io` | Management API base URL |
//! | `AB_ORG_ID` | - | Organization id at the widget service |
//! | `AB_WIDGET_URL` | pkce.js URL | Browser widget script URL |
//! | `AB_AUTO_CREATE_USERS` | `true` | Create identities on first login |
//! | `AB_USERNAME_PATTERN` | `[email]` | Username derivation pattern |
//! | `AB_DEFAULT_ROLE` | - | Role attached to new identities |
//! | `AB_EMAIL_VERIFICATION` | `false` | Mark new identities verified |
//! | `AB_REDIRECT_AFTER_LOGIN` | - | Post-login redirect target |
//! | `AB_REQUEST_TIMEOUT_SECS` | `15` | Outbound request timeout |
//! | `AB_DEBUG_MODE` | `false` | Verbose provisioning logs |
//! | `RUST_LOG` | `info` | Log level |
//! | `LOG_FORMAT` | `text` | `json` for structured output |

use std::sync::Arc;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use ab_config::BridgeConfig;
use ab_platform::identity::{identity_router, IdentityState, InMemoryDirectory, ProvisionService};
use ab_platform::management::{admin_router, AdminState, ManagementApiClient};

#[tokio::main]
async fn main() -> Result<()> {
    ab_common::logging::init_logging("ab-server");

    info!("Starting AuthBridge Server");

    let config = BridgeConfig::load()?;
    let settings = Arc::new(config.settings.clone());

    if settings.api_key.is_empty() {
        tracing::warn!("AB_API_KEY is not set; admin APIs will be unavailable");
    }

    // Host directory and provisioning pipeline
    let directory = Arc::new(InMemoryDirectory::new());
    let provision_service = Arc::new(ProvisionService::new(directory));

    // Management API client
    let management_client = Arc::new(ManagementApiClient::new(&settings));

    let identity_state = IdentityState {
        service: provision_service,
        settings: settings.clone(),
        public_base_url: config.http.public_base_url.clone(),
    };
    let admin_state = AdminState {
        client: management_client,
    };

    let (router, mut openapi) = OpenApiRouter::new()
        .nest("/identity", identity_router(identity_state))
        .nest("/admin", admin_router(admin_state))
        .split_for_parts();

    openapi.info.title = "AuthBridge API".to_string();
    openapi.info.version = env!("CARGO_PKG_VERSION").to_string();
    openapi.info.description =
        Some("Widget login bridge and management API proxy".to_string());

    let app = Router::new()
        .merge(router)
        .route("/health", get(health_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/q/openapi", openapi))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = format!("{}:{}", config.http.host, config.http.port);
    info!("API server listening on http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("server error: {}", e);
        }
    });

    info!("AuthBridge Server started");
    info!("Press Ctrl+C to shutdown");

    shutdown_signal().await;
    info!("Shutdown signal received...");

    server.abort();

    info!("AuthBridge Server shutdown complete");
    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
