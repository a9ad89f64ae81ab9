//! Management Aggregate
//!
//! Authenticated proxy over the remote widget service's management API:
//! organization lookup, provider configuration, widget settings, analytics,
//! email provider, webhooks and redirect URIs.

pub mod api;
pub mod client;

// Re-export main types
pub use api::{admin_router, AdminState, ConnectionStatus};
pub use client::ManagementApiClient;
