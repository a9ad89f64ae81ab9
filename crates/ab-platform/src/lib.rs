//! AuthBridge Platform
//!
//! Core platform bridging a hosted login widget to a host application:
//! - Credential normalization and validation for widget login payloads
//! - Identity matching and policy-driven creation in the host directory
//! - Session establishment and post-login redirect resolution
//! - Authenticated proxy over the widget service's management API
//!
//! ## Module Organization (Aggregate-based)
//!
//! Each aggregate contains:
//! - `entity` / domain types
//! - service logic
//! - `api` - REST endpoints

// Core aggregates
pub mod identity;
pub mod management;

// Shared infrastructure
pub mod shared;

// Re-export common types from shared
pub use shared::error::{BridgeError, Result};

// Re-export main types for convenience
pub use identity::{
    CredentialBundle, InMemoryDirectory, LocalIdentity, NewIdentity, ProvisionService,
    SessionResult, UserDirectory, ValidCredential,
};
pub use management::ManagementApiClient;
