//! Identity Aggregate
//!
//! The provisioning pipeline: credential normalization and validation,
//! identity resolution against the host directory, username allocation,
//! and session finalization.

pub mod api;
pub mod credential;
pub mod directory;
pub mod entity;
pub mod memory;
pub mod provision_service;
pub mod username;

// Re-export main types
pub use api::{identity_router, IdentityState};
pub use credential::{CredentialBundle, Profile, ValidCredential};
pub use directory::UserDirectory;
pub use entity::{LocalIdentity, NewIdentity};
pub use memory::InMemoryDirectory;
pub use provision_service::{ProvisionService, SessionResult};
pub use username::allocate_username;
