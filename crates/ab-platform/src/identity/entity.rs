//! Local Identity Entity
//!
//! The host application's persisted user record, as seen through the
//! directory boundary. Created once by the resolver; never mutated by this
//! core on subsequent logins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted user record owned by the host directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalIdentity {
    /// Directory-issued numeric id
    pub uid: u64,

    /// Local username (unique)
    pub username: String,

    /// Email address (unique)
    pub email: String,

    /// Account enabled flag
    pub enabled: bool,

    /// Provenance marker; set to the email the account was created with
    pub init: String,

    /// Set at creation when the provider-verified email is accepted as
    /// sufficient proof, skipping local verification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,

    /// Roles beyond the implicit "authenticated" baseline
    #[serde(default)]
    pub roles: Vec<String>,

    pub created_at: DateTime<Utc>,
}

/// Fields for a to-be-created identity. The directory assigns the uid.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub username: String,
    pub email: String,
    pub enabled: bool,
    pub init: String,
    pub verified_at: Option<DateTime<Utc>>,
    pub roles: Vec<String>,
}

impl NewIdentity {
    /// An enabled identity with provenance set to its email.
    pub fn enabled(username: impl Into<String>, email: impl Into<String>) -> Self {
        let email = email.into();
        Self {
            username: username.into(),
            email: email.clone(),
            enabled: true,
            init: email,
            verified_at: None,
            roles: Vec::new(),
        }
    }
}
