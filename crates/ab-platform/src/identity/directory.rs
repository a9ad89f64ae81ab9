//! User Directory Boundary
//!
//! The host application's user store, reduced to the operations the
//! provisioning pipeline needs. Implementations must enforce uniqueness of
//! email and username at write time; the resolver relies on that constraint
//! as the authoritative race-breaker.

use async_trait::async_trait;

use crate::identity::entity::{LocalIdentity, NewIdentity};
use crate::shared::error::Result;

/// Host directory operations consumed by the pipeline.
///
/// `create` must fail with [`BridgeError::DuplicateIdentity`] when the email
/// or username is already taken, and with `IdentityPersistenceFailed` for
/// any other storage fault. `establish_session` must be idempotent and must
/// not fail for an identity that is already enabled.
///
/// [`BridgeError::DuplicateIdentity`]: crate::shared::error::BridgeError::DuplicateIdentity
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<LocalIdentity>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<LocalIdentity>>;

    async fn create(&self, identity: NewIdentity) -> Result<LocalIdentity>;

    /// Mark the identity as authenticated for the current request context.
    async fn establish_session(&self, uid: u64) -> Result<()>;
}
