//! Identity Provisioning Service
//!
//! Maps a validated credential bundle to a local identity, creating one when
//! policy allows, then establishes the session and computes the post-login
//! redirect.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use ab_config::ManagementSettings;

use crate::identity::credential::{CredentialBundle, ValidCredential};
use crate::identity::directory::UserDirectory;
use crate::identity::entity::{LocalIdentity, NewIdentity};
use crate::identity::username::allocate_username;
use crate::shared::error::{BridgeError, Result};

/// Role implicitly held by every signed-in user; never attached explicitly.
const BASELINE_ROLE: &str = "authenticated";

/// Redirect sentinel telling the caller to keep the current page.
const REDIRECT_CURRENT: &str = "current";

/// Application home route, the target of the `<front>` setting.
const HOME_ROUTE: &str = "/";

/// Externally observable result of a successful login.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionResult {
    pub uid: u64,
    pub username: String,
    pub email: String,
    pub redirect: String,
}

/// Provisioning pipeline over the host directory boundary.
pub struct ProvisionService {
    directory: Arc<dyn UserDirectory>,
}

impl ProvisionService {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// Full pipeline: normalize, validate, resolve, finalize.
    pub async fn provision(
        &self,
        payload: &Value,
        settings: &ManagementSettings,
    ) -> Result<SessionResult> {
        let bundle = CredentialBundle::from_widget_payload(payload);
        let credential = bundle.validate()?;

        if settings.debug_mode {
            debug!(
                email = %credential.email,
                provider = %credential.provider,
                "credential bundle accepted"
            );
        }

        let identity = self.resolve(&credential, settings).await?;
        self.finalize(&identity, settings).await
    }

    /// Find the identity for the credential's email, creating it when
    /// auto-creation is enabled. An existing identity is returned unchanged;
    /// a later login never mutates profile data.
    pub async fn resolve(
        &self,
        credential: &ValidCredential,
        settings: &ManagementSettings,
    ) -> Result<LocalIdentity> {
        if let Some(existing) = self.directory.find_by_email(&credential.email).await? {
            if settings.debug_mode {
                debug!(
                    username = %existing.username,
                    email = %credential.email,
                    "existing identity matched"
                );
            }
            return Ok(existing);
        }

        if !settings.auto_create_users {
            return Err(BridgeError::UserCreationDisabled);
        }

        match self.create_once(credential, settings).await {
            Ok(created) => Ok(created),
            Err(BridgeError::DuplicateIdentity { field }) => {
                // Lost the check-then-create race; the directory's
                // uniqueness constraint is authoritative. Re-run the email
                // lookup once and return the winner's record.
                warn!(
                    email = %credential.email,
                    field = %field,
                    "identity created concurrently, retrying"
                );
                if let Some(existing) = self.directory.find_by_email(&credential.email).await? {
                    return Ok(existing);
                }

                // A different email took the derived username; the second
                // allocation sees the committed record and probes past it.
                self.create_once(credential, settings)
                    .await
                    .map_err(|err| match err {
                        BridgeError::DuplicateIdentity { field } => BridgeError::persistence(
                            format!("duplicate {field} persisted after username reallocation"),
                        ),
                        other => other,
                    })
            }
            Err(err) => Err(err),
        }
    }

    /// Allocate a username, build the record per policy, and create it.
    async fn create_once(
        &self,
        credential: &ValidCredential,
        settings: &ManagementSettings,
    ) -> Result<LocalIdentity> {
        let username = allocate_username(
            self.directory.as_ref(),
            &settings.username_pattern,
            &credential.email,
            &credential.display_name,
        )
        .await?;

        let mut identity = NewIdentity::enabled(username, credential.email.clone());

        if settings.email_verification {
            // The provider already verified the email address.
            identity.verified_at = Some(chrono::Utc::now());
        }

        if let Some(role) = settings.default_role.as_deref() {
            if !role.is_empty() && role != BASELINE_ROLE {
                identity.roles.push(role.to_string());
            }
        }

        let created = self.directory.create(identity).await?;
        info!(
            uid = created.uid,
            username = %created.username,
            email = %created.email,
            provider = %credential.provider,
            "new identity created"
        );
        Ok(created)
    }

    /// Establish the session and compute the redirect target.
    pub async fn finalize(
        &self,
        identity: &LocalIdentity,
        settings: &ManagementSettings,
    ) -> Result<SessionResult> {
        self.directory.establish_session(identity.uid).await?;

        Ok(SessionResult {
            uid: identity.uid,
            username: identity.username.clone(),
            email: identity.email.clone(),
            redirect: resolve_redirect(settings),
        })
    }
}

/// Post-login redirect: empty keeps the current page, `<front>` is the home
/// route, anything else is used verbatim.
pub fn resolve_redirect(settings: &ManagementSettings) -> String {
    let redirect = settings.redirect_after_login.as_str();

    if redirect.is_empty() {
        return REDIRECT_CURRENT.to_string();
    }

    if redirect == "<front>" {
        return HOME_ROUTE.to_string();
    }

    redirect.to_string()
}
