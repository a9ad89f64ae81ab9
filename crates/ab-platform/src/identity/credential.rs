//! Credential Bundle Normalization and Validation
//!
//! The hosted widget has shipped at least three payload shapes over time:
//! flat snake_case, flat camelCase, and tokens nested under a `tokens`
//! object. Normalization reconciles all of them into one structure without
//! ever failing; validation then rejects incomplete bundles before any side
//! effect occurs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shared::error::{BridgeError, Result};

/// Profile fields reported by the OAuth provider. Unknown fields are
/// retained verbatim in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    /// Display name fallback chain: name, then given_name, then email.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.given_name.as_deref())
            .or(self.email.as_deref())
    }
}

/// Normalized set of tokens and profile fields produced after a remote
/// login. May be incomplete; [`CredentialBundle::validate`] decides.
#[derive(Debug, Clone, Default)]
pub struct CredentialBundle {
    pub id_token: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub provider: String,
    pub profile: Option<Profile>,
}

/// A bundle that passed validation; only this type reaches the resolver.
#[derive(Debug, Clone)]
pub struct ValidCredential {
    pub id_token: String,
    pub email: String,
    pub display_name: String,
    pub provider: String,
    pub profile: Profile,
}

/// Read a string field accepting a snake_case and a camelCase key variant.
/// Non-string and null values count as absent.
fn string_field(obj: &Map<String, Value>, snake: &str, camel: &str) -> Option<String> {
    obj.get(snake)
        .or_else(|| obj.get(camel))
        .and_then(Value::as_str)
        .map(str::to_string)
}

impl CredentialBundle {
    /// Normalize an arbitrary widget payload. Total: malformed input yields
    /// an incomplete bundle for the validator to reject.
    pub fn from_widget_payload(payload: &Value) -> Self {
        let Some(top) = payload.as_object() else {
            return Self {
                provider: "unknown".to_string(),
                ..Self::default()
            };
        };

        // Tokens may live under a nested `tokens` object; each field falls
        // back to the top level independently.
        let nested = top.get("tokens").and_then(Value::as_object);
        let token = |snake: &str, camel: &str| {
            nested
                .and_then(|t| string_field(t, snake, camel))
                .or_else(|| string_field(top, snake, camel))
        };

        // The profile is read from the top level only, never from inside
        // `tokens`.
        let profile = top
            .get("user")
            .or_else(|| top.get("profile"))
            .and_then(|user| serde_json::from_value::<Profile>(user.clone()).ok());

        let provider = top
            .get("provider")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();

        Self {
            id_token: token("id_token", "idToken"),
            access_token: token("access_token", "accessToken"),
            refresh_token: token("refresh_token", "refreshToken"),
            provider,
            profile,
        }
    }

    /// Enforce presence invariants. ID token is checked before profile, so
    /// a payload missing both reports `MissingIdToken`.
    pub fn validate(&self) -> Result<ValidCredential> {
        let id_token = match self.id_token.as_deref() {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => return Err(BridgeError::MissingIdToken),
        };

        let profile = self.profile.as_ref().ok_or(BridgeError::MissingUserData)?;
        let email = match profile.email.as_deref() {
            Some(email) if !email.is_empty() => email.to_string(),
            _ => return Err(BridgeError::MissingUserData),
        };

        let display_name = profile
            .display_name()
            .unwrap_or(&email)
            .to_string();

        Ok(ValidCredential {
            id_token,
            email,
            display_name,
            provider: self.provider.clone(),
            profile: profile.clone(),
        })
    }
}
