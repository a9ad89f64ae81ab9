//! Bridge Error Types
//!
//! Every failure carries a stable machine-readable code alongside the
//! human-readable message; clients branch on the code, never on the text.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Missing ID token in authentication payload")]
    MissingIdToken,

    #[error("Missing user data or email")]
    MissingUserData,

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("User does not exist and auto-creation is disabled")]
    UserCreationDisabled,

    #[error("Failed to persist identity: {message}")]
    IdentityPersistenceFailed { message: String },

    #[error("Duplicate identity: {field} already exists")]
    DuplicateIdentity { field: String },

    #[error("Management API key not configured")]
    ApiKeyMissing,

    #[error("Management API request failed: {method} {path}")]
    RemoteApi { method: String, path: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BridgeError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::IdentityPersistenceFailed { message: message.into() }
    }

    pub fn duplicate(field: impl Into<String>) -> Self {
        Self::DuplicateIdentity { field: field.into() }
    }

    pub fn remote(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self::RemoteApi {
            method: method.into(),
            path: path.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    /// Stable error code; part of the wire contract.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingIdToken => "MISSING_ID_TOKEN",
            Self::MissingUserData => "MISSING_USER_DATA",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::UserCreationDisabled => "USER_CREATION_DISABLED",
            Self::IdentityPersistenceFailed { .. } => "IDENTITY_PERSISTENCE_FAILED",
            Self::DuplicateIdentity { .. } => "DUPLICATE_IDENTITY",
            Self::ApiKeyMissing => "API_KEY_MISSING",
            Self::RemoteApi { .. } => "REMOTE_API_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::MissingIdToken | Self::MissingUserData | Self::Validation { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::DuplicateIdentity { .. } => StatusCode::CONFLICT,
            Self::RemoteApi { .. } => StatusCode::BAD_GATEWAY,
            Self::UserCreationDisabled
            | Self::IdentityPersistenceFailed { .. }
            | Self::ApiKeyMissing
            | Self::Configuration { .. }
            | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Error response body
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    /// Stable error code
    pub error: String,
    /// Human-readable description; not a contract
    pub message: String,
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        }

        let body = ErrorResponse {
            success: false,
            error: self.code().to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(BridgeError::MissingIdToken.code(), "MISSING_ID_TOKEN");
        assert_eq!(BridgeError::MissingUserData.code(), "MISSING_USER_DATA");
        assert_eq!(
            BridgeError::UserCreationDisabled.code(),
            "USER_CREATION_DISABLED"
        );
        assert_eq!(
            BridgeError::remote("GET", "/providers").code(),
            "REMOTE_API_ERROR"
        );
    }

    #[test]
    fn payload_errors_are_client_errors() {
        assert_eq!(BridgeError::MissingIdToken.status(), StatusCode::BAD_REQUEST);
        assert_eq!(BridgeError::MissingUserData.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            BridgeError::UserCreationDisabled.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            BridgeError::remote("GET", "/providers").status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
