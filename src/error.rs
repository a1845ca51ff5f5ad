//! Error types for the session service

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Boxed source error carried by [`AuthError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Domain errors reported by an [`crate::store::AuthBackend`].
///
/// Adapters over other stores must map their failures onto these same kinds;
/// callers match on the variant, never on the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("user not found")]
    UserNotFound,

    #[error("user already exists")]
    UserAlreadyExists,

    #[error("login not found")]
    LoginNotFound,

    #[error("session not found")]
    SessionNotFound,

    #[error("session id belongs to a different login")]
    InvalidSessionId,

    #[error("remember-me not found")]
    RememberMeNotFound,

    #[error("remember-me has expired")]
    RememberMeExpired,

    #[error("remember-me selector is bound to a different login")]
    RememberMeSelectorExists,

    #[error("renewal time is out of bounds")]
    InvalidRenewsAtTime,

    #[error("email verify code already in use")]
    EmailVerifyCodeExists,

    #[error("invalid email verify code")]
    InvalidEmailVerifyCode,
}

/// Failures in the cryptographic utilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The OS random source refused to produce bytes.
    #[error("system random source unavailable")]
    CryptoUnavailable,

    #[error("base64 decode failed")]
    DecodeFailed,

    #[error("password hashing failed")]
    HashFailed,
}

/// Failures reading or writing sealed cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CookieError {
    #[error("cookie not present")]
    Absent,

    /// Present but failed authentication, decryption, or deserialization.
    #[error("cookie is corrupt")]
    Corrupt,
}

/// Presentation wrapper surfaced to the HTTP layer.
///
/// `Auth` messages are safe to show to the caller. `Logged` errors keep their
/// detail for the log and surface only a generic message.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{message}")]
    Auth {
        message: &'static str,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{message}")]
    Logged {
        message: &'static str,
        #[source]
        source: Option<BoxError>,
    },
}

impl AuthError {
    pub fn auth(message: &'static str) -> Self {
        AuthError::Auth {
            message,
            source: None,
        }
    }

    pub fn auth_from(message: &'static str, source: impl Into<BoxError>) -> Self {
        AuthError::Auth {
            message,
            source: Some(source.into()),
        }
    }

    pub fn logged(message: &'static str) -> Self {
        AuthError::Logged {
            message,
            source: None,
        }
    }

    pub fn logged_from(message: &'static str, source: impl Into<BoxError>) -> Self {
        AuthError::Logged {
            message,
            source: Some(source.into()),
        }
    }

    /// The message a caller is allowed to see.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::Auth { message, .. } => message,
            AuthError::Logged { .. } => "Unauthorized",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Logged { message, source } = &self {
            tracing::error!(detail = %message, source = ?source, "request denied");
        }
        let body = json!({ "success": false, "reason": self.public_message() });
        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}
