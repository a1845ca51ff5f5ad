//! Data models for the auth backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

/// Unique login identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoginId(pub u64);

/// Opaque session identifier (URL-safe random, 256 bits at issue)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// The one provider the core implements. The registry reserves room for
/// federated providers but nothing exercises that path.
pub const LOGIN_PROVIDER_DEFAULT_NAME: &str = "password";

#[derive(Debug, Clone)]
pub struct LoginProvider {
    pub provider_id: u64,
    pub name: String,
}

/// A user account.
///
/// `email_verify_hash` is present while verification is pending and cleared
/// when the profile is created.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub primary_email: String,
    pub email_verify_hash: Option<String>,
    pub is_email_verified: bool,
    pub full_name: Option<String>,
    pub organization: Option<String>,
    pub picture_path: Option<String>,
}

/// A credential binding a user to a provider. For the default provider,
/// `provider_key` holds the password hash as an opaque URL-safe string
/// (empty until a password is set).
#[derive(Debug, Clone, PartialEq)]
pub struct UserLogin {
    pub login_id: LoginId,
    pub user_id: UserId,
    pub provider_id: u64,
    pub provider_key: String,
}

/// A live login session. `is_half_auth` stays true until the profile is
/// created, which is when the email is considered fully verified.
#[derive(Debug, Clone, PartialEq)]
pub struct UserLoginSession {
    pub session_id: SessionId,
    pub login_id: LoginId,
    pub user_id: UserId,
    pub renews_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_half_auth: bool,
}

/// A remember-me record. Only the token's SHA-256 is stored; the raw token
/// lives in the client's cookie.
#[derive(Debug, Clone, PartialEq)]
pub struct UserLoginRememberMe {
    pub selector: String,
    pub login_id: LoginId,
    pub token_hash: String,
    pub renews_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
