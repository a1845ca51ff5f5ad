//! Storage contract for users, logins, sessions, and remember-me's

pub mod memory;
pub mod models;

pub use memory::MemoryBackend;
pub use models::*;

use chrono::{DateTime, Utc};

use crate::error::StoreError;

/// Result type for backend operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Remember-me material passed alongside a new login session.
#[derive(Debug, Clone)]
pub struct RememberMeParams {
    pub selector: String,
    pub token_hash: String,
    pub renews_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Contract every persistence adapter must satisfy.
///
/// [`MemoryBackend`] is the reference semantics. Each operation is atomic:
/// uniqueness checks (email, verify hash, selector) and the writes they guard
/// happen under one linearizable step.
pub trait AuthBackend: Send + Sync {
    /// Look up the user by email (case-insensitive), then the login for the
    /// named provider.
    fn get_user_login(&self, email: &str, provider_name: &str) -> StoreResult<UserLogin>;

    /// Create a session for an existing login, optionally issuing or
    /// refreshing a remember-me. A selector already bound to a different
    /// login is rejected with [`StoreError::RememberMeSelectorExists`].
    fn new_login_session(
        &self,
        login_id: LoginId,
        session_id: &SessionId,
        renews_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        remember_me: Option<&RememberMeParams>,
    ) -> StoreResult<(UserLoginSession, Option<UserLoginRememberMe>)>;

    fn get_session(&self, session_id: &SessionId) -> StoreResult<UserLoginSession>;

    /// Move the session's soft deadline. An expired hard deadline is pushed
    /// out by the standard session lifetime so the renewed session is usable.
    fn renew_session(
        &self,
        session_id: &SessionId,
        renews_at: DateTime<Utc>,
    ) -> StoreResult<UserLoginSession>;

    fn get_remember_me(&self, selector: &str) -> StoreResult<UserLoginRememberMe>;

    /// Move the remember-me's soft deadline. Rejects expired records and
    /// deadlines in the past or beyond the hard expiry.
    fn renew_remember_me(
        &self,
        selector: &str,
        renews_at: DateTime<Utc>,
    ) -> StoreResult<UserLoginRememberMe>;

    /// Create a user, a default-provider login, and a half-auth session in
    /// one step. A taken email wins over a colliding verify hash.
    fn add_user(
        &self,
        email: &str,
        email_verify_hash: &str,
        session_id: &SessionId,
        renews_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<UserLoginSession>;

    /// Match a pending verify hash and upsert the half-auth session keyed by
    /// `session_id`, refreshing its times. Idempotent under retry with the
    /// same `session_id`. Returns the session and the user's email.
    fn verify_email(
        &self,
        email_verify_hash: &str,
        session_id: &SessionId,
        renews_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<(UserLoginSession, String)>;

    /// Update profile fields. A missing target is a no-op.
    fn update_user(
        &self,
        user_id: Option<UserId>,
        full_name: &str,
        organization: &str,
        picture_path: &str,
    ) -> StoreResult<()>;

    /// Set the login's password, clear the pending verify hash, mark the
    /// email verified, write the profile, and invalidate every session for
    /// this login except `session_id`, which is upserted as full-auth.
    #[allow(clippy::too_many_arguments)]
    fn create_profile_and_invalidate_sessions(
        &self,
        login_id: LoginId,
        password_hash: &str,
        full_name: &str,
        organization: &str,
        picture_path: &str,
        session_id: &SessionId,
        expires_at: DateTime<Utc>,
        renews_at: DateTime<Utc>,
    ) -> StoreResult<UserLoginSession>;

    /// Remove a session. Removing an absent session is not an error.
    fn invalidate_session(&self, session_id: &SessionId) -> StoreResult<()>;

    /// Remove a remember-me. Removing an absent record is not an error.
    fn invalidate_remember_me(&self, selector: &str) -> StoreResult<()>;
}
