//! Proxy admission endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_cookies::Cookies;

use crate::email::Mailer;
use crate::error::AuthError;
use crate::state::AppState;
use crate::store::{AuthBackend, LoginId, UserId, UserLoginSession};

/// The authoritative session record the proxy admits a request on.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub success: bool,
    pub user_id: UserId,
    pub login_id: LoginId,
    pub is_half_auth: bool,
    pub renews_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<UserLoginSession> for SessionResponse {
    fn from(session: UserLoginSession) -> Self {
        Self {
            success: true,
            user_id: session.user_id,
            login_id: session.login_id,
            is_half_auth: session.is_half_auth,
            renews_at: session.renews_at,
            expires_at: session.expires_at,
        }
    }
}

/// GET /auth
pub async fn check_auth<B, M>(
    State(state): State<Arc<AppState<B, M>>>,
    cookies: Cookies,
) -> Result<Json<SessionResponse>, AuthError>
where
    B: AuthBackend,
    M: Mailer,
{
    let session = state.session_manager(&cookies).get_session()?;
    Ok(Json(session.into()))
}

/// GET /auth/basic
pub async fn check_basic_auth<B, M>(
    State(state): State<Arc<AppState<B, M>>>,
    headers: HeaderMap,
    cookies: Cookies,
) -> Result<Json<SessionResponse>, AuthError>
where
    B: AuthBackend,
    M: Mailer,
{
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let session = state
        .session_manager(&cookies)
        .get_basic_auth(authorization)?;
    Ok(Json(session.into()))
}
