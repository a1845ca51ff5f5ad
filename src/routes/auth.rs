//! Login and logout endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;

use super::session::SessionResponse;
use crate::email::Mailer;
use crate::error::AuthError;
use crate::state::AppState;
use crate::store::AuthBackend;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// POST /login
pub async fn login<B, M>(
    State(state): State<Arc<AppState<B, M>>>,
    cookies: Cookies,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AuthError>
where
    B: AuthBackend,
    M: Mailer,
{
    let session = state
        .session_manager(&cookies)
        .login(&req.email, &req.password, req.remember_me)?;
    Ok(Json(session.into()))
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// POST /logout
pub async fn logout<B, M>(
    State(state): State<Arc<AppState<B, M>>>,
    cookies: Cookies,
) -> Result<Json<LogoutResponse>, AuthError>
where
    B: AuthBackend,
    M: Mailer,
{
    state.session_manager(&cookies).logout()?;
    Ok(Json(LogoutResponse { success: true }))
}
