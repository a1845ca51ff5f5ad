//! Registration and email-verification endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;

use crate::email::Mailer;
use crate::error::AuthError;
use crate::state::AppState;
use crate::store::AuthBackend;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub success: bool,
}

/// POST /register
pub async fn register<B, M>(
    State(state): State<Arc<AppState<B, M>>>,
    headers: HeaderMap,
    cookies: Cookies,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AuthError>
where
    B: AuthBackend,
    M: Mailer,
{
    let referer = headers.get(header::REFERER).and_then(|v| v.to_str().ok());
    state.session_manager(&cookies).register(&req.email, referer)?;
    Ok(Json(RegisterResponse { success: true }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailRequest {
    pub email_verification_code: String,
}

#[derive(Serialize)]
pub struct VerifyEmailResponse {
    pub success: bool,
}

/// POST /verifyEmail
pub async fn verify_email<B, M>(
    State(state): State<Arc<AppState<B, M>>>,
    cookies: Cookies,
    Json(req): Json<VerifyEmailRequest>,
) -> Result<Json<VerifyEmailResponse>, AuthError>
where
    B: AuthBackend,
    M: Mailer,
{
    state
        .session_manager(&cookies)
        .verify_email(&req.email_verification_code)?;
    Ok(Json(VerifyEmailResponse { success: true }))
}
