//! HTTP routes for the service

mod auth;
mod profile;
mod registration;
mod session;

pub use session::SessionResponse;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_cookies::CookieManagerLayer;

use crate::email::Mailer;
use crate::state::AppState;
use crate::store::AuthBackend;

/// Create the router with all routes
pub fn create_router<B, M>(state: Arc<AppState<B, M>>) -> Router
where
    B: AuthBackend + 'static,
    M: Mailer + 'static,
{
    Router::new()
        .route("/auth", get(session::check_auth))
        .route("/auth/basic", get(session::check_basic_auth))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/register", post(registration::register))
        .route("/verifyEmail", post(registration::verify_email))
        .route("/createProfile", post(profile::create_profile))
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
