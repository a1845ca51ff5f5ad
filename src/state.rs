//! Shared application state

use std::path::PathBuf;
use std::sync::Arc;

use tower_cookies::{Cookies, Key};

use crate::clock::{Clock, SystemClock};
use crate::config::DEFAULT_VERIFY_BASE_URL;
use crate::cookies::CookieStore;
use crate::email::Mailer;
use crate::session::SessionManager;
use crate::store::AuthBackend;

/// State shared by every request handler.
pub struct AppState<B: AuthBackend, M: Mailer> {
    /// Persistent store for users, logins, sessions, remember-me's
    pub backend: Arc<B>,
    /// Outbound mail
    pub mailer: Arc<M>,
    /// Time source; swapped out in tests
    pub clock: Arc<dyn Clock>,
    /// 64-byte secret sealing the cookies
    pub cookie_key: Key,
    /// Prefix for the `Session` and `RememberMe` cookie names
    pub cookie_prefix: String,
    /// Whether cookies carry the Secure attribute
    pub cookie_secure: bool,
    /// Fallback base URL for verification links
    pub verify_base_url: String,
    /// Where profile pictures land
    pub upload_dir: PathBuf,
}

impl<B: AuthBackend, M: Mailer> AppState<B, M> {
    pub fn new(cookie_key: Key, backend: B, mailer: M) -> Self {
        Self::new_with_arcs(
            cookie_key,
            Arc::new(backend),
            Arc::new(mailer),
            Arc::new(SystemClock),
        )
    }

    /// Create state with pre-wrapped stores (useful for testing)
    pub fn new_with_arcs(
        cookie_key: Key,
        backend: Arc<B>,
        mailer: Arc<M>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            backend,
            mailer,
            clock,
            cookie_key,
            cookie_prefix: "Auth".to_owned(),
            cookie_secure: false,
            verify_base_url: DEFAULT_VERIFY_BASE_URL.to_owned(),
            upload_dir: PathBuf::from("."),
        }
    }

    pub fn with_cookie_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cookie_prefix = prefix.into();
        self
    }

    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    pub fn with_verify_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.verify_base_url = base_url.into();
        self
    }

    pub fn with_upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = dir.into();
        self
    }

    /// A lifecycle engine bound to one request's cookies.
    pub fn session_manager<'a>(&'a self, cookies: &'a Cookies) -> SessionManager<'a, B, M> {
        SessionManager::new(
            self.backend.as_ref(),
            self.mailer.as_ref(),
            CookieStore::new(cookies, &self.cookie_key, self.cookie_secure),
            self.clock.as_ref(),
            &self.cookie_prefix,
            &self.verify_base_url,
        )
    }
}
