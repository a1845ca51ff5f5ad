//! Session lifecycle engine
//!
//! Binds a login to a short-lived session cookie and an optional longer-lived
//! remember-me pair, and drives the renewal, registration, email-verification,
//! and profile-creation flows. The backend owns uniqueness and identity; this
//! module owns time, randomness, and cookie policy.

use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::cookies::CookieStore;
use crate::crypto;
use crate::email::{Mailer, VerifyParams};
use crate::error::{AuthError, CookieError, StoreError};
use crate::store::{
    AuthBackend, LoginId, RememberMeParams, SessionId, UserLoginRememberMe, UserLoginSession,
    LOGIN_PROVIDER_DEFAULT_NAME,
};

/// Soft deadline: a session past this is silently refreshed.
pub const SESSION_RENEW_MINUTES: i64 = 5;
/// Hard deadline: a session past this needs a valid remember-me.
pub const SESSION_EXPIRE_MINUTES: i64 = 60;
pub const REMEMBER_ME_RENEW_MINUTES: i64 = 60;
pub const REMEMBER_ME_EXPIRE_DAYS: i64 = 30;

const PASSWORD_VALIDATION_MESSAGE: &str = "Password must be between 7 and 20 characters";

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email regex compiles")
});

/// Sealed payload of the `{prefix}Session` cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookie {
    pub session_id: SessionId,
    pub renews_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Sealed payload of the `{prefix}RememberMe` cookie. Carries the raw token;
/// the backend only ever sees its hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RememberMeCookie {
    pub selector: String,
    pub token: String,
    pub renews_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Per-request view over the backend, mailer, and the request's cookies.
pub struct SessionManager<'a, B: AuthBackend, M: Mailer> {
    backend: &'a B,
    mailer: &'a M,
    cookies: CookieStore<'a>,
    clock: &'a dyn Clock,
    session_cookie_name: String,
    remember_me_cookie_name: String,
    default_base_url: &'a str,
}

impl<'a, B: AuthBackend, M: Mailer> SessionManager<'a, B, M> {
    pub fn new(
        backend: &'a B,
        mailer: &'a M,
        cookies: CookieStore<'a>,
        clock: &'a dyn Clock,
        cookie_prefix: &str,
        default_base_url: &'a str,
    ) -> Self {
        Self {
            backend,
            mailer,
            cookies,
            clock,
            session_cookie_name: format!("{cookie_prefix}Session"),
            remember_me_cookie_name: format!("{cookie_prefix}RememberMe"),
            default_base_url,
        }
    }

    /// Resolve the request's session, renewing it when past a deadline.
    pub fn get_session(&self) -> Result<UserLoginSession, AuthError> {
        let cookie = self
            .session_cookie()
            .map_err(|e| AuthError::auth_from("Session cookie not found", e))?;

        let now = self.clock.now_utc();
        if cookie.renews_at < now || cookie.expires_at < now {
            return self.renew_session(&cookie);
        }

        match self.backend.get_session(&cookie.session_id) {
            Ok(session) => Ok(session),
            Err(err) => {
                if err == StoreError::SessionNotFound {
                    self.delete_session_cookie();
                }
                Err(AuthError::logged_from("Failed to verify session", err))
            }
        }
    }

    /// Resolve the session, falling back to HTTP Basic credentials.
    pub fn get_basic_auth(
        &self,
        authorization: Option<&str>,
    ) -> Result<UserLoginSession, AuthError> {
        match self.get_session() {
            Ok(session) => Ok(session),
            Err(_) => {
                let Some((email, password)) = authorization.and_then(parse_basic_auth) else {
                    return Err(AuthError::auth(
                        "Problem decoding credentials from basic auth",
                    ));
                };
                self.login(&email, &password, false).map_err(|e| {
                    AuthError::logged_from("Unable to login with provided credentials", e)
                })
            }
        }
    }

    pub fn login(
        &self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<UserLoginSession, AuthError> {
        if !is_valid_email(email) {
            return Err(AuthError::auth("Please enter a valid email address."));
        }
        if !is_valid_password(password) {
            return Err(AuthError::auth(PASSWORD_VALIDATION_MESSAGE));
        }

        let login = self
            .backend
            .get_user_login(email, LOGIN_PROVIDER_DEFAULT_NAME)
            .map_err(|e| AuthError::logged_from("Invalid username or password", e))?;
        if !crypto::verify_password(password, &login.provider_key) {
            return Err(AuthError::logged("Invalid username or password"));
        }

        self.create_session(login.login_id, remember_me)
    }

    /// Create a user plus half-auth session and mail the verification code.
    /// A mail failure is surfaced but the created user stands; re-registering
    /// retries the send.
    pub fn register(&self, email: &str, referer: Option<&str>) -> Result<(), AuthError> {
        if !is_valid_email(email) {
            return Err(AuthError::auth("Invalid email"));
        }

        let (session, code) = self.add_user(email)?;
        self.save_session_cookie(&session)?;

        // the code always pads to a single trailing "="; drop it for the link
        let code = code.strip_suffix('=').unwrap_or(&code).to_owned();
        let params = VerifyParams {
            verification_code: code,
            email: email.to_owned(),
            referer_base_url: self.base_url(referer),
        };
        self.mailer
            .send_verify(email, &params)
            .map_err(|e| AuthError::logged_from("Unable to send verification email", e))?;
        Ok(())
    }

    /// Redeem a mailed verification code, keeping the current session id when
    /// one is present so retries land on the same session.
    pub fn verify_email(&self, verification_code: &str) -> Result<(), AuthError> {
        let session_id = match self.session_cookie() {
            Ok(cookie) => cookie.session_id,
            Err(_) => SessionId(
                crypto::random_string()
                    .map_err(|e| AuthError::logged_from("Unable to generate session id", e))?,
            ),
        };

        // restore the "=" stripped at mail time, then decode
        let secret = crypto::decode(&format!("{verification_code}="))
            .map_err(|e| AuthError::logged_from("Invalid verification code", e))?;
        let verify_hash = crypto::encode(&crypto::hash(&secret));

        let now = self.clock.now_utc();
        let (session, email) = self
            .backend
            .verify_email(
                &verify_hash,
                &session_id,
                now + Duration::minutes(SESSION_RENEW_MINUTES),
                now + Duration::minutes(SESSION_EXPIRE_MINUTES),
            )
            .map_err(|e| AuthError::logged_from("Failed to verify email", e))?;

        self.save_session_cookie(&session)?;
        self.mailer
            .send_welcome(&email)
            .map_err(|e| AuthError::logged_from("Failed to send welcome email", e))?;
        Ok(())
    }

    /// Finish registration: set the password, store the profile, promote the
    /// current session to full-auth, and drop every other session.
    pub fn create_profile(
        &self,
        full_name: &str,
        organization: &str,
        password: &str,
        picture_path: &str,
    ) -> Result<UserLoginSession, AuthError> {
        let session = self
            .get_session()
            .map_err(|e| AuthError::logged_from("Unable to get session", e))?;

        let password_hash = crypto::hash_password(password)
            .map_err(|e| AuthError::logged_from("Unable to hash password", e))?;
        let session = self
            .backend
            .create_profile_and_invalidate_sessions(
                session.login_id,
                &password_hash,
                full_name,
                organization,
                picture_path,
                &session.session_id,
                session.expires_at,
                session.renews_at,
            )
            .map_err(|e| AuthError::logged_from("Unable to create profile", e))?;

        self.save_session_cookie(&session)?;
        Ok(session)
    }

    /// Invalidate the server-side session and remember-me and expire both
    /// cookies.
    pub fn logout(&self) -> Result<(), AuthError> {
        if let Ok(cookie) = self.session_cookie() {
            let _ = self.backend.invalidate_session(&cookie.session_id);
        }
        if let Ok(cookie) = self.remember_me_cookie() {
            let _ = self.backend.invalidate_remember_me(&cookie.selector);
        }
        self.delete_session_cookie();
        self.delete_remember_me_cookie();
        Ok(())
    }

    /// Reserved surface; currently a no-op.
    pub fn update_email(&self) -> Result<(), AuthError> {
        Ok(())
    }

    /// Reserved surface; currently a no-op.
    pub fn update_password(&self) -> Result<(), AuthError> {
        Ok(())
    }

    fn renew_session(&self, cookie: &SessionCookie) -> Result<UserLoginSession, AuthError> {
        let now = self.clock.now_utc();
        let renews_at = now + Duration::minutes(SESSION_RENEW_MINUTES);

        if cookie.renews_at < now && cookie.expires_at > now {
            let session = self
                .backend
                .renew_session(&cookie.session_id, renews_at)
                .map_err(|e| AuthError::logged_from("Unable to renew session", e))?;
            self.save_session_cookie(&session)?;
            return Ok(session);
        }

        // past the hard deadline: only a valid remember-me revives the session
        self.get_remember_me()
            .map_err(|e| AuthError::auth_from("Unable to renew session", e))?;

        let session = match self.backend.renew_session(&cookie.session_id, renews_at) {
            Ok(session) => session,
            Err(err) => {
                if err == StoreError::SessionNotFound {
                    self.delete_session_cookie();
                }
                return Err(AuthError::logged_from("Problem renewing session", err));
            }
        };
        self.save_session_cookie(&session)?;
        Ok(session)
    }

    fn get_remember_me(&self) -> Result<UserLoginRememberMe, AuthError> {
        let cookie = self
            .remember_me_cookie()
            .map_err(|e| AuthError::auth_from("RememberMe cookie not found", e))?;
        let now = self.clock.now_utc();
        if cookie.expires_at < now {
            self.delete_remember_me_cookie();
            return Err(AuthError::auth("RememberMe cookie has expired"));
        }

        let remember = match self.backend.get_remember_me(&cookie.selector) {
            Ok(remember) => remember,
            Err(err) => {
                if err == StoreError::RememberMeNotFound {
                    self.delete_remember_me_cookie();
                }
                return Err(AuthError::logged_from(
                    "Unable to find matching RememberMe in store",
                    err,
                ));
            }
        };

        if !crypto::encoded_hash_equals(&cookie.token, &remember.token_hash) {
            self.delete_remember_me_cookie();
            return Err(AuthError::logged("RememberMe cookie does not match stored token"));
        }

        if remember.renews_at < now {
            let renews_at = now + Duration::minutes(REMEMBER_ME_RENEW_MINUTES);
            return match self.backend.renew_remember_me(&cookie.selector, renews_at) {
                Ok(renewed) => Ok(renewed),
                Err(err) => {
                    if err == StoreError::RememberMeNotFound {
                        self.delete_remember_me_cookie();
                    }
                    Err(AuthError::logged_from("Unable to renew RememberMe", err))
                }
            };
        }
        Ok(remember)
    }

    fn create_session(
        &self,
        login_id: LoginId,
        remember_me: bool,
    ) -> Result<UserLoginSession, AuthError> {
        let now = self.clock.now_utc();
        let remember_material = if remember_me {
            let (selector, token, token_hash) = crypto::generate_selector_token_and_hash()
                .map_err(|e| AuthError::logged_from("Unable to generate RememberMe", e))?;
            Some((
                token,
                RememberMeParams {
                    selector,
                    token_hash,
                    renews_at: now + Duration::minutes(REMEMBER_ME_RENEW_MINUTES),
                    expires_at: now + Duration::days(REMEMBER_ME_EXPIRE_DAYS),
                },
            ))
        } else {
            None
        };

        let session_id = SessionId(
            crypto::random_string()
                .map_err(|e| AuthError::logged_from("Problem generating session id", e))?,
        );

        let (session, remember) = self
            .backend
            .new_login_session(
                login_id,
                &session_id,
                now + Duration::minutes(SESSION_RENEW_MINUTES),
                now + Duration::minutes(SESSION_EXPIRE_MINUTES),
                remember_material.as_ref().map(|(_, params)| params),
            )
            .map_err(|e| AuthError::logged_from("Unable to create new session", e))?;

        // drop the client's previous server-side session; the old cookie must
        // not stay valid after a fresh login
        if let Ok(prior) = self.session_cookie() {
            if prior.session_id != session.session_id {
                let _ = self.backend.invalidate_session(&prior.session_id);
            }
        }

        if let (Some((token, _)), Some(remember)) = (&remember_material, &remember) {
            self.save_remember_me_cookie(&RememberMeCookie {
                selector: remember.selector.clone(),
                token: token.clone(),
                renews_at: remember.renews_at,
                expires_at: remember.expires_at,
            })
            .map_err(|e| AuthError::auth_from("Unable to save rememberMe cookie", e))?;
        }
        self.save_session_cookie(&session)?;
        Ok(session)
    }

    fn add_user(&self, email: &str) -> Result<(UserLoginSession, String), AuthError> {
        let (code, code_hash) = crypto::generate_string_and_hash()
            .map_err(|e| AuthError::logged_from("Problem generating email confirmation code", e))?;
        let session_id = SessionId(
            crypto::random_string()
                .map_err(|e| AuthError::logged_from("Problem generating session id", e))?,
        );

        let now = self.clock.now_utc();
        let session = self
            .backend
            .add_user(
                email,
                &code_hash,
                &session_id,
                now + Duration::minutes(SESSION_RENEW_MINUTES),
                now + Duration::minutes(SESSION_EXPIRE_MINUTES),
            )
            .map_err(|e| AuthError::logged_from("Problem adding user to store", e))?;
        Ok((session, code))
    }

    fn base_url(&self, referer: Option<&str>) -> String {
        base_url_or(referer, self.default_base_url)
    }

    fn session_cookie(&self) -> Result<SessionCookie, CookieError> {
        self.cookies.get(&self.session_cookie_name)
    }

    fn remember_me_cookie(&self) -> Result<RememberMeCookie, CookieError> {
        self.cookies.get(&self.remember_me_cookie_name)
    }

    fn save_session_cookie(&self, session: &UserLoginSession) -> Result<(), AuthError> {
        let cookie = SessionCookie {
            session_id: session.session_id.clone(),
            renews_at: session.renews_at,
            expires_at: session.expires_at,
        };
        self.cookies
            .put(&self.session_cookie_name, &cookie)
            .map_err(|e| AuthError::auth_from("Error saving session cookie", e))
    }

    fn save_remember_me_cookie(&self, cookie: &RememberMeCookie) -> Result<(), CookieError> {
        self.cookies.put(&self.remember_me_cookie_name, cookie)
    }

    fn delete_session_cookie(&self) {
        self.cookies.delete(&self.session_cookie_name);
    }

    fn delete_remember_me_cookie(&self) {
        self.cookies.delete(&self.remember_me_cookie_name);
    }
}

fn is_valid_email(email: &str) -> bool {
    (6..=254).contains(&email.len()) && EMAIL_REGEX.is_match(email)
}

fn is_valid_password(password: &str) -> bool {
    (7..=20).contains(&password.len())
}

/// `scheme://host` of the referer; falls back to the given base URL for
/// relative or missing referers.
fn base_url_or(referer: Option<&str>, default: &str) -> String {
    let Some(url) = referer.filter(|u| !u.is_empty()) else {
        return default.to_owned();
    };
    let Some(proto) = url.find("://") else {
        return default.to_owned();
    };
    match url[proto + 3..].find('/') {
        None => url.to_owned(),
        Some(slash) => url[..proto + 3 + slash].to_owned(),
    }
}

fn parse_basic_auth(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
    let (email, password) = decoded.split_once(':')?;
    Some((email.to_owned(), password.to_owned()))
}
