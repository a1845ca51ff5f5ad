//! Common test utilities for integration tests

#![allow(unused)]

use std::sync::{Arc, Mutex, RwLock};

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tempfile::TempDir;
use tower_cookies::cookie::{Cookie, CookieJar};
use tower_cookies::Key;

use authgate::email::{Mailer, VerifyParams};
use authgate::routes;
use authgate::state::AppState;
use authgate::store::MemoryBackend;
use authgate::Clock;

pub const SESSION_COOKIE: &str = "AuthSession";
pub const REMEMBER_ME_COOKIE: &str = "AuthRememberMe";

/// Clock the tests move by hand.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc::now()),
        }
    }

    pub fn advance(&self, delta: Duration) {
        *self.now.lock().unwrap() += delta;
    }
}

impl Clock for ManualClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Mailer that captures what would have been sent
#[derive(Default, Clone)]
pub struct MockMailer {
    /// Captured (email, verification code) pairs
    pub sent: Arc<RwLock<Vec<(String, String)>>>,
    /// Base URLs the verification links were built against
    pub base_urls: Arc<RwLock<Vec<String>>>,
    /// Recipients of welcome mail
    pub welcomed: Arc<RwLock<Vec<String>>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the last verification code sent to an email
    pub fn get_code(&self, email: &str) -> Option<String> {
        self.sent
            .read()
            .unwrap()
            .iter()
            .rev()
            .find(|(e, _)| e == email)
            .map(|(_, c)| c.clone())
    }

    pub fn welcome_count(&self, email: &str) -> usize {
        self.welcomed
            .read()
            .unwrap()
            .iter()
            .filter(|e| *e == email)
            .count()
    }
}

impl Mailer for MockMailer {
    fn send_verify(&self, email: &str, params: &VerifyParams) -> Result<(), String> {
        self.sent
            .write()
            .unwrap()
            .push((email.to_string(), params.verification_code.clone()));
        self.base_urls
            .write()
            .unwrap()
            .push(params.referer_base_url.clone());
        Ok(())
    }

    fn send_welcome(&self, email: &str) -> Result<(), String> {
        self.welcomed.write().unwrap().push(email.to_string());
        Ok(())
    }
}

/// Test server with access to the underlying stores and clock
pub struct TestContext {
    pub server: TestServer,
    pub mailer: MockMailer,
    pub backend: Arc<MemoryBackend>,
    pub clock: Arc<ManualClock>,
    pub key: Key,
    pub upload_dir: TempDir,
}

pub fn create_test_context() -> TestContext {
    let key_bytes: Vec<u8> = (1..=64).collect();
    let key = Key::try_from(&key_bytes[..]).expect("valid test key");

    let clock = Arc::new(ManualClock::new());
    let backend = Arc::new(MemoryBackend::with_clock(clock.clone()));
    let mailer = Arc::new(MockMailer::new());
    let upload_dir = tempfile::tempdir().expect("temp upload dir");

    let state = Arc::new(
        AppState::new_with_arcs(key.clone(), backend.clone(), mailer.clone(), clock.clone())
            .with_upload_dir(upload_dir.path()),
    );

    let app = routes::create_router(state);
    let server = TestServer::new(app).expect("Failed to create test server");

    TestContext {
        server,
        mailer: MockMailer {
            sent: mailer.sent.clone(),
            base_urls: mailer.base_urls.clone(),
            welcomed: mailer.welcomed.clone(),
        },
        backend,
        clock,
        key,
        upload_dir,
    }
}

/// Seal a cookie payload exactly as the service does.
pub fn seal_cookie<T: serde::Serialize>(key: &Key, name: &str, value: &T) -> String {
    let mut jar = CookieJar::new();
    jar.private_mut(key).add(Cookie::new(
        name.to_owned(),
        serde_json::to_string(value).expect("payload serializes"),
    ));
    jar.get(name).expect("cookie sealed").value().to_string()
}

/// Open a sealed cookie value taken from a response.
pub fn unseal_cookie<T: serde::de::DeserializeOwned>(key: &Key, name: &str, value: &str) -> T {
    let mut jar = CookieJar::new();
    jar.add_original(Cookie::new(name.to_owned(), value.to_owned()));
    let cookie = jar.private(key).get(name).expect("cookie unseals");
    serde_json::from_str(cookie.value()).expect("cookie payload decodes")
}

/// Register, returning the sealed session cookie value and the mailed code.
pub async fn register_user(ctx: &TestContext, email: &str) -> (String, String) {
    let response = ctx
        .server
        .post("/register")
        .json(&json!({ "email": email }))
        .await;
    assert_eq!(response.status_code(), 200);

    let cookie = response
        .maybe_cookie(SESSION_COOKIE)
        .expect("no session cookie")
        .value()
        .to_string();
    let code = ctx.mailer.get_code(email).expect("no verification code sent");
    (cookie, code)
}

/// Finish a registration with the profile form, returning the refreshed
/// session cookie.
pub async fn create_profile_with(ctx: &TestContext, session_cookie: &str, password: &str) -> String {
    let form = MultipartForm::new()
        .add_text("fullName", "Test User")
        .add_text("Organization", "Test Org")
        .add_text("password", password)
        .add_part(
            "file",
            Part::bytes(b"not really a png".to_vec())
                .file_name("avatar.png")
                .mime_type("image/png"),
        );

    let response = ctx
        .server
        .post("/createProfile")
        .add_cookie(Cookie::new(SESSION_COOKIE, session_cookie.to_owned()))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 200);

    response
        .maybe_cookie(SESSION_COOKIE)
        .expect("no refreshed session cookie")
        .value()
        .to_string()
}

/// Drive register → verify → profile, ending with a full-auth session cookie.
pub async fn create_verified_user(ctx: &TestContext, email: &str, password: &str) -> String {
    let (cookie, code) = register_user(ctx, email).await;

    let response = ctx
        .server
        .post("/verifyEmail")
        .add_cookie(Cookie::new(SESSION_COOKIE, cookie))
        .json(&json!({ "emailVerificationCode": code }))
        .await;
    assert_eq!(response.status_code(), 200);
    let cookie = response
        .maybe_cookie(SESSION_COOKIE)
        .expect("no session cookie after verify")
        .value()
        .to_string();

    create_profile_with(ctx, &cookie, password).await
}
