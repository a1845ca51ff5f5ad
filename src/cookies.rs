//! Sealed cookie store over the request/response pair.
//!
//! Values are serialized to JSON and sealed with the authenticated-encryption
//! jar keyed by the service's 64-byte secret. A cookie that is missing reads
//! as [`CookieError::Absent`]; one that fails authentication or decode reads
//! as [`CookieError::Corrupt`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use tower_cookies::cookie::time::{Duration, OffsetDateTime};
use tower_cookies::{Cookie, Cookies, Key};

use crate::error::CookieError;

/// Default cookie lifetime: 30 days.
pub const DEFAULT_COOKIE_LIFETIME_SECS: i64 = 30 * 24 * 60 * 60;

pub struct CookieStore<'a> {
    cookies: &'a Cookies,
    key: &'a Key,
    secure: bool,
}

impl<'a> CookieStore<'a> {
    pub fn new(cookies: &'a Cookies, key: &'a Key, secure: bool) -> Self {
        Self {
            cookies,
            key,
            secure,
        }
    }

    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, CookieError> {
        if self.cookies.get(name).is_none() {
            return Err(CookieError::Absent);
        }
        let cookie = self
            .cookies
            .private(self.key)
            .get(name)
            .ok_or(CookieError::Corrupt)?;
        serde_json::from_str(cookie.value()).map_err(|_| CookieError::Corrupt)
    }

    pub fn put<T: Serialize>(&self, name: &str, value: &T) -> Result<(), CookieError> {
        self.put_with_expire(name, DEFAULT_COOKIE_LIFETIME_SECS, value)
    }

    pub fn put_with_expire<T: Serialize>(
        &self,
        name: &str,
        expire_seconds: i64,
        value: &T,
    ) -> Result<(), CookieError> {
        let payload = serde_json::to_string(value).map_err(|_| CookieError::Corrupt)?;
        let cookie = Cookie::build((name.to_owned(), payload))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .max_age(Duration::seconds(expire_seconds))
            .expires(OffsetDateTime::now_utc() + Duration::seconds(expire_seconds))
            .build();
        self.cookies.private(self.key).add(cookie);
        Ok(())
    }

    /// Emit a removal cookie (Max-Age = 0).
    pub fn delete(&self, name: &str) {
        let cookie = Cookie::build((name.to_owned(), String::new()))
            .path("/")
            .http_only(true)
            .max_age(Duration::ZERO)
            .build();
        self.cookies.add(cookie);
    }
}
