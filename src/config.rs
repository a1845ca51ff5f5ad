//! Configuration for the service

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tower_cookies::Key;

use crate::crypto;

/// Fallback base URL for verification links when the registration request
/// carries no usable referer.
pub const DEFAULT_VERIFY_BASE_URL: &str = "https://localhost";

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP port to listen on
    pub port: u16,
    /// Path to the cookie key file
    pub cookie_key_file: String,
    /// Prefix for the session and remember-me cookie names
    pub cookie_prefix: String,
    /// Whether cookies carry the Secure attribute
    pub cookie_secure: bool,
    /// Base URL used in verification links when no referer is present
    pub verify_base_url: String,
    /// Directory for uploaded profile pictures
    pub upload_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 4280,
            cookie_key_file: "authgate-key.json".to_string(),
            cookie_prefix: "Auth".to_string(),
            cookie_secure: true,
            verify_base_url: DEFAULT_VERIFY_BASE_URL.to_string(),
            upload_dir: "uploads".to_string(),
        }
    }
}

impl Config {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let defaults = Config::default();

        let port = std::env::var("AUTHGATE_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let cookie_key_file =
            std::env::var("AUTHGATE_COOKIE_KEY_FILE").unwrap_or(defaults.cookie_key_file);

        let cookie_prefix =
            std::env::var("AUTHGATE_COOKIE_PREFIX").unwrap_or(defaults.cookie_prefix);

        let cookie_secure = std::env::var("AUTHGATE_COOKIE_SECURE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.cookie_secure);

        let verify_base_url =
            std::env::var("AUTHGATE_VERIFY_BASE_URL").unwrap_or(defaults.verify_base_url);

        let upload_dir = std::env::var("AUTHGATE_UPLOAD_DIR").unwrap_or(defaults.upload_dir);

        Self {
            port,
            cookie_key_file,
            cookie_prefix,
            cookie_secure,
            verify_base_url,
            upload_dir,
        }
    }
}

/// Serializable cookie key for storage
#[derive(Serialize, Deserialize)]
struct StoredCookieKey {
    cookie_key: String,
}

/// Load or generate the 64-byte cookie sealing key
pub fn load_or_generate_cookie_key(path: &str) -> Result<Key> {
    if Path::new(path).exists() {
        load_cookie_key(path)
    } else {
        let bytes = crypto::random_bytes(64).context("Failed to generate cookie key")?;
        save_cookie_key(path, &bytes)?;
        tracing::info!("Generated new cookie key and saved to {}", path);
        key_from_bytes(&bytes)
    }
}

fn key_from_bytes(bytes: &[u8]) -> Result<Key> {
    Key::try_from(bytes).map_err(|_| anyhow::anyhow!("cookie key must be 64 bytes"))
}

fn load_cookie_key(path: &str) -> Result<Key> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read cookie key from {}", path))?;

    let stored: StoredCookieKey =
        serde_json::from_str(&contents).with_context(|| "Failed to parse cookie key JSON")?;

    let bytes = crypto::decode(&stored.cookie_key).context("Failed to decode cookie key")?;
    key_from_bytes(&bytes)
}

fn save_cookie_key(path: &str, bytes: &[u8]) -> Result<()> {
    let stored = StoredCookieKey {
        cookie_key: crypto::encode(bytes),
    };
    let json = serde_json::to_string_pretty(&stored)?;
    fs::write(path, json).with_context(|| format!("Failed to write cookie key to {}", path))?;
    Ok(())
}
