//! Authgate
//!
//! Session and authentication sidecar for reverse-proxy deployments. The
//! proxy forwards requests here; the service inspects cookies and basic-auth
//! headers and answers with an authoritative session record.

use std::sync::Arc;

use anyhow::{Context, Result};
use tower_cookies::Key;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use authgate::config::{load_or_generate_cookie_key, Config};
use authgate::email::{ConsoleMailer, Mailer, SmtpConfig, SmtpMailer};
use authgate::routes;
use authgate::state::AppState;
use authgate::store::{AuthBackend, MemoryBackend};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authgate=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let cookie_key = load_or_generate_cookie_key(&config.cookie_key_file)?;
    std::fs::create_dir_all(&config.upload_dir)
        .with_context(|| format!("Failed to create upload dir {}", config.upload_dir))?;

    let backend = MemoryBackend::new();

    match SmtpConfig::from_env() {
        Some(smtp) => {
            let mailer = SmtpMailer::new(smtp).map_err(|e| anyhow::anyhow!(e))?;
            serve(&config, cookie_key, backend, mailer).await
        }
        None => {
            tracing::warn!("SMTP not configured; mail goes to the console");
            serve(&config, cookie_key, backend, ConsoleMailer::new()).await
        }
    }
}

async fn serve<B, M>(config: &Config, cookie_key: Key, backend: B, mailer: M) -> Result<()>
where
    B: AuthBackend + 'static,
    M: Mailer + 'static,
{
    let state = Arc::new(
        AppState::new(cookie_key, backend, mailer)
            .with_cookie_prefix(config.cookie_prefix.as_str())
            .with_cookie_secure(config.cookie_secure)
            .with_verify_base_url(config.verify_base_url.as_str())
            .with_upload_dir(config.upload_dir.as_str()),
    );
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    tracing::info!(port = config.port, "authgate listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
