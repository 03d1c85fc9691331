use std::sync::{Arc, Mutex};

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use nextspin::config::{AppConfig, EmailProviderKind};
use nextspin::db;
use nextspin::services::email::console::ConsoleEmailProvider;
use nextspin::services::email::resend::ResendProvider;
use nextspin::services::email::EmailProvider;
use nextspin::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let email: Box<dyn EmailProvider> = match config.email_provider {
        EmailProviderKind::Resend => {
            anyhow::ensure!(
                !config.resend_api_key.is_empty(),
                "RESEND_API_KEY must be set when EMAIL_PROVIDER=resend"
            );
            tracing::info!("using Resend email provider (url: {})", config.resend_api_url);
            Box::new(ResendProvider::new(
                config.resend_api_key.clone(),
                config.resend_api_url.clone(),
            ))
        }
        EmailProviderKind::Console => {
            tracing::warn!("using console email provider, emails will only be logged");
            Box::new(ConsoleEmailProvider)
        }
    };

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        email,
    });

    let app = nextspin::app(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
