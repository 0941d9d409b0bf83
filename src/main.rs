//! PDF Share Server
//!
//! Self-hosted PDF sharing: uploads go to S3-compatible storage, owners hand
//! out share links, and link holders leave threaded comments.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdf_share_server::auth::Hs256Verifier;
use pdf_share_server::config::{Config, StorageProvider};
use pdf_share_server::db;
use pdf_share_server::notify::{HttpRelayNotifier, LogNotifier, Notifier, ShareMailer};
use pdf_share_server::routes;
use pdf_share_server::state::AppState;
use pdf_share_server::storage::{MemoryStore, ObjectStore, S3Client};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "pdf_share_server=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration from environment")?;

    tracing::info!("Starting PDF Share Server v{}", env!("CARGO_PKG_VERSION"));

    // Initialize object storage
    let object_store: Arc<dyn ObjectStore> = match config.storage.provider {
        StorageProvider::Memory => {
            tracing::warn!("Using in-memory object store; uploads are lost on restart");
            Arc::new(MemoryStore::new())
        }
        provider => {
            tracing::info!("S3 provider: {:?}", provider);
            tracing::info!("S3 endpoint: {}", config.storage.endpoint);
            tracing::info!("S3 bucket: {}", config.storage.bucket);
            Arc::new(
                S3Client::new(&config.storage)
                    .await
                    .context("Failed to initialize S3 client")?,
            )
        }
    };

    // Initialize database
    let db_pool = db::create_pool(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database initialized at {}", config.database.url);

    // Mail delivery
    let notifier: Arc<dyn Notifier> = match &config.mail.relay_url {
        Some(url) => {
            tracing::info!("Mail relay: {}", url);
            Arc::new(HttpRelayNotifier::new(url, config.mail.api_key.clone(), &config.mail.from))
        }
        None => {
            tracing::warn!("MAIL_RELAY_URL not set; share invites will only be logged");
            Arc::new(LogNotifier)
        }
    };
    let mailer = ShareMailer::new(notifier, &config.share.public_base_url);

    let verifier = Arc::new(Hs256Verifier::new(&config.auth.jwt_secret));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid SERVER_HOST/SERVER_PORT")?;

    // Create application state and router
    let app_state = AppState::new(config, db_pool, object_store, verifier, mailer);
    let app = routes::app(app_state);

    // Start server with graceful shutdown
    tracing::info!("PDF Share Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
