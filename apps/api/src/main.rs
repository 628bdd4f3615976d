mod config;
mod document;
mod errors;
mod export;
mod persistence;
mod routes;
mod session;
mod state;
mod tailoring;

#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::client::ExportClient;
use crate::persistence::adapter::{CoverLetterStore, PersistenceAdapter};
use crate::persistence::file_store::FileSlotStore;
use crate::persistence::SlotStore;
use crate::routes::build_router;
use crate::session::EditorSession;
use crate::state::AppState;
use crate::tailoring::client::TailoringClient;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume editor v{}", env!("CARGO_PKG_VERSION"));

    // Durable slots
    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .with_context(|| format!("Could not create data directory {}", config.data_dir.display()))?;
    let store: Arc<dyn SlotStore> = Arc::new(FileSlotStore::new(&config.data_dir));

    let adapter = Arc::new(PersistenceAdapter::new(store.clone()));
    let session = Arc::new(EditorSession::open(adapter).await);

    // External collaborators
    let tailoring = TailoringClient::new(config.tailoring_api_url.clone())
        .context("Failed to build tailoring HTTP client")?;
    let exporter = ExportClient::new(config.export_api_url.clone())
        .context("Failed to build export HTTP client")?;
    info!(
        "Tailoring service: {}, export service: {}",
        config.tailoring_api_url, config.export_api_url
    );

    let state = AppState {
        session: session.clone(),
        cover_letter: Arc::new(CoverLetterStore::new(store)),
        tailoring,
        exporter,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("HOST and PORT must form a valid socket address")?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Pending snapshot writes land before exit
    session.flush().await;
    info!("Shut down cleanly");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
