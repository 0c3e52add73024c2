use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::{build_router, AppState};
use crate::config::{AppConfig, StoreBackend};
use crate::database::{DatabaseManager, MemoryProjectStore, PgProjectRepository, ProjectStore};

/// Install the global tracing subscriber; `RUST_LOG` overrides the default filter
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("folio_api=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn ProjectStore>> {
    match config.store_backend() {
        StoreBackend::Postgres => {
            let db = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to Postgres")?;
            db.ensure_schema().await.context("failed to prepare projects table")?;
            Ok(Arc::new(PgProjectRepository::new(db)))
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory project store; projects are lost on restart");
            Ok(Arc::new(MemoryProjectStore::new()))
        }
    }
}

/// Run the HTTP server until ctrl-c or SIGTERM, then release the store
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    config.validate()?;

    let store = build_store(&config).await?;
    let bind_addr = config.bind_address();
    let environment = config.environment;
    let state = AppState::new(config, store.clone())?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!(
        "Folio API listening on http://{} ({:?}, {} store)",
        bind_addr,
        environment,
        store.backend()
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    info!("Folio API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
