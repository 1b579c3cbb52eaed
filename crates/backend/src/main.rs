use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::auth::{AuthGateway, CredentialStore};
use crate::config::ServerConfig;

mod auth;
mod config;
pub mod error;
mod handlers;
mod random;
mod routes;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub gateway: AuthGateway,
    pub config: Arc<ServerConfig>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("demo_server=debug,tower_http=debug")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let store = match &config.accounts_file {
        Some(path) => CredentialStore::load(path)?,
        None => {
            tracing::info!("ACCOUNTS_FILE not set, using built-in demo accounts");
            CredentialStore::demo()
        }
    };
    let gateway = AuthGateway::new(Arc::new(store), config.auth.clone());

    let addr = config.bind_addr;
    let app = routes::build_router(AppState {
        gateway,
        config: Arc::new(config),
    });

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
