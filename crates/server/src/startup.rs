use std::net::SocketAddr;

use axum::Router;
use common::admin_http::spawn_admin_server;
use configs::{AppConfig, ServerConfig};
use service::items::ItemsStore;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::errors::StartupError;
use crate::observability;
use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn load_bind_addr(server: &ServerConfig) -> Result<SocketAddr, StartupError> {
    let raw = server.bind_addr();
    raw.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address {raw}: {e}")))
}

/// Router over a freshly seeded items store.
pub fn app() -> Router {
    app_with_state(ServerState::new(ItemsStore::new()))
}

pub fn app_with_state(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "cannot listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

/// Public entry: build the app and run the HTTP server until Ctrl+C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let items = ItemsStore::new();
    observability::set_item_count(items.len().await);

    if cfg.admin.enabled {
        let admin_addr = cfg.admin.bind_addr();
        let handle = spawn_admin_server(&admin_addr, observability::encode_metrics);
        tokio::spawn(async move {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(%admin_addr, error = %e, "admin server failed"),
                Err(e) => error!(%admin_addr, error = %e, "admin server task aborted"),
            }
        });
    }

    let app = app_with_state(ServerState::new(items));

    let addr = load_bind_addr(&cfg.server)?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.to_string(), source })?;
    info!(%addr, "starting items api");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    Ok(())
}
