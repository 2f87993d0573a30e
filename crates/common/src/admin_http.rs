//! Lightweight admin HTTP server
//!
//! Exposes `/healthz` and `/metrics` endpoints, with metrics provided by caller.

use axum::http::StatusCode;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::info;

pub type MetricsFn = fn() -> (StatusCode, String);

async fn healthz() -> &'static str { "OK" }

/// Router with `/healthz` and `/metrics`; the metrics body comes from `metrics_fn`.
pub fn admin_router(metrics_fn: MetricsFn) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(move || async move { metrics_fn() }))
}

/// Bind `addr` and serve the admin router until the task is dropped or fails.
pub async fn serve_admin(addr: &str, metrics_fn: MetricsFn) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "admin server listening");
    axum::serve(listener, admin_router(metrics_fn)).await?;
    Ok(())
}

/// Spawn the admin server on the current tokio runtime.
pub fn spawn_admin_server(addr: &str, metrics_fn: MetricsFn) -> tokio::task::JoinHandle<anyhow::Result<()>> {
    let addr = addr.to_string();
    tokio::spawn(async move { serve_admin(&addr, metrics_fn).await })
}
