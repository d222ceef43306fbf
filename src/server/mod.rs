//! HTTP edge serving feeds as `GET /<name>.xml`.
//!
//! Every request runs the full read pipeline against the fullnode; nothing
//! is cached between requests.

mod handlers;

use crate::config::Settings;
use crate::rpc::SuiClient;
use crate::schema::ObjectId;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use handlers::{feed_name_from_path, parse_window, RSS_CONTENT_TYPE};

/// Shared, read-only state of the edge.
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: SuiClient,
    pub settings: Settings,
    /// Registry name table, resolved once at startup.
    pub table_id: ObjectId,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/hello", get(handlers::hello))
        .route("/{file}", get(handlers::feed_xml))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `listen` and serves until Ctrl-C.
pub async fn serve(listen: SocketAddr, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen).await?;
    tracing::info!(addr = %listener.local_addr()?, table = %state.table_id, "Serving feeds");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C, shutting down");
        return;
    }
    tracing::info!("Shutdown requested");
}
