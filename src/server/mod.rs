//! HTTP API server for the document store.

pub mod routes;

use crate::store::DocumentStore;
use std::sync::Arc;
use tracing::info;

/// Shared application state for the HTTP server.
pub struct AppState {
    pub store: DocumentStore,
}

impl AppState {
    pub fn new(store: DocumentStore) -> Arc<Self> {
        Arc::new(Self { store })
    }
}

/// Serve `store` over HTTP until the process is stopped.
pub async fn start(addr: &str, store: DocumentStore) -> anyhow::Result<()> {
    let app = routes::create_router(AppState::new(store));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr, "server listening");
    println!("Server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
