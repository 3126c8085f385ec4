//! Confetti Notifier Server
//!
//! Axum server that verifies Linear webhooks and fans a marker message out
//! to every connected WebSocket client.

pub mod error;
pub mod registry;
pub mod routes;
pub mod state;
pub mod websocket;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use confetti_core::webhook::LinearSignatureVerifier;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Listener and webhook settings for the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub webhook_secret: String,
    pub webhook_tolerance: Duration,
}

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/confetti", post(routes::webhook::handle_webhook))
        .route(
            "/trigger",
            get(routes::trigger::handle_trigger).post(routes::trigger::handle_trigger),
        )
        .route("/ws", get(websocket::ws_handler))
        .fallback(|| async { (StatusCode::NOT_FOUND, "Not found") })
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let verifier = LinearSignatureVerifier::new(config.webhook_secret)?
        .with_tolerance(config.webhook_tolerance);
    let state = AppState::new(Arc::new(verifier));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Confetti server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
