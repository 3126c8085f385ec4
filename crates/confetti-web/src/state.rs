//! Application state.

use std::sync::Arc;

use confetti_core::webhook::SignatureVerifier;
use confetti_core::MARKER_MESSAGE;

use crate::registry::ConnectionRegistry;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ConnectionRegistry>,
    pub verifier: Arc<dyn SignatureVerifier>,
}

impl AppState {
    pub fn new(verifier: Arc<dyn SignatureVerifier>) -> Self {
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
            verifier,
        }
    }

    /// Send the marker message to all open WebSocket clients.
    pub async fn broadcast(&self) -> usize {
        self.registry.broadcast(MARKER_MESSAGE).await
    }
}
