//! Registry of open WebSocket connections.

use std::collections::HashMap;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};
use uuid::Uuid;

/// Outbound half of a connection: text frames queued for its writer task.
pub type ConnectionSender = mpsc::UnboundedSender<String>;

/// Identifier unique to one live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Set of currently open connections.
///
/// The lock is never held across an `.await`, so a broadcast runs to
/// completion before any connect or disconnect is applied.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, ConnectionSender>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly opened connection.
    pub async fn on_connect(&self, id: ConnectionId, sender: ConnectionSender) {
        let mut connections = self.connections.lock().await;
        connections.insert(id, sender);
        info!(connection_id = %id, connections = connections.len(), "WebSocket client connected");
    }

    /// Forget a closed connection. Unknown ids are ignored.
    pub async fn on_disconnect(&self, id: ConnectionId) {
        let mut connections = self.connections.lock().await;
        if connections.remove(&id).is_some() {
            info!(connection_id = %id, connections = connections.len(), "WebSocket client disconnected");
        }
    }

    /// Queue `message` on every open connection and return how many were written.
    ///
    /// Connections whose writer is gone are skipped; the disconnect path
    /// removes them.
    pub async fn broadcast(&self, message: &str) -> usize {
        let connections = self.connections.lock().await;
        let mut written = 0;
        for (id, sender) in connections.iter() {
            if sender.is_closed() {
                debug!(connection_id = %id, "Skipping closed connection");
                continue;
            }
            match sender.send(message.to_owned()) {
                Ok(()) => written += 1,
                Err(_) => debug!(connection_id = %id, "Connection closed during broadcast"),
            }
        }
        debug!(written, registered = connections.len(), "Broadcast complete");
        written
    }

    pub async fn len(&self) -> usize {
        self.connections.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.connections.lock().await.is_empty()
    }

    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.connections.lock().await.contains_key(&id)
    }
}
