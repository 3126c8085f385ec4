//! WebSocket handler for confetti notifications.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use tracing::debug;

use crate::registry::ConnectionId;
use crate::state::AppState;

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let id = ConnectionId::new();
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    state.registry.on_connect(id, tx).await;

    // Forward queued frames to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            debug!(connection_id = %id, message = %text, "Sending message to WebSocket client");
            if sender.send(Message::Text(text.into())).await.is_err() {
                debug!(connection_id = %id, "WebSocket send failed, client disconnected");
                break;
            }
        }
    });

    // Client traffic is logged and otherwise ignored
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    debug!(connection_id = %id, "Received from WebSocket client: {}", text.as_str());
                }
                Message::Close(_) => {
                    debug!(connection_id = %id, "WebSocket client sent close frame");
                    break;
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.registry.on_disconnect(id).await;
}
