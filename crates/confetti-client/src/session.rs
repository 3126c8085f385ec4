//! A single, reconnect-free WebSocket session.

use std::convert::Infallible;
use std::sync::Arc;

use confetti_core::MARKER_MESSAGE;
use futures::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info};
use url::Url;

use crate::action::ConfettiAction;
use crate::error::{ClientError, ClientResult};

/// Lifecycle of a session. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Open,
    Closed,
}

pub struct Session {
    url: Url,
    action: Arc<dyn ConfettiAction>,
    state: SessionState,
}

impl Session {
    pub fn new(url: Url, action: Arc<dyn ConfettiAction>) -> Self {
        Self {
            url,
            action,
            state: SessionState::Connecting,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Fire the local action if `payload` is exactly the marker.
    pub fn on_message(&self, payload: &str) -> bool {
        if payload == MARKER_MESSAGE {
            self.action.fire();
            true
        } else {
            debug!(payload, "Ignoring unrecognized message");
            false
        }
    }

    /// Connect and dispatch messages until the connection ends.
    ///
    /// Never returns `Ok`: a failed handshake yields
    /// [`ClientError::Connection`], any later close or transport error yields
    /// [`ClientError::Disconnected`].
    pub async fn run(&mut self) -> ClientResult<Infallible> {
        install_tls_provider();
        self.state = SessionState::Connecting;
        debug!(url = %self.url, "Connecting");
        let connected = connect_async(self.url.as_str()).await;
        let (mut stream, _response) = match connected {
            Ok(connected) => connected,
            Err(e) => {
                self.state = SessionState::Closed;
                return Err(ClientError::Connection(e));
            }
        };

        self.state = SessionState::Open;
        info!(url = %self.url, "Connected to the websocket");

        let reason = loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    self.on_message(text.as_str());
                }
                Some(Ok(Message::Close(frame))) => {
                    break frame.map(|f| f.reason.as_str().to_owned());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => break Some(e.to_string()),
                None => break None,
            }
        };

        self.state = SessionState::Closed;
        debug!(?reason, "Session closed");
        Err(ClientError::Disconnected { reason })
    }
}

/// Select the ring backend for `wss://` endpoints. Later calls are no-ops.
fn install_tls_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}
