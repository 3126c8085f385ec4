//! Linear webhook endpoint.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use confetti_core::webhook::{completion_transition, Transition, WebhookPayload, SIGNATURE_HEADER};
use confetti_core::ConfettiError;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::WebhookRejection;
use crate::state::AppState;

/// Body returned to the webhook source.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct WebhookAck {
    pub broadcast: bool,
    pub delivered: usize,
}

/// POST /confetti - Verify a Linear delivery and celebrate completed issues.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookAck>), WebhookRejection> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(ConfettiError::MissingSignature)?;
    state.verifier.verify(&body, signature)?;

    let payload = WebhookPayload::from_slice(&body)?;
    if let Some(timestamp) = payload.webhook_timestamp {
        state.verifier.verify_timestamp(timestamp)?;
    }

    let ack = match completion_transition(&payload)? {
        Transition::Completed => {
            info!(title = payload.title().unwrap_or("<untitled>"), "Issue completed");
            let delivered = state.broadcast().await;
            WebhookAck {
                broadcast: true,
                delivered,
            }
        }
        Transition::Ignored(reason) => {
            debug!(?reason, action = ?payload.action, "Webhook ignored");
            WebhookAck {
                broadcast: false,
                delivered: 0,
            }
        }
    };

    Ok((StatusCode::OK, Json(ack)))
}
