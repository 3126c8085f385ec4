//! Manual trigger endpoint.

use axum::{extract::State, http::StatusCode};
use tracing::info;

use crate::state::AppState;

/// GET|POST /trigger - Broadcast unconditionally, for testing clients by hand.
pub async fn handle_trigger(State(state): State<AppState>) -> StatusCode {
    let delivered = state.broadcast().await;
    info!(delivered, "Manual trigger broadcast");
    StatusCode::OK
}
