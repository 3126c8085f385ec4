//! HTTP mapping for webhook failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use confetti_core::ConfettiError;
use serde_json::json;
use tracing::warn;

/// A webhook call that was refused. Never triggers a broadcast.
#[derive(Debug)]
pub struct WebhookRejection(pub ConfettiError);

impl WebhookRejection {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            e if e.is_authentication() => StatusCode::UNAUTHORIZED,
            ConfettiError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            ConfettiError::MissingPreviousState => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ConfettiError> for WebhookRejection {
    fn from(err: ConfettiError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookRejection {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(status = %status, error = %self.0, "Webhook rejected");
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
