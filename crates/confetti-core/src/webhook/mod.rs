//! Linear webhook payload model and the completion transition filter.

pub mod signature;

use serde::Deserialize;

use crate::error::{ConfettiError, ConfettiResult};

pub use signature::{LinearSignatureVerifier, SignatureVerifier, SIGNATURE_HEADER};

/// Entity type whose updates are inspected.
pub const ISSUE_ENTITY: &str = "Issue";

/// Webhook action emitted when an entity changes.
pub const UPDATE_ACTION: &str = "update";

/// Workflow state type of a finished issue.
pub const COMPLETED_STATE: &str = "completed";

/// Workflow state reference as sent by Linear.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct WorkflowState {
    #[serde(rename = "type")]
    pub state_type: Option<String>,
    pub name: Option<String>,
}

/// The entity carried in `data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueData {
    pub id: Option<String>,
    pub title: Option<String>,
    pub state: Option<WorkflowState>,
}

/// Previous values of the fields changed by an update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatedFrom {
    #[serde(rename = "type")]
    pub state_type: Option<String>,
}

/// Inbound webhook body.
///
/// Every field is optional so the filter can tell an absent value apart
/// from a different one. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub action: Option<String>,
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
    pub data: Option<IssueData>,
    pub updated_from: Option<UpdatedFrom>,
    /// Milliseconds since the Unix epoch.
    pub webhook_timestamp: Option<i64>,
    /// Flat payloads put the state at the root instead of under `data`.
    pub state: Option<WorkflowState>,
}

impl WebhookPayload {
    /// Parse a raw request body.
    pub fn from_slice(body: &[u8]) -> ConfettiResult<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Current workflow state of the issue.
    pub fn current_state(&self) -> Option<&WorkflowState> {
        self.data
            .as_ref()
            .and_then(|data| data.state.as_ref())
            .or(self.state.as_ref())
    }

    pub fn title(&self) -> Option<&str> {
        self.data.as_ref().and_then(|data| data.title.as_deref())
    }
}

/// Why a payload did not produce a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotAnIssue,
    NotAnUpdate,
    NotCompleted,
    AlreadyCompleted,
}

/// Result of running the transition filter over a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The issue newly became completed.
    Completed,
    Ignored(IgnoreReason),
}

impl Transition {
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Select updates where an issue's state type newly became `completed`.
///
/// A completed update without a previous state type is rejected with
/// [`ConfettiError::MissingPreviousState`] rather than guessed at.
pub fn completion_transition(payload: &WebhookPayload) -> ConfettiResult<Transition> {
    if let Some(entity) = payload.entity_type.as_deref() {
        if entity != ISSUE_ENTITY {
            return Ok(Transition::Ignored(IgnoreReason::NotAnIssue));
        }
    }

    if payload.action.as_deref() != Some(UPDATE_ACTION) {
        return Ok(Transition::Ignored(IgnoreReason::NotAnUpdate));
    }

    let current = payload
        .current_state()
        .and_then(|state| state.state_type.as_deref());
    if current != Some(COMPLETED_STATE) {
        return Ok(Transition::Ignored(IgnoreReason::NotCompleted));
    }

    let previous = payload
        .updated_from
        .as_ref()
        .and_then(|from| from.state_type.as_deref())
        .ok_or(ConfettiError::MissingPreviousState)?;

    if previous == COMPLETED_STATE {
        Ok(Transition::Ignored(IgnoreReason::AlreadyCompleted))
    } else {
        Ok(Transition::Completed)
    }
}
