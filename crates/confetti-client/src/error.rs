//! Error types for the notifier client.

use std::path::PathBuf;

use thiserror::Error;

/// Every way a client run can end.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Home directory does not exist: {}", display_path(.0))]
    HomeDirMissing(Option<PathBuf>),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Config file created, please set the url in {}", .0.display())]
    ConfigCreated(PathBuf),

    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Error connecting to the websocket: {0}")]
    Connection(#[source] tokio_tungstenite::tungstenite::Error),

    #[error("Disconnected from the websocket{}", reason_suffix(.reason))]
    Disconnected { reason: Option<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Create a config invalid error.
    pub fn config_invalid(msg: impl Into<String>) -> Self {
        Self::ConfigInvalid(msg.into())
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unset>".to_string())
}

fn reason_suffix(reason: &Option<String>) -> String {
    match reason.as_deref() {
        Some(r) if !r.is_empty() => format!(": {r}"),
        _ => String::new(),
    }
}
