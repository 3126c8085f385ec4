//! Confetti Core Library
//!
//! Marker message, webhook payload model, transition filter and
//! signature verification shared by the server and client.

pub mod error;
pub mod webhook;

pub use error::{ConfettiError, ConfettiResult};

/// Text frame broadcast to every open client when an issue is completed.
pub const MARKER_MESSAGE: &str = "confetti";
