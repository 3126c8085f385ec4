//! Confetti Notifier Client
//!
//! Holds one WebSocket connection to the notifier server and fires a local
//! action whenever the marker message arrives.

pub mod action;
pub mod config;
pub mod error;
pub mod session;

pub use action::{CommandAction, ConfettiAction};
pub use error::{ClientError, ClientResult};
pub use session::{Session, SessionState};
