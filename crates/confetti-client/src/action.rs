//! Local side effect fired for every marker message.

use std::process::Stdio;

use tokio::process::Command;
use tracing::{info, warn};

/// Something to do when confetti arrives.
///
/// `fire` is a one-way dispatch: implementations must not block and
/// callers never observe an outcome.
pub trait ConfettiAction: Send + Sync {
    fn fire(&self);
}

/// Default program and arguments: Raycast's confetti deeplink.
pub const DEFAULT_PROGRAM: &str = "open";
pub const DEFAULT_ARGS: &[&str] = &["raycast://confetti"];

/// Spawns an external command with inherited stdio and does not wait for it.
#[derive(Debug, Clone)]
pub struct CommandAction {
    program: String,
    args: Vec<String>,
}

impl CommandAction {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for CommandAction {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM, DEFAULT_ARGS.iter().copied())
    }
}

impl ConfettiAction for CommandAction {
    fn fire(&self) {
        let spawned = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn();

        match spawned {
            // The child is detached; the runtime reaps it.
            Ok(_child) => info!(program = %self.program, "Sent confetti"),
            Err(e) => warn!(program = %self.program, error = %e, "Failed to launch confetti command"),
        }
    }
}
