//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod listen;
pub mod serve;

/// Confetti - celebrate completed Linear issues on every connected desktop
#[derive(Parser)]
#[command(name = "confetti")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the notifier server (webhook + WebSocket)
    Serve(serve::ServeArgs),

    /// Connect to a notifier server and fire confetti on completion
    Listen(listen::ListenArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::execute(args).await,
            Commands::Listen(args) => listen::execute(args).await,
        }
    }
}
