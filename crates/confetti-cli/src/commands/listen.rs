//! Notifier client command.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use confetti_client::{config, ClientError, CommandAction, Session};
use tracing::debug;

#[derive(Args)]
#[command(after_help = "If no URL is provided, the url is read from the config file.")]
pub struct ListenArgs {
    /// Connect to the specified WebSocket URL instead of the configured one
    #[arg(short, long, value_name = "WEBSOCKET_URL")]
    pub url: Option<String>,
}

pub async fn execute(args: ListenArgs) -> Result<()> {
    let url = match config::resolve_endpoint(args.url.as_deref(), config::home_dir) {
        Ok(url) => url,
        Err(ClientError::ConfigCreated(path)) => {
            println!(
                "  {} Please update the url in {}",
                "Config file created.".yellow().bold(),
                path.display()
            );
            return Err(ClientError::ConfigCreated(path).into());
        }
        Err(e) => return Err(e.into()),
    };

    debug!(url = %url, "Resolved endpoint");
    let mut session = Session::new(url, Arc::new(CommandAction::default()));
    match session.run().await {
        Ok(never) => match never {},
        Err(e) => Err(e.into()),
    }
}
