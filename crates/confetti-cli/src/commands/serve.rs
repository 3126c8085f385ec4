//! Notifier server command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use confetti_web::ServerConfig;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Shared secret used to verify Linear webhook signatures
    #[arg(long, env = "LINEAR_WEBHOOK_SECRET", hide_env_values = true)]
    pub webhook_secret: String,

    /// Allowed clock drift for webhook timestamps, in seconds
    #[arg(long, env = "WEBHOOK_TOLERANCE_SECS", default_value = "60")]
    pub webhook_tolerance_secs: u64,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    println!();
    println!("  {} {}", "Confetti".magenta().bold(), "Notifier Server".bold());
    println!();
    println!("  {}    http://{}:{}/confetti", "Webhook".green(), args.host, args.port);
    println!("  {}    http://{}:{}/trigger", "Trigger".green(), args.host, args.port);
    println!("  {}  ws://{}:{}/ws", "WebSocket".green(), args.host, args.port);
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    confetti_web::run_server(ServerConfig {
        host: args.host,
        port: args.port,
        webhook_secret: args.webhook_secret,
        webhook_tolerance: Duration::from_secs(args.webhook_tolerance_secs),
    })
    .await
}
