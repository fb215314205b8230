mod app;
mod commands;
mod config;
mod executor;
mod logging;
mod reconcile;
mod row;
#[cfg(test)]
mod testing;
mod tui;
mod ui;
mod view;

use std::sync::Arc;

use clap::Parser;
use triage_sdk::TriageClient;

use crate::commands::Commands;
use crate::config::{AppConfig, ConfigOverrides};

#[derive(Parser, Debug)]
#[command(name = "triage")]
#[command(about = "Support ticket triage dashboard")]
#[command(author, version, long_about = None)]
struct Cli {
    #[command(flatten)]
    overrides: ConfigOverrides,

    /// Without a subcommand the interactive dashboard starts.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env().with_overrides(cli.overrides);

    let client = match config.request_timeout {
        Some(timeout) => TriageClient::with_timeout(&config.backend_url, timeout)?,
        None => TriageClient::new(&config.backend_url)?,
    };

    match cli.command {
        None | Some(Commands::Tui) => {
            logging::init_file(&config.log_file)?;
            let location = app::run(&config, Arc::new(client)).await?;
            println!("Resume with: triage --location '{location}'");
        }
        Some(command) => {
            logging::init_stderr();
            commands::run(command, &client).await?;
        }
    }
    Ok(())
}
