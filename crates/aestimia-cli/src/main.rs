//! # aestimia CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler functions.

use aestimia_cli::commands;
use aestimia_client::{AestimiaClient, AestimiaConfig};
use clap::Parser;

/// Aestimia client CLI — badge review submissions from the command line.
#[derive(Parser, Debug)]
#[command(name = "aestimia", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Submit an application for review.
    Submit(commands::SubmitArgs),
    /// Evaluate the latest review of a submission.
    Status(commands::StatusArgs),
    /// Acknowledge a review.
    Process(commands::ProcessArgs),
    /// Serve the review webhook.
    Serve(commands::ServeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = AestimiaConfig::from_env()?;
    tracing::debug!(?config, "Aestimia client configured");
    let client = AestimiaClient::new(config)?;

    match cli.command {
        Commands::Submit(args) => commands::submit(&client, &args).await,
        Commands::Status(args) => commands::status(&client, &args).await,
        Commands::Process(args) => commands::process(&client, &args).await,
        Commands::Serve(args) => commands::serve(client, &args).await,
    }
}
