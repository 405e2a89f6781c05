use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{
    open_session, CompleteCommand, ConfigCommand, ProgressCommand, ReadCommand, SessionCommand,
    SyncCommand, ThemeCommand,
};
use dailybread::config::Config;

#[derive(Parser)]
#[command(name = "dailybread")]
#[command(version)]
#[command(about = "A daily devotional reader", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the devotional for a day
    Read(ReadCommand),

    /// Toggle the read mark for a day
    Complete(CompleteCommand),

    /// Show reading progress
    Progress(ProgressCommand),

    /// Set the reading theme
    Theme(ThemeCommand),

    /// Reconcile the profile with the remote copy
    Sync(SyncCommand),

    /// Start an interactive reading session
    Session(SessionCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dailybread=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    let command = match cli.command {
        Some(Commands::Config(cmd)) => return cmd.run(&config),
        Some(command) => command,
        None => {
            println!("Use --help to see available commands");
            return Ok(());
        }
    };

    let mut session = open_session(&config).await;

    let result = match command {
        Commands::Read(cmd) => cmd.run(&mut session).await,
        Commands::Complete(cmd) => {
            cmd.run(&mut session);
            Ok(())
        }
        Commands::Progress(cmd) => cmd.run(&session),
        Commands::Theme(cmd) => {
            cmd.run(&mut session);
            Ok(())
        }
        Commands::Sync(cmd) => {
            cmd.run(&mut session, &config).await;
            Ok(())
        }
        Commands::Session(cmd) => cmd.run(&mut session).await,
        Commands::Config(_) => Ok(()),
    };

    // Let outstanding mirror calls finish before exiting
    let status = session.settle().await;
    tracing::debug!("Exiting with sync status {}", status);

    result
}
