//! Sync CLI commands for reconciling the profile with its remote copy.

use clap::{Args, Subcommand};

use dailybread::config::Config;
use dailybread::{DevotionalSession, SyncStatus};

/// Reconcile the reading profile with the remote copy
#[derive(Debug, Args)]
pub struct SyncCommand {
    #[command(subcommand)]
    command: Option<SyncSubcommand>,
}

#[derive(Debug, Subcommand)]
enum SyncSubcommand {
    /// Show sync configuration and connectivity
    Status,
}

impl SyncCommand {
    pub async fn run(&self, session: &mut DevotionalSession, config: &Config) {
        match &self.command {
            None => self.sync(session).await,
            Some(SyncSubcommand::Status) => self.status(session, config),
        }
    }

    async fn sync(&self, session: &mut DevotionalSession) {
        if !session.is_online() {
            println!("Offline. Profile changes are saved locally only.");
            return;
        }

        println!("Syncing profile...");
        match session.reconcile().await {
            SyncStatus::Synced => {
                println!(
                    "Sync complete. {} day(s) marked as read.",
                    session.profile().progress.completed_dates.len()
                );
            }
            status => println!("Sync finished with status: {}", status),
        }
    }

    fn status(&self, session: &DevotionalSession, config: &Config) {
        println!("Sync Status");
        println!("===========");
        println!();
        println!("Status: {}", session.sync_status());
        match &config.remote.health_url {
            Some(url) => println!("Health check: {}", url),
            None => println!("Health check: (none, assumed online)"),
        }
        match &session.profile().last_synced {
            Some(at) => println!("Last synced: {}", at.to_rfc3339()),
            None => println!("Last synced: never"),
        }
        if config.offline {
            println!();
            println!("Offline mode is forced by configuration.");
        }
    }
}
