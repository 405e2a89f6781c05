mod config_cmd;
mod progress;
mod read;
mod session_cmd;
mod sync_cmd;

use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;

use dailybread::config::Config;
use dailybread::store::{PersistenceGateway, ProfileStorage, SimulatedRemote};
use dailybread::sync::check_server;
use dailybread::{fetcher, BibleApiLookup, DevotionalSession};

pub use config_cmd::ConfigCommand;
pub use progress::{CompleteCommand, ProgressCommand, ThemeCommand};
pub use read::ReadCommand;
pub use session_cmd::SessionCommand;
pub use sync_cmd::SyncCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Opens a session against the configured profile record and generator.
pub async fn open_session(config: &Config) -> DevotionalSession {
    let storage = ProfileStorage::new(
        config.data_dir.value.clone(),
        config.profile_id.value.clone(),
    );
    let remote = SimulatedRemote::new(Duration::from_millis(config.remote.latency_ms));
    let gateway = PersistenceGateway::new(storage, Arc::new(remote));

    let online = is_online(config).await;
    tracing::debug!("Starting session (online: {})", online);

    DevotionalSession::new(gateway, fetcher::from_config(&config.gemini), online)
        .with_scripture(Arc::new(BibleApiLookup::from_config(&config.scripture)))
}

async fn is_online(config: &Config) -> bool {
    if config.offline {
        return false;
    }
    match &config.remote.health_url {
        Some(url) => check_server(url).await,
        None => true,
    }
}
