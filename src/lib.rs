//! Daily Bread
//!
//! Core of a daily devotional reader: day keys, the session content cache,
//! fetch orchestration, the reading profile and its sync status.

pub mod cache;
pub mod config;
pub mod fetcher;
pub mod models;
pub mod scripture;
pub mod search;
pub mod session;
pub mod store;
pub mod sync;

#[cfg(test)]
mod test_support;

pub use cache::{CacheError, ContentCache};
pub use config::{Config, ConfigError};
pub use fetcher::{ContentFetcher, FetchError, GeminiFetcher};
pub use models::{
    merge, DateKey, DateKeyError, DevotionalContent, DevotionalField, DevotionalPatch,
    GeneratedDevotional, Theme, UserProfile,
};
pub use scripture::{BibleApiLookup, ScriptureLookup};
pub use session::{
    DevotionalSession, FetchOutcome, FetchTicket, LoadState, Selection, SessionError,
};
pub use store::{PersistenceGateway, ProfileStorage, RemoteMirror, SimulatedRemote};
pub use sync::{check_server, SyncStatus, SyncStatusMachine};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
