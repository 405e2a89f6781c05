//! Reading session orchestration.
//!
//! A [`DevotionalSession`] is the single owner of the content cache and the
//! reader profile for one run of the application. It drives:
//!
//! - **Day selection**: cache hits display immediately; misses hand out a
//!   [`FetchTicket`] and move to `loading`.
//! - **Stale responses**: every selection bumps an epoch. A fetch result is
//!   always cached under its own day but only displayed when its day is still
//!   the selection it was last adopted by.
//! - **Profile persistence**: every theme or completion change is written
//!   locally at once and mirrored remotely in a detached task whose outcome
//!   feeds the [`SyncStatusMachine`].
//!
//! Profile mutations spawn onto the ambient tokio runtime and must be called
//! from within one.

mod error;
mod selection;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::{JoinError, JoinSet};

use crate::cache::ContentCache;
use crate::fetcher::{ContentFetcher, FetchError};
use crate::models::{
    DateKey, DevotionalContent, DevotionalPatch, GeneratedDevotional, Theme, UserProfile,
};
use crate::scripture::ScriptureLookup;
use crate::search::search;
use crate::store::{PersistenceGateway, RemoteError};
use crate::sync::{SyncStatus, SyncStatusMachine};

pub use error::SessionError;
pub use selection::{FetchOutcome, FetchTicket, LoadState, Selection};

type MirrorOutcome = Result<(), RemoteError>;

pub struct DevotionalSession {
    cache: ContentCache,
    profile: UserProfile,
    gateway: PersistenceGateway,
    fetcher: Arc<dyn ContentFetcher>,
    scripture: Option<Arc<dyn ScriptureLookup>>,
    sync: SyncStatusMachine,
    selected: Option<DateKey>,
    displayed: Option<DevotionalContent>,
    state: LoadState,
    epoch: u64,
    /// Day -> epoch of the latest selection waiting on that day's fetch
    in_flight: HashMap<DateKey, u64>,
    /// Detached mirror calls; aborted if the session is dropped unsettled
    mirrors: JoinSet<MirrorOutcome>,
}

impl DevotionalSession {
    /// Starts a session, loading the stored profile (defaults on failure).
    pub fn new(
        gateway: PersistenceGateway,
        fetcher: Arc<dyn ContentFetcher>,
        online: bool,
    ) -> Self {
        let profile = gateway.load();
        Self {
            cache: ContentCache::new(),
            profile,
            gateway,
            fetcher,
            scripture: None,
            sync: SyncStatusMachine::new(online),
            selected: None,
            displayed: None,
            state: LoadState::Idle,
            epoch: 0,
            in_flight: HashMap::new(),
            mirrors: JoinSet::new(),
        }
    }

    pub fn with_scripture(mut self, scripture: Arc<dyn ScriptureLookup>) -> Self {
        self.scripture = Some(scripture);
        self
    }

    // ==================== Accessors ====================

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn selected(&self) -> Option<DateKey> {
        self.selected
    }

    pub fn displayed(&self) -> Option<&DevotionalContent> {
        self.displayed.as_ref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_in_flight(&self, key: &DateKey) -> bool {
        self.in_flight.contains_key(key)
    }

    /// Handle to the content fetcher, for running a ticket's fetch.
    pub fn fetcher(&self) -> Arc<dyn ContentFetcher> {
        Arc::clone(&self.fetcher)
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.sync.status()
    }

    pub fn is_online(&self) -> bool {
        self.sync.is_online()
    }

    // ==================== Day selection ====================

    /// Selects a day for display.
    pub fn select(&mut self, key: DateKey) -> Selection {
        self.epoch += 1;
        self.selected = Some(key);

        if let Some(content) = self.cache.get(&key) {
            let content = content.clone();
            self.displayed = Some(content.clone());
            self.state = LoadState::Success;
            return Selection::Cached(content);
        }

        self.displayed = None;
        self.state = LoadState::Loading;

        if let Some(adopted) = self.in_flight.get_mut(&key) {
            *adopted = self.epoch;
            return Selection::InFlight;
        }

        tracing::debug!("Fetching devotional for {} (epoch {})", key, self.epoch);
        self.in_flight.insert(key, self.epoch);
        Selection::Fetch(FetchTicket {
            key,
            epoch: self.epoch,
        })
    }

    /// Applies the result of a ticket's fetch.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<GeneratedDevotional, FetchError>,
    ) -> FetchOutcome {
        let key = ticket.key;
        let adopted_epoch = self.in_flight.remove(&key);
        let is_current = adopted_epoch == Some(self.epoch) && self.selected == Some(key);

        match result {
            Ok(generated) => {
                let content = generated.into_content(key);
                self.cache.put(key, content.clone());
                if is_current {
                    self.displayed = Some(content);
                    self.state = LoadState::Success;
                    FetchOutcome::Displayed
                } else {
                    tracing::debug!(
                        "Fetch for {} (epoch {}) resolved after selection moved on",
                        key,
                        ticket.epoch
                    );
                    FetchOutcome::CachedOnly
                }
            }
            Err(e) => {
                if is_current {
                    tracing::warn!("Failed to load devotional for {}: {}", key, e);
                    self.state = LoadState::Error(e);
                    FetchOutcome::Failed
                } else {
                    tracing::debug!("Ignoring stale fetch failure for {}: {}", key, e);
                    FetchOutcome::Ignored
                }
            }
        }
    }

    /// Selects a day and, on a miss, fetches it before returning.
    pub async fn load_content(&mut self, key: DateKey) -> Result<DevotionalContent, SessionError> {
        if let Selection::Fetch(ticket) = self.select(key) {
            let fetcher = self.fetcher();
            let result = fetcher.fetch(ticket.key()).await;
            self.complete(ticket, result);
        }
        self.current_content()
    }

    /// Re-issues the fetch for the selected day after an error.
    pub async fn retry(&mut self) -> Result<DevotionalContent, SessionError> {
        let failed = match (&self.state, self.selected) {
            (LoadState::Error(_), Some(key)) => Some(key),
            _ => None,
        };
        match failed {
            Some(key) => self.load_content(key).await,
            None => self.current_content(),
        }
    }

    fn current_content(&self) -> Result<DevotionalContent, SessionError> {
        match (&self.state, &self.displayed, self.selected) {
            (LoadState::Success, Some(content), _) => Ok(content.clone()),
            (LoadState::Error(e), _, _) => Err(SessionError::Fetch(e.clone())),
            (LoadState::Loading, _, Some(key)) => Err(SessionError::StillLoading(key)),
            _ => Err(SessionError::NothingSelected),
        }
    }

    // ==================== Edits ====================

    /// Edits a cached day. Never triggers a fetch.
    pub fn update(
        &mut self,
        key: &DateKey,
        patch: &DevotionalPatch,
    ) -> Result<DevotionalContent, SessionError> {
        let updated = self.cache.update(key, patch)?;
        if self.selected == Some(*key) && self.state == LoadState::Success {
            self.displayed = Some(updated.clone());
        }
        Ok(updated)
    }

    /// Edits the displayed day.
    pub fn edit(&mut self, patch: &DevotionalPatch) -> Result<DevotionalContent, SessionError> {
        let key = match (&self.state, self.selected) {
            (LoadState::Success, Some(key)) => key,
            _ => return Err(SessionError::NothingSelected),
        };
        self.update(&key, patch)
    }

    /// Searches the days read so far this session.
    pub fn search(&self, query: &str) -> Vec<&DevotionalContent> {
        search(query, &self.cache)
    }

    // ==================== Scripture ====================

    pub async fn lookup_passage(&self) -> Option<String> {
        let reference = self.displayed.as_ref()?.passage_reference.clone();
        self.lookup(&reference).await
    }

    pub async fn lookup_related_verse(&self) -> Option<String> {
        let reference = self.displayed.as_ref()?.related_verse_reference.clone();
        self.lookup(&reference).await
    }

    async fn lookup(&self, reference: &str) -> Option<String> {
        let scripture = self.scripture.as_ref()?;
        scripture.lookup(reference).await
    }

    // ==================== Profile ====================

    /// Flips completion for a day and returns the new state.
    pub fn toggle_completion(&mut self, key: DateKey) -> bool {
        let complete = self.profile.progress.toggle(key);
        self.persist();
        complete
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.profile.preferences.theme = theme;
        self.persist();
    }

    fn persist(&mut self) {
        if let Err(e) = self.gateway.save_local(&mut self.profile) {
            tracing::error!("Failed to save profile: {}", e);
            self.sync.local_write_failed();
            return;
        }

        if !self.sync.save_started() {
            tracing::debug!("Offline; profile saved locally only");
            return;
        }

        // Jobs are numbered in mutation order.
        let job = self.gateway.stage_mirror(self.profile.clone());
        let gateway = self.gateway.clone();
        self.mirrors.spawn(async move { gateway.run_mirror(job).await });
    }

    fn apply_mirror_outcome(&mut self, joined: Result<MirrorOutcome, JoinError>) {
        match joined {
            Ok(Ok(())) => self.sync.mirror_succeeded(),
            Ok(Err(e)) => {
                tracing::warn!("Profile mirror failed: {}", e);
                self.sync.mirror_failed();
            }
            Err(e) => {
                tracing::error!("Profile mirror task did not finish: {}", e);
                self.sync.mirror_failed();
            }
        }
    }

    /// Applies mirror outcomes that have already arrived.
    pub fn pump(&mut self) -> SyncStatus {
        while let Some(joined) = self.mirrors.try_join_next() {
            self.apply_mirror_outcome(joined);
        }
        self.sync.status()
    }

    /// Waits for every outstanding mirror call to resolve.
    pub async fn settle(&mut self) -> SyncStatus {
        while let Some(joined) = self.mirrors.join_next().await {
            self.apply_mirror_outcome(joined);
        }
        self.sync.status()
    }

    /// Pulls the remote profile, merges it in and saves the result.
    pub async fn reconcile(&mut self) -> SyncStatus {
        if !self.sync.save_started() {
            return self.sync.status();
        }
        match self.gateway.reconcile(&self.profile).await {
            Ok(merged) => {
                self.profile = merged;
                self.sync.mirror_succeeded();
            }
            Err(e) => {
                tracing::warn!("Profile reconcile failed: {}", e);
                self.sync.mirror_failed();
            }
        }
        self.sync.status()
    }

    // ==================== Connectivity ====================

    pub fn set_online(&mut self, online: bool) {
        match (self.sync.is_online(), online) {
            (true, false) => self.sync.connectivity_lost(),
            (false, true) => self.sync.connectivity_restored(),
            _ => {}
        }
    }
}

impl std::fmt::Debug for DevotionalSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevotionalSession")
            .field("selected", &self.selected)
            .field("state", &self.state)
            .field("epoch", &self.epoch)
            .field("cached", &self.cache.len())
            .field("sync", &self.sync.status())
            .finish_non_exhaustive()
    }
}
