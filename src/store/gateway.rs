//! Persistence gateway: durable local writes plus a remote mirror.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use super::local::{ProfileStorage, StorageError};
use super::remote::{RemoteError, RemoteMirror};
use crate::models::{merge, UserProfile};

/// Error type for profile persistence.
#[derive(Debug)]
pub enum PersistenceError {
    /// Local durable write failed.
    Storage(StorageError),
    /// Remote mirror call failed.
    Remote(RemoteError),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceError::Storage(e) => write!(f, "Storage error: {}", e),
            PersistenceError::Remote(e) => write!(f, "Mirror error: {}", e),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<StorageError> for PersistenceError {
    fn from(e: StorageError) -> Self {
        PersistenceError::Storage(e)
    }
}

impl From<RemoteError> for PersistenceError {
    fn from(e: RemoteError) -> Self {
        PersistenceError::Remote(e)
    }
}

/// A profile snapshot queued for the remote mirror.
///
/// Jobs are numbered when staged; a job never overwrites the remote copy
/// written by a later one.
#[derive(Debug)]
pub struct MirrorJob {
    seq: u64,
    profile: UserProfile,
}

impl MirrorJob {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Service handle for loading and saving the reader profile.
///
/// Constructed once per session and passed to whoever owns the profile.
/// Clones share the mirror ordering state.
#[derive(Clone)]
pub struct PersistenceGateway {
    storage: ProfileStorage,
    remote: Arc<dyn RemoteMirror>,
    next_seq: Arc<AtomicU64>,
    /// Sequence number of the newest snapshot the remote holds
    mirrored: Arc<Mutex<u64>>,
}

impl PersistenceGateway {
    pub fn new(storage: ProfileStorage, remote: Arc<dyn RemoteMirror>) -> Self {
        Self {
            storage,
            remote,
            next_seq: Arc::new(AtomicU64::new(0)),
            mirrored: Arc::new(Mutex::new(0)),
        }
    }

    pub fn storage(&self) -> &ProfileStorage {
        &self.storage
    }

    fn next_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Numbers a snapshot for mirroring. Call in mutation order.
    pub fn stage_mirror(&self, profile: UserProfile) -> MirrorJob {
        MirrorJob {
            seq: self.next_seq(),
            profile,
        }
    }

    /// Pushes a staged snapshot unless a later one has already been mirrored.
    ///
    /// Mirror calls run one at a time. A superseded job succeeds without
    /// touching the remote.
    pub async fn run_mirror(&self, job: MirrorJob) -> Result<(), RemoteError> {
        let mut mirrored = self.mirrored.lock().await;
        if job.seq <= *mirrored {
            tracing::debug!(
                "Skipping mirror #{}; remote already holds #{}",
                job.seq,
                *mirrored
            );
            return Ok(());
        }
        self.remote.push(job.profile).await?;
        *mirrored = job.seq;
        Ok(())
    }

    /// Loads the local profile. Never fails; defaults stand in for bad data.
    pub fn load(&self) -> UserProfile {
        self.storage.load_profile()
    }

    /// Stamps `last_synced` and writes the profile to durable storage.
    pub fn save_local(&self, profile: &mut UserProfile) -> Result<(), StorageError> {
        profile.last_synced = Some(Utc::now());
        self.storage.write(profile)
    }

    /// Pushes a snapshot to the remote mirror.
    pub async fn mirror(&self, profile: UserProfile) -> Result<(), RemoteError> {
        let job = self.stage_mirror(profile);
        self.run_mirror(job).await
    }

    /// Local write followed by the remote mirror.
    pub async fn save(&self, profile: &mut UserProfile) -> Result<(), PersistenceError> {
        self.save_local(profile)?;
        self.mirror(profile.clone()).await?;
        Ok(())
    }

    /// Merges the remote snapshot into `local` and saves the result both ways.
    ///
    /// Holds the mirror lock from pull to push, so snapshots staged earlier
    /// cannot land on top of the merged record.
    pub async fn reconcile(&self, local: &UserProfile) -> Result<UserProfile, PersistenceError> {
        let mut mirrored = self.mirrored.lock().await;
        let seq = self.next_seq();

        let mut merged = match self.remote.pull().await? {
            Some(remote) => merge(local, &remote),
            None => local.clone(),
        };
        self.save_local(&mut merged)?;
        self.remote.push(merged.clone()).await?;
        *mirrored = seq;

        tracing::info!(
            "Reconciled profile: {} completed day(s), theme {}",
            merged.progress.completed_dates.len(),
            merged.preferences.theme
        );
        Ok(merged)
    }
}

impl std::fmt::Debug for PersistenceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceGateway")
            .field("storage", &self.storage)
            .field("next_seq", &self.next_seq.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateKey, Theme};
    use crate::store::SimulatedRemote;
    use std::time::Duration;
    use tempfile::TempDir;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn setup() -> (PersistenceGateway, SimulatedRemote, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = ProfileStorage::with_data_dir(temp_dir.path().to_path_buf());
        let remote = SimulatedRemote::new(Duration::from_millis(10));
        let gateway = PersistenceGateway::new(storage, Arc::new(remote.clone()));
        (gateway, remote, temp_dir)
    }

    #[tokio::test]
    async fn test_save_writes_local_and_remote() {
        let (gateway, remote, _temp) = setup();
        let mut profile = UserProfile::new().with_theme(Theme::Dark);

        gateway.save(&mut profile).await.unwrap();

        assert!(profile.last_synced.is_some());
        assert_eq!(gateway.load(), profile);
        assert_eq!(remote.snapshot(), Some(profile));
    }

    #[tokio::test]
    async fn test_save_remote_failure_keeps_local_write() {
        let (gateway, remote, _temp) = setup();
        remote.set_failing(true);
        let mut profile = UserProfile::new().with_completed([key("2026-01-01")]);

        let err = gateway.save(&mut profile).await.unwrap_err();

        assert!(matches!(err, PersistenceError::Remote(_)));
        assert_eq!(gateway.load(), profile);
        assert!(remote.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_load_defaults_when_missing() {
        let (gateway, _remote, _temp) = setup();
        assert_eq!(gateway.load(), UserProfile::default());
    }

    #[tokio::test]
    async fn test_reconcile_unions_with_remote() {
        let (gateway, remote, _temp) = setup();
        let remote_profile = UserProfile::new()
            .with_theme(Theme::Sepia)
            .with_completed([key("2026-01-02")])
            .with_last_synced(Utc::now() + chrono::Duration::hours(1));
        remote.push(remote_profile).await.unwrap();

        let local = UserProfile::new()
            .with_completed([key("2026-01-01")])
            .with_last_synced(Utc::now());
        let merged = gateway.reconcile(&local).await.unwrap();

        assert_eq!(merged.preferences.theme, Theme::Sepia);
        assert!(merged.progress.is_complete(&key("2026-01-01")));
        assert!(merged.progress.is_complete(&key("2026-01-02")));
        assert_eq!(gateway.load(), merged);
        assert_eq!(remote.snapshot(), Some(merged));
    }

    #[tokio::test]
    async fn test_reconcile_with_empty_remote_pushes_local() {
        let (gateway, remote, _temp) = setup();
        let local = UserProfile::new().with_completed([key("2026-01-01")]);

        let merged = gateway.reconcile(&local).await.unwrap();

        assert_eq!(merged.progress, local.progress);
        assert_eq!(remote.snapshot().map(|p| p.progress), Some(local.progress));
    }

    #[tokio::test]
    async fn test_older_job_does_not_overwrite_newer() {
        let (gateway, remote, _temp) = setup();
        let older = gateway.stage_mirror(UserProfile::new().with_theme(Theme::Dark));
        let newer = gateway.stage_mirror(UserProfile::new().with_theme(Theme::Sepia));
        assert!(older.seq() < newer.seq());

        gateway.run_mirror(newer).await.unwrap();
        gateway.run_mirror(older).await.unwrap();

        assert_eq!(
            remote.snapshot().map(|p| p.preferences.theme),
            Some(Theme::Sepia)
        );
        assert_eq!(remote.push_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_job_does_not_block_later_retry() {
        let (gateway, remote, _temp) = setup();
        remote.set_failing(true);
        let first = gateway.stage_mirror(UserProfile::new().with_theme(Theme::Dark));
        assert!(gateway.run_mirror(first).await.is_err());

        remote.set_failing(false);
        gateway
            .mirror(UserProfile::new().with_theme(Theme::Sepia))
            .await
            .unwrap();
        assert_eq!(
            remote.snapshot().map(|p| p.preferences.theme),
            Some(Theme::Sepia)
        );
    }

    #[tokio::test]
    async fn test_job_staged_before_reconcile_is_superseded() {
        let (gateway, remote, _temp) = setup();
        remote
            .push(UserProfile::new().with_completed([key("2025-12-25")]))
            .await
            .unwrap();

        let local = UserProfile::new().with_completed([key("2026-01-01")]);
        let stale = gateway.stage_mirror(local.clone());
        let merged = gateway.reconcile(&local).await.unwrap();

        gateway.run_mirror(stale).await.unwrap();

        assert_eq!(remote.snapshot(), Some(merged));
        let kept = remote.snapshot().unwrap().progress;
        assert!(kept.is_complete(&key("2025-12-25")));
        assert!(kept.is_complete(&key("2026-01-01")));
    }
}
