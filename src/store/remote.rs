//! Remote mirror of the reader profile.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;

use crate::models::UserProfile;

/// Default round-trip latency of the simulated remote.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

/// Remote copy of the profile.
pub trait RemoteMirror: Send + Sync {
    fn push(&self, profile: UserProfile) -> BoxFuture<'_, Result<(), RemoteError>>;
    fn pull(&self) -> BoxFuture<'_, Result<Option<UserProfile>, RemoteError>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteError {
    /// Remote could not be reached or refused the call
    Unavailable(String),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::Unavailable(e) => write!(f, "Remote unavailable: {}", e),
        }
    }
}

impl std::error::Error for RemoteError {}

/// In-process stand-in for a remote store with a fixed latency.
///
/// Clones share the same record, so a test can keep a handle while the
/// session owns another.
#[derive(Debug, Clone)]
pub struct SimulatedRemote {
    record: Arc<Mutex<Option<UserProfile>>>,
    latency: Duration,
    failing: Arc<AtomicBool>,
    pushes: Arc<AtomicUsize>,
}

impl SimulatedRemote {
    pub fn new(latency: Duration) -> Self {
        Self {
            record: Arc::new(Mutex::new(None)),
            latency,
            failing: Arc::new(AtomicBool::new(false)),
            pushes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_record(self, profile: UserProfile) -> Self {
        self.replace(Some(profile));
        self
    }

    /// Makes every subsequent call fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful pushes so far.
    pub fn push_count(&self) -> usize {
        self.pushes.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Option<UserProfile> {
        self.record.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn replace(&self, profile: Option<UserProfile>) {
        if let Ok(mut record) = self.record.lock() {
            *record = profile;
        }
    }

    async fn round_trip(&self) -> Result<(), RemoteError> {
        tokio::time::sleep(self.latency).await;
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable(
                "simulated remote is failing".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SimulatedRemote {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY)
    }
}

impl RemoteMirror for SimulatedRemote {
    fn push(&self, profile: UserProfile) -> BoxFuture<'_, Result<(), RemoteError>> {
        Box::pin(async move {
            self.round_trip().await?;
            self.replace(Some(profile));
            self.pushes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn pull(&self) -> BoxFuture<'_, Result<Option<UserProfile>, RemoteError>> {
        Box::pin(async move {
            self.round_trip().await?;
            Ok(self.snapshot())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Theme;

    #[tokio::test(start_paused = true)]
    async fn test_push_then_pull() {
        let remote = SimulatedRemote::default();
        assert!(remote.pull().await.unwrap().is_none());

        let profile = UserProfile::new().with_theme(Theme::Dark);
        remote.push(profile.clone()).await.unwrap();

        assert_eq!(remote.pull().await.unwrap(), Some(profile));
        assert_eq!(remote.push_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let remote = SimulatedRemote::new(Duration::from_millis(250));
        let start = tokio::time::Instant::now();
        remote.push(UserProfile::default()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_mode() {
        let remote = SimulatedRemote::default();
        remote.set_failing(true);

        assert!(remote.push(UserProfile::default()).await.is_err());
        assert!(remote.pull().await.is_err());
        assert_eq!(remote.push_count(), 0);
        assert!(remote.snapshot().is_none());

        remote.set_failing(false);
        assert!(remote.push(UserProfile::default()).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_record() {
        let remote = SimulatedRemote::default();
        let handle = remote.clone();
        remote
            .push(UserProfile::new().with_theme(Theme::Sepia))
            .await
            .unwrap();

        assert_eq!(
            handle.snapshot().map(|p| p.preferences.theme),
            Some(Theme::Sepia)
        );
    }
}
