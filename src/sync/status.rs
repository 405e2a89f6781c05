use serde::Serialize;
use std::fmt;

/// Observed health of profile persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Synced,
    Syncing,
    Offline,
    Error,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Synced => write!(f, "synced"),
            SyncStatus::Syncing => write!(f, "syncing"),
            SyncStatus::Offline => write!(f, "offline"),
            SyncStatus::Error => write!(f, "error"),
        }
    }
}

/// Tracks [`SyncStatus`] from connectivity events and mirror outcomes.
///
/// Purely observational: it never blocks or queues a write.
#[derive(Debug, Clone)]
pub struct SyncStatusMachine {
    status: SyncStatus,
    online: bool,
    pending: usize,
}

impl SyncStatusMachine {
    pub fn new(online: bool) -> Self {
        Self {
            status: if online {
                SyncStatus::Synced
            } else {
                SyncStatus::Offline
            },
            online,
            pending: 0,
        }
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Mirror calls started but not yet resolved.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Records a persistence attempt whose local write has completed.
    ///
    /// Returns true if the remote mirror should be attempted.
    pub fn save_started(&mut self) -> bool {
        if self.online {
            self.pending += 1;
            self.transition(SyncStatus::Syncing);
            true
        } else {
            self.transition(SyncStatus::Offline);
            false
        }
    }

    pub fn mirror_succeeded(&mut self) {
        self.pending = self.pending.saturating_sub(1);
        if !self.online {
            return;
        }
        if self.pending == 0 {
            self.transition(SyncStatus::Synced);
        } else {
            self.transition(SyncStatus::Syncing);
        }
    }

    pub fn mirror_failed(&mut self) {
        self.pending = self.pending.saturating_sub(1);
        if self.online {
            self.transition(SyncStatus::Error);
        }
    }

    /// The durable local write itself failed; no mirror is attempted.
    pub fn local_write_failed(&mut self) {
        self.transition(SyncStatus::Error);
    }

    pub fn connectivity_lost(&mut self) {
        self.online = false;
        self.transition(SyncStatus::Offline);
    }

    /// Leaves offline; an existing error is not cleared by this alone.
    pub fn connectivity_restored(&mut self) {
        self.online = true;
        if self.status == SyncStatus::Offline {
            if self.pending == 0 {
                self.transition(SyncStatus::Synced);
            } else {
                self.transition(SyncStatus::Syncing);
            }
        }
    }

    fn transition(&mut self, next: SyncStatus) {
        if self.status != next {
            tracing::debug!("Sync status {} -> {}", self.status, next);
            self.status = next;
        }
    }
}
