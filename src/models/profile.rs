use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::date_key::DateKey;
use super::theme::Theme;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
}

/// Days the reader has marked complete, in calendar order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default)]
    pub completed_dates: BTreeSet<DateKey>,
}

impl Progress {
    pub fn is_complete(&self, key: &DateKey) -> bool {
        self.completed_dates.contains(key)
    }

    /// Flips completion for `key` and returns the new state.
    pub fn toggle(&mut self, key: DateKey) -> bool {
        if self.completed_dates.remove(&key) {
            false
        } else {
            self.completed_dates.insert(key);
            true
        }
    }
}

/// Persisted reader preferences and progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub progress: Progress,
    #[serde(default)]
    pub last_synced: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.preferences.theme = theme;
        self
    }

    pub fn with_completed(mut self, keys: impl IntoIterator<Item = DateKey>) -> Self {
        self.progress.completed_dates.extend(keys);
        self
    }

    pub fn with_last_synced(mut self, at: DateTime<Utc>) -> Self {
        self.last_synced = Some(at);
        self
    }
}

impl fmt::Display for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Theme: {}", self.preferences.theme)?;
        match &self.last_synced {
            Some(at) => writeln!(f, "Last synced: {}", at.to_rfc3339())?,
            None => writeln!(f, "Last synced: never")?,
        }
        writeln!(
            f,
            "Completed days: {}",
            self.progress.completed_dates.len()
        )?;
        for key in &self.progress.completed_dates {
            writeln!(f, "  - {}", key)?;
        }
        Ok(())
    }
}

/// Reconciles a local and a remote snapshot.
///
/// Completed dates are unioned. The theme comes from whichever side synced
/// strictly later; ties and never-synced remotes keep the local theme.
pub fn merge(local: &UserProfile, remote: &UserProfile) -> UserProfile {
    let remote_is_newer = match (&local.last_synced, &remote.last_synced) {
        (Some(l), Some(r)) => r > l,
        (None, Some(_)) => true,
        (_, None) => false,
    };

    let preferences = if remote_is_newer {
        remote.preferences.clone()
    } else {
        local.preferences.clone()
    };

    let completed_dates = local
        .progress
        .completed_dates
        .union(&remote.progress.completed_dates)
        .copied()
        .collect();

    UserProfile {
        preferences,
        progress: Progress { completed_dates },
        last_synced: local.last_synced.max(remote.last_synced),
    }
}
