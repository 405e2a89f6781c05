use std::fmt;

use crate::fetcher::FetchError;
use crate::models::{DateKey, DevotionalContent};

/// Load state of the currently selected day.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Success,
    Error(FetchError),
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::Idle => write!(f, "idle"),
            LoadState::Loading => write!(f, "loading"),
            LoadState::Success => write!(f, "success"),
            LoadState::Error(e) => write!(f, "error: {}", e),
        }
    }
}

/// Result of selecting a day.
#[derive(Debug)]
pub enum Selection {
    /// Served from the cache; no fetch needed.
    Cached(DevotionalContent),
    /// Cache miss; the caller runs the fetch and hands the result back.
    Fetch(FetchTicket),
    /// Cache miss with a fetch for this day already running.
    InFlight,
}

/// Claim on one outstanding fetch.
///
/// Not `Clone`: each fetch completes exactly once.
#[derive(Debug)]
pub struct FetchTicket {
    pub(super) key: DateKey,
    pub(super) epoch: u64,
}

impl FetchTicket {
    pub fn key(&self) -> DateKey {
        self.key
    }

    /// Selection epoch that issued the fetch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// What a completed fetch did to session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Cached and shown; the day is still selected.
    Displayed,
    /// Cached only; another day has been selected since.
    CachedOnly,
    /// Failed for the selected day; state is now error.
    Failed,
    /// Failed for a day no longer selected; nothing changed.
    Ignored,
}
