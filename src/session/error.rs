use crate::cache::CacheError;
use crate::fetcher::FetchError;
use crate::models::DateKey;

/// Error type for session operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// No devotional is currently displayed.
    NothingSelected,
    /// The day's content is still being fetched.
    StillLoading(DateKey),
    /// Content generation failed.
    Fetch(FetchError),
    /// Edit targeted a day not in the cache.
    Cache(CacheError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::NothingSelected => write!(f, "No devotional is open"),
            SessionError::StillLoading(key) => write!(f, "Devotional for {} is still loading", key),
            SessionError::Fetch(e) => write!(f, "{}", e),
            SessionError::Cache(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<FetchError> for SessionError {
    fn from(e: FetchError) -> Self {
        SessionError::Fetch(e)
    }
}

impl From<CacheError> for SessionError {
    fn from(e: CacheError) -> Self {
        SessionError::Cache(e)
    }
}
