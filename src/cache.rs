//! Session-scoped store of devotional content keyed by day.
//!
//! Entries are created when a day's reading is first fetched and live until
//! the process exits. There is no eviction.

use std::collections::BTreeMap;

use crate::models::{DateKey, DevotionalContent, DevotionalPatch};

/// In-memory content cache, iterated in calendar order.
#[derive(Debug, Clone, Default)]
pub struct ContentCache {
    entries: BTreeMap<DateKey, DevotionalContent>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &DateKey) -> Option<&DevotionalContent> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &DateKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Stores `content` under `key`, replacing any previous record.
    pub fn put(&mut self, key: DateKey, content: DevotionalContent) {
        self.entries.insert(key, content);
    }

    /// Applies a user edit to an existing record and returns the result.
    pub fn update(
        &mut self,
        key: &DateKey,
        patch: &DevotionalPatch,
    ) -> Result<DevotionalContent, CacheError> {
        let entry = self
            .entries
            .get_mut(key)
            .ok_or(CacheError::NotCached(*key))?;
        patch.apply(entry);
        Ok(entry.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (&DateKey, &DevotionalContent)> {
        self.entries.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CacheError {
    /// No record exists for the day
    NotCached(DateKey),
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::NotCached(key) => write!(f, "No devotional cached for {}", key),
        }
    }
}

impl std::error::Error for CacheError {}
