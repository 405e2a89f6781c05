//! History search over the days already read this session.

use crate::cache::ContentCache;
use crate::models::DevotionalContent;

/// Case-insensitive substring search over cached readings.
///
/// A blank query matches nothing. Results come back in ascending date order.
pub fn search<'a>(query: &str, cache: &'a ContentCache) -> Vec<&'a DevotionalContent> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    cache
        .iter()
        .map(|(_, content)| content)
        .filter(|content| matches(content, &needle))
        .collect()
}

fn matches(content: &DevotionalContent, needle: &str) -> bool {
    [
        content.passage_reference.as_str(),
        content.effective_passage_text(),
        content.reflection.as_str(),
        content.morning_prayer.as_str(),
        content.evening_prayer.as_str(),
        content.related_verse_reference.as_str(),
        content.effective_related_verse_text(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}
