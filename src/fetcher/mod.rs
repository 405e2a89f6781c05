//! Content generation boundary.
//!
//! A [`ContentFetcher`] turns a calendar day into a validated
//! [`GeneratedDevotional`]. Anything short of a complete record is a
//! [`FetchError`]; callers never see partial content.

mod error;
pub mod gemini;
mod prompt;

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::config::GeminiConfig;
use crate::models::{DateKey, GeneratedDevotional};

pub use error::FetchError;
pub use gemini::GeminiFetcher;
pub use prompt::{build_prompt, response_schema};

/// Source of generated devotional content.
pub trait ContentFetcher: Send + Sync {
    fn fetch(&self, date: DateKey) -> BoxFuture<'_, Result<GeneratedDevotional, FetchError>>;
}

/// Stand-in used when no generator is configured. Every fetch fails with
/// [`FetchError::NotConfigured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredFetcher;

impl ContentFetcher for UnconfiguredFetcher {
    fn fetch(&self, _date: DateKey) -> BoxFuture<'_, Result<GeneratedDevotional, FetchError>> {
        Box::pin(async { Err(FetchError::NotConfigured) })
    }
}

/// Builds the configured fetcher, falling back to [`UnconfiguredFetcher`]
/// when no API key is set.
pub fn from_config(config: &GeminiConfig) -> Arc<dyn ContentFetcher> {
    match GeminiFetcher::from_config(config) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(e) => {
            tracing::debug!("{}", e);
            Arc::new(UnconfiguredFetcher)
        }
    }
}

/// Parses and validates a generator payload.
///
/// Accepts the JSON object bare or wrapped in a markdown code fence. Prayers
/// missing their closing sentence get it appended.
pub fn parse_payload(text: &str) -> Result<GeneratedDevotional, FetchError> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Err(FetchError::EmptyResponse);
    }

    let generated: GeneratedDevotional =
        serde_json::from_str(body).map_err(|e| FetchError::MalformedPayload(e.to_string()))?;

    let blank = generated.blank_fields();
    if !blank.is_empty() {
        return Err(FetchError::MalformedPayload(format!(
            "blank fields: {}",
            blank.join(", ")
        )));
    }

    Ok(generated.with_prayer_closings())
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
