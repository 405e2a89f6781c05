//! Best-effort scripture text lookup.
//!
//! Lookups never fail loudly: any problem is logged and reported as "no text".

use futures::future::BoxFuture;
use serde::Deserialize;

use crate::config::ScriptureConfig;

pub const DEFAULT_BASE_URL: &str = "https://bible-api.com";
pub const DEFAULT_TRANSLATION: &str = "kjv";

/// Source of plain scripture text for a reference like `John 3:16`.
pub trait ScriptureLookup: Send + Sync {
    fn lookup<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, Option<String>>;
}

#[derive(Debug, Deserialize)]
struct PassageResponse {
    text: Option<String>,
}

/// Lookup backed by a bible-api.com compatible service.
#[derive(Debug, Clone)]
pub struct BibleApiLookup {
    client: reqwest::Client,
    base_url: String,
    translation: String,
}

impl BibleApiLookup {
    pub fn new(base_url: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            translation: translation.into(),
        }
    }

    pub fn from_config(config: &ScriptureConfig) -> Self {
        Self::new(config.base_url.clone(), config.translation.clone())
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn url(&self, reference: &str) -> String {
        format!(
            "{}/{}?translation={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(reference.trim()),
            urlencoding::encode(&self.translation)
        )
    }

    async fn request(&self, reference: &str) -> Result<Option<String>, reqwest::Error> {
        let response = self
            .client
            .get(self.url(reference))
            .send()
            .await?
            .error_for_status()?;
        let passage: PassageResponse = response.json().await?;
        Ok(passage
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()))
    }
}

impl Default for BibleApiLookup {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TRANSLATION)
    }
}

impl ScriptureLookup for BibleApiLookup {
    fn lookup<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, Option<String>> {
        Box::pin(async move {
            if reference.trim().is_empty() {
                return None;
            }
            match self.request(reference).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!("Scripture lookup for '{}' failed: {}", reference, e);
                    None
                }
            }
        })
    }
}
