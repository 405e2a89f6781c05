//! Devotional generation through the Gemini `generateContent` API.

use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::json;

use super::error::FetchError;
use super::prompt::{build_prompt, response_schema};
use super::{parse_payload, ContentFetcher};
use crate::config::GeminiConfig;
use crate::models::{DateKey, GeneratedDevotional};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, with its parts joined.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// HTTP client for the Gemini content generator.
#[derive(Debug, Clone)]
pub struct GeminiFetcher {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiFetcher {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Creates a fetcher from config.
    ///
    /// Returns an error if no API key is configured.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, FetchError> {
        let api_key = config.api_key.clone().ok_or(FetchError::NotConfigured)?;
        Ok(Self::new(api_key)
            .with_model(config.model.clone())
            .with_base_url(config.base_url.clone()))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            urlencoding::encode(&self.api_key)
        )
    }

    fn request_body(date: &DateKey) -> serde_json::Value {
        json!({
            "contents": [{
                "parts": [{ "text": build_prompt(&date.descriptor()) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            }
        })
    }

    async fn generate(&self, date: DateKey) -> Result<GeneratedDevotional, FetchError> {
        tracing::debug!("Requesting devotional for {}", date);

        let response = self
            .client
            .post(self.endpoint())
            .json(&Self::request_body(&date))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Http(format!(
                "Generator returned status {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| FetchError::MalformedPayload(e.to_string()))?;

        let text = body.into_text().ok_or(FetchError::EmptyResponse)?;
        parse_payload(&text)
    }
}

impl ContentFetcher for GeminiFetcher {
    fn fetch(&self, date: DateKey) -> BoxFuture<'_, Result<GeneratedDevotional, FetchError>> {
        Box::pin(self.generate(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;
    use crate::test_support::{direct_client, serve_once};

    fn gemini_body(text: &str) -> String {
        json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
        .to_string()
    }

    fn key() -> DateKey {
        "2026-01-01".parse().unwrap()
    }

    #[test]
    fn test_endpoint() {
        let fetcher = GeminiFetcher::new("secret").with_base_url("http://localhost:9000/");
        assert_eq!(
            fetcher.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent?key=secret"
        );
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = GeminiConfig::default();
        assert!(matches!(
            GeminiFetcher::from_config(&config),
            Err(FetchError::NotConfigured)
        ));
    }

    #[test]
    fn test_request_body_carries_schema_and_descriptor() {
        let body = GeminiFetcher::request_body(&key());
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Thursday, January 1, 2026"));
    }

    #[test]
    fn test_into_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] } }]
        }))
        .unwrap();
        assert_eq!(response.into_text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_into_text_empty() {
        let response: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.into_text().is_none());

        let response: GenerateResponse =
            serde_json::from_value(json!({ "candidates": [{ "content": { "parts": [] } }] }))
                .unwrap();
        assert!(response.into_text().is_none());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let payload = serde_json::to_string(&fixtures::generated("a")).unwrap();
        let (url, server) = serve_once(200, gemini_body(&payload)).await;
        let fetcher = GeminiFetcher::new("k")
            .with_base_url(url)
            .with_client(direct_client());

        let generated = fetcher.fetch(key()).await.unwrap();
        assert_eq!(generated, fixtures::generated("a"));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1beta/models/gemini-2.5-flash:generateContent?key=k"));
        assert!(request.contains("responseSchema"));
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let (url, _server) = serve_once(500, "{}").await;
        let fetcher = GeminiFetcher::new("k")
            .with_base_url(url)
            .with_client(direct_client());

        let err = fetcher.fetch(key()).await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }

    #[tokio::test]
    async fn test_fetch_empty_candidates() {
        let (url, _server) = serve_once(200, r#"{"candidates": []}"#).await;
        let fetcher = GeminiFetcher::new("k")
            .with_base_url(url)
            .with_client(direct_client());

        assert_eq!(
            fetcher.fetch(key()).await.unwrap_err(),
            FetchError::EmptyResponse
        );
    }

    #[tokio::test]
    async fn test_fetch_malformed_text() {
        let (url, _server) = serve_once(200, gemini_body("not json")).await;
        let fetcher = GeminiFetcher::new("k")
            .with_base_url(url)
            .with_client(direct_client());

        assert!(matches!(
            fetcher.fetch(key()).await.unwrap_err(),
            FetchError::MalformedPayload(_)
        ));
    }
}
